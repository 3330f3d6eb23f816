//! Live video feed consumption.
//!
//! The rover exposes its camera as a `multipart/x-mixed-replace` MJPEG stream.
//! A dedicated thread reads the raw byte stream, splits it into JPEG frames on
//! the SOI/EOI markers, decodes each frame, and publishes it to the UI as a
//! ready-to-upload image. The multipart boundary headers between frames are
//! never parsed; everything outside a SOI..EOI span is discarded.
//!
//! On any stream error the thread reports the feed as lost, waits one second,
//! and reconnects. The stream contents are otherwise opaque to the dashboard.

use reqwest::blocking::{Client, Response};
use std::io::Read;
use std::thread;
use std::time::Duration;

use crate::UIRefreshQueueSender;
use crate::rover::task::shutdown_requested;
use crate::ui::UIRefreshState;

/// Start of a JPEG image.
const SOI: [u8; 2] = [0xFF, 0xD8];
/// End of a JPEG image.
const EOI: [u8; 2] = [0xFF, 0xD9];

/// Upper bound on a pending (unterminated) frame. A camera frame is far below
/// this; exceeding it means the stream is garbage and the buffer is reset.
const MAX_PENDING_FRAME_BYTES: usize = 4 * 1024 * 1024;

/// Incremental JPEG frame splitter over an MJPEG byte stream.
///
/// Frames may arrive split across arbitrary chunk boundaries; `push` buffers
/// partial frames and returns every frame completed by the new chunk.
pub struct FrameExtractor {
    buffer: Vec<u8>,
}

impl FrameExtractor {
    pub fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Feed one chunk of stream data, returning all completed JPEG frames.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Vec<u8>> {
        self.buffer.extend_from_slice(chunk);

        let mut frames = Vec::new();
        loop {
            let Some(start) = find_marker(&self.buffer, SOI) else {
                // Nothing resembling a frame start; keep a trailing 0xFF in
                // case the chunk ended mid-marker, drop the rest.
                let keep = if self.buffer.last() == Some(&0xFF) { 1 } else { 0 };
                let drop_len = self.buffer.len() - keep;
                self.buffer.drain(..drop_len);
                break;
            };
            if start > 0 {
                self.buffer.drain(..start);
            }

            let Some(end) = find_marker(&self.buffer[SOI.len()..], EOI) else {
                if self.buffer.len() > MAX_PENDING_FRAME_BYTES {
                    log::warn!("Discarding {} buffered bytes without a frame end", self.buffer.len());
                    self.buffer.clear();
                }
                break;
            };

            let frame_len = SOI.len() + end + EOI.len();
            frames.push(self.buffer[..frame_len].to_vec());
            self.buffer.drain(..frame_len);
        }
        frames
    }
}

fn find_marker(haystack: &[u8], marker: [u8; 2]) -> Option<usize> {
    haystack.windows(marker.len()).position(|window| window == marker)
}

/// Decode a JPEG frame into an image ready for texture upload.
pub fn decode_frame(jpeg: &[u8]) -> Option<egui::ColorImage> {
    match image::load_from_memory(jpeg) {
        Ok(img) => {
            let rgba = img.to_rgba8();
            let size = [rgba.width() as usize, rgba.height() as usize];
            let pixels = rgba.as_flat_samples();
            Some(egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice()))
        }
        Err(e) => {
            log::debug!("Dropping undecodable frame ({} bytes): {}", jpeg.len(), e);
            None
        }
    }
}

/// Spawn the video reader on its own OS thread.
///
/// The thread lives for the whole session; it observes the shutdown flag
/// between reads and exits with the rest of the background work.
pub fn spawn_reader(url: String, ui_refresh_tx: UIRefreshQueueSender) {
    thread::Builder::new()
        .name("video-feed".to_string())
        .spawn(move || reader_loop(url, ui_refresh_tx))
        .expect("failed to spawn video thread");
}

fn reader_loop(url: String, ui_refresh_tx: UIRefreshQueueSender) {
    // The default blocking client timeout covers the whole request, which
    // would cut a continuous stream off; only the connect phase gets one.
    let client = match Client::builder().timeout(None).connect_timeout(Duration::from_secs(5)).build() {
        Ok(client) => client,
        Err(e) => {
            log::error!("Failed to create video HTTP client: {}", e);
            return;
        }
    };

    log::info!("Video reader started for {}", url);

    while !shutdown_requested() {
        match client.get(&url).send() {
            Ok(response) => {
                read_stream(response, &ui_refresh_tx);
            }
            Err(e) => {
                log::warn!("Video feed unavailable: {}", e);
                let _ = ui_refresh_tx.try_send(UIRefreshState::VideoFeedLost);
            }
        }

        if shutdown_requested() {
            break;
        }
        thread::sleep(Duration::from_secs(1));
    }

    log::info!("Video reader stopped");
}

fn read_stream(mut response: Response, ui_refresh_tx: &UIRefreshQueueSender) {
    let mut extractor = FrameExtractor::new();
    let mut chunk = [0u8; 8192];

    loop {
        if shutdown_requested() {
            return;
        }

        match response.read(&mut chunk) {
            Ok(0) => {
                log::warn!("Video stream ended");
                let _ = ui_refresh_tx.try_send(UIRefreshState::VideoFeedLost);
                return;
            }
            Ok(n) => {
                for jpeg in extractor.push(&chunk[..n]) {
                    if let Some(frame) = decode_frame(&jpeg) {
                        // try_send: when the UI cannot keep up, stale frames
                        // are dropped instead of buffered.
                        let _ = ui_refresh_tx.try_send(UIRefreshState::VideoFrame(frame));
                    }
                }
            }
            Err(e) => {
                log::warn!("Video stream read error: {}", e);
                let _ = ui_refresh_tx.try_send(UIRefreshState::VideoFeedLost);
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(body: &[u8]) -> Vec<u8> {
        let mut f = SOI.to_vec();
        f.extend_from_slice(body);
        f.extend_from_slice(&EOI);
        f
    }

    #[test]
    fn extracts_two_frames_from_one_chunk() {
        let mut stream = Vec::new();
        stream.extend_from_slice(&frame(b"first"));
        stream.extend_from_slice(b"--frame\r\nContent-Type: image/jpeg\r\n\r\n");
        stream.extend_from_slice(&frame(b"second"));

        let mut extractor = FrameExtractor::new();
        let frames = extractor.push(&stream);
        assert_eq!(frames, vec![frame(b"first"), frame(b"second")]);
    }

    #[test]
    fn reassembles_a_frame_split_across_chunks() {
        let full = frame(b"split across many chunks");
        let mut extractor = FrameExtractor::new();

        let mut frames = Vec::new();
        for chunk in full.chunks(3) {
            frames.extend(extractor.push(chunk));
        }
        assert_eq!(frames, vec![full]);
    }

    #[test]
    fn split_is_independent_of_chunk_boundaries() {
        let mut stream = Vec::new();
        stream.extend_from_slice(b"boundary junk");
        stream.extend_from_slice(&frame(b"one"));
        stream.extend_from_slice(b"\r\n--frame\r\n");
        stream.extend_from_slice(&frame(b"two"));

        for chunk_size in [1, 2, 5, 7, stream.len()] {
            let mut extractor = FrameExtractor::new();
            let mut frames = Vec::new();
            for chunk in stream.chunks(chunk_size) {
                frames.extend(extractor.push(chunk));
            }
            assert_eq!(frames, vec![frame(b"one"), frame(b"two")], "chunk size {}", chunk_size);
        }
    }

    #[test]
    fn leading_garbage_is_discarded() {
        let mut extractor = FrameExtractor::new();
        assert!(extractor.push(b"not a jpeg at all").is_empty());
        let frames = extractor.push(&frame(b"payload"));
        assert_eq!(frames, vec![frame(b"payload")]);
    }

    #[test]
    fn partial_marker_at_chunk_edge_survives() {
        let mut extractor = FrameExtractor::new();
        // Chunk ends with the first SOI byte; the second byte follows.
        assert!(extractor.push(&[0x00, 0x11, 0xFF]).is_empty());
        let mut rest = vec![0xD8];
        rest.extend_from_slice(b"body");
        rest.extend_from_slice(&EOI);
        let frames = extractor.push(&rest);
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0], frame(b"body"));
    }
}
