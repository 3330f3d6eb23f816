//! # Central Panel - Live Video Feed
//!
//! Renders the latest camera frame, aspect-fit and centered in the remaining
//! space. The stream contents are opaque to the dashboard; frames arrive
//! already decoded from the video reader thread. When the feed is down the
//! panel shows a placeholder instead of the last stale frame going dark
//! unnoticed.

use crate::ui::AppState;
use eframe::egui;

/// Render the central video panel.
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading("Live Feed");
        ui.separator();

        let texture = match (&state.video_texture, state.feed_available) {
            (Some(texture), true) => texture,
            _ => {
                ui.centered_and_justified(|ui| {
                    ui.label("Feed unavailable");
                });
                return;
            }
        };

        // Fit the frame into the available space, centered, keeping aspect.
        let avail_rect = ui.available_rect_before_wrap();
        let frame_size = texture.size_vec2();
        let scale = (avail_rect.width() / frame_size.x).min(avail_rect.height() / frame_size.y);
        let fitted = frame_size * scale;
        let x = avail_rect.center().x - fitted.x / 2.0;
        let y = avail_rect.center().y - fitted.y / 2.0;
        let rect = egui::Rect::from_min_size(egui::pos2(x, y), fitted);

        ui.painter_at(rect).image(
            texture.id(),
            rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );
    });
}
