//! # Application State Management
//!
//! Implements the central `AppState` struct which owns all UI state and
//! coordinates rendering of the dashboard panels. It implements `eframe::App`
//! to integrate with the egui application framework.
//!
//! ## Responsibilities
//!
//! - Holds the displayed sensor snapshot, motor speed and video texture
//! - Drains incoming messages from the background tasks via `ui_refresh_rx`
//! - Sends drive and speed commands to the dispatcher via `ui_command_tx`
//! - Delegates rendering to the telemetry, control and video panels
//! - Raises the shutdown flag when the window closes so the poll timer and
//!   the video reader never outlive the view
//!
//! State is updated by consuming channel messages and rebuilt into widgets
//! every frame (immediate mode).

use chrono::{DateTime, Local};
use eframe::egui;
use serde::{Deserialize, Serialize};

use super::{UICommand, UIRefreshState, control_panel, telemetry_panel, video_panel};
use crate::rover::{SensorSnapshot, task};

/// Central application state for the dashboard window.
pub struct AppState {
    /// Receiver for refresh messages from the background tasks.
    pub ui_refresh_rx: crate::UIRefreshQueueReceiver,
    /// Sender for commands from the UI to the dispatcher.
    pub ui_command_tx: crate::UICommandQueueSender,

    /// Currently displayed snapshot; `None` until the first successful poll.
    /// A failed poll leaves this untouched, so stale readings stay visible.
    pub snapshot: Option<SensorSnapshot>,
    /// Wall-clock time of the last successful poll.
    pub last_telemetry_at: Option<DateTime<Local>>,

    /// Motor speed percentage, 0..=100, mutated only by the slider.
    pub motor_speed: u8,

    /// Latest camera frame, uploaded as a texture.
    pub video_texture: Option<egui::TextureHandle>,
    /// Whether the camera stream is currently delivering frames.
    pub feed_available: bool,

    /// Width of the right control panel in pixels.
    pub control_panel_width: f32,
}

/// Settings persisted across application sessions.
#[derive(Default, Serialize, Deserialize)]
struct PersistedSettings {
    control_panel_width: Option<f32>,
}

impl AppState {
    /// Create a new AppState, loading persisted settings if available.
    pub fn new(rx: crate::UIRefreshQueueReceiver, tx: crate::UICommandQueueSender, storage: Option<&dyn eframe::Storage>) -> Self {
        let persisted: PersistedSettings = storage.and_then(|s| eframe::get_value(s, "app_settings")).unwrap_or_default();

        Self {
            ui_refresh_rx: rx,
            ui_command_tx: tx,
            snapshot: None,
            last_telemetry_at: None,
            motor_speed: 0,
            video_texture: None,
            feed_available: false,
            control_panel_width: persisted.control_panel_width.unwrap_or(320.0),
        }
    }
}

impl eframe::App for AppState {
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = PersistedSettings {
            control_panel_width: Some(self.control_panel_width),
        };
        eframe::set_value(storage, "app_settings", &settings);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // The one correctness-relevant cleanup: no poll timer may survive the
        // view. The dispatcher drains its queue and stops on the command.
        let _ = self.ui_command_tx.try_send(UICommand::Shutdown);
        task::request_shutdown();
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Repaint periodically so background updates are visible without input
        ctx.request_repaint_after(std::time::Duration::from_millis(20));

        while let Ok(msg) = self.ui_refresh_rx.try_receive() {
            match msg {
                UIRefreshState::TelemetryUpdated(snapshot) => {
                    // Wholesale replacement: readings absent from the new
                    // payload must not linger from the old one.
                    self.snapshot = Some(snapshot);
                    self.last_telemetry_at = Some(Local::now());
                }
                UIRefreshState::VideoFrame(frame) => {
                    match &mut self.video_texture {
                        Some(texture) => texture.set(frame, egui::TextureOptions::LINEAR),
                        None => self.video_texture = Some(ctx.load_texture("video_feed", frame, egui::TextureOptions::LINEAR)),
                    }
                    self.feed_available = true;
                }
                UIRefreshState::VideoFeedLost => {
                    self.feed_available = false;
                }
            }
        }

        // Panels layout: top (fixed), right (resizable), video fills the rest
        telemetry_panel::render(ctx, self);
        control_panel::render(ctx, self);
        video_panel::render(ctx, self);
    }
}
