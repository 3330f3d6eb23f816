// UI module for the Rover Control Dashboard
//
// This module organizes the UI into separate components:
// - `telemetry_panel`: Top panel with the polled sensor readouts
// - `control_panel`: Right panel with joystick, direction buttons and speed slider
// - `video_panel`: Central panel with the live camera feed
// - `joystick`: Custom draggable joystick widget
// - `app_state`: Application state management and main update loop

pub mod app_state;
pub mod control_panel;
pub mod joystick;
pub mod telemetry_panel;
pub mod video_panel;

use crate::rover::{Direction, SensorSnapshot};

pub use app_state::AppState;

/// Messages from the background tasks to the UI.
pub enum UIRefreshState {
    /// A fresh sensor snapshot; replaces the displayed one wholesale.
    TelemetryUpdated(SensorSnapshot),
    /// A decoded camera frame ready for texture upload.
    VideoFrame(egui::ColorImage),
    /// The camera stream dropped; show the placeholder until frames resume.
    VideoFeedLost,
}

/// Commands from the UI to the background tasks.
pub enum UICommand {
    /// Discrete direction intent from a button press or joystick release.
    Drive(Direction),
    /// Raw joystick vector; components are `None` while no gesture exists.
    DriveVector { x: Option<f64>, y: Option<f64> },
    /// Motor speed percentage from the slider, 0..=100.
    SetSpeed(u8),
    /// The window is closing; stop dispatching.
    Shutdown,
}
