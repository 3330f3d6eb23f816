//! Rover domain: configuration, HTTP client, telemetry decoding, direction
//! classification, and the background tasks that tie them together.

pub mod client;
pub mod config;
pub mod direction;
pub mod task;
pub mod telemetry;

pub use client::RoverClient;
pub use config::DashboardConfig;
pub use direction::Direction;
pub use telemetry::SensorSnapshot;
