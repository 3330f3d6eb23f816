//! HTTP client for the rover's control and telemetry endpoints.
//!
//! All writes are fire-and-forget: the response body is never inspected and
//! only network-level failure is reported to the caller, which logs it and
//! moves on. Reads decode the body through the configured schema adapter.

use reqwest::blocking::Client;
use std::time::Duration;

use super::config::{CommandProtocol, DashboardConfig};
use super::direction::Direction;
use super::telemetry::SensorSnapshot;

/// Client for one configured rover. Cheap to clone; the underlying connection
/// pool is shared between clones.
#[derive(Clone)]
pub struct RoverClient {
    client: Client,
    config: DashboardConfig,
}

impl RoverClient {
    /// Create a new RoverClient with the given configuration.
    pub fn new(config: DashboardConfig) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| format!("Failed to create HTTP client: {}", e))?;

        Ok(Self { client, config })
    }

    /// Fetch and decode the current sensor snapshot.
    ///
    /// A network failure, an unparseable body, and a payload missing required
    /// fields all surface as `Err`; the caller keeps the previous snapshot in
    /// every case.
    pub fn fetch_telemetry(&self) -> Result<SensorSnapshot, String> {
        let mut request = self.client.get(&self.config.telemetry_url);
        if let Some(key) = &self.config.telemetry_api_key {
            request = request.query(&[("api_key", key.as_str())]);
        }

        let payload: serde_json::Value = request
            .send()
            .map_err(|e| format!("Network error: {}", e))?
            .json()
            .map_err(|e| format!("Invalid JSON body: {}", e))?;

        self.config.telemetry_schema.decode(&payload)
    }

    /// Send one direction command to the rover, and to the relay if one is
    /// configured.
    pub fn send_direction(&self, direction: Direction) -> Result<(), String> {
        log::debug!("Sending direction: {} ({})", direction, direction.command_code());

        match self.config.command_protocol {
            CommandProtocol::Json => {
                let url = format!("{}/rover/control", self.config.control_base_url);
                self.client
                    .post(&url)
                    .header("Content-Type", "application/json")
                    .json(&serde_json::json!({ "direction": direction.as_str() }))
                    .send()
                    .map_err(|e| format!("Network error: {}", e))?;
            }
            CommandProtocol::LegacyNumeric => {
                let url = format!("{}/control", self.config.control_base_url);
                self.client
                    .get(&url)
                    .query(&[("command", direction.command_code().to_string())])
                    .send()
                    .map_err(|e| format!("Network error: {}", e))?;
            }
        }

        if let Some(relay) = &self.config.relay {
            let code = direction.command_code().to_string();
            self.client
                .get(&relay.update_url)
                .query(&[
                    ("channel_id", relay.channel_id.as_str()),
                    ("api_key", relay.api_key.as_str()),
                    ("field1", code.as_str()),
                ])
                .send()
                .map_err(|e| format!("Relay network error: {}", e))?;
        }

        Ok(())
    }

    /// Send one motor speed update, 0..=100 percent.
    pub fn set_speed(&self, speed: u8) -> Result<(), String> {
        let url = format!("{}/set_speed", self.config.control_base_url);
        self.client
            .get(&url)
            .query(&[("speed", speed.to_string())])
            .send()
            .map(|_| ())
            .map_err(|e| format!("Network error: {}", e))
    }
}
