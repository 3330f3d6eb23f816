//! Configuration loading for the dashboard.
//!
//! All endpoint addresses and wire-format variants live in a `config.toml`
//! next to the binary (or at a path given as the first CLI argument), so one
//! build of the dashboard drives any rover in the fleet.

use anyhow::Context;
use serde::Deserialize;
use std::path::Path;

use super::telemetry::TelemetrySchema;

/// Which command endpoint the configured rover exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommandProtocol {
    /// `GET /control?command=<0..4>` with the numeric direction code.
    LegacyNumeric,
    /// `POST /rover/control` with a `{"direction": ...}` JSON body.
    Json,
}

/// Optional third-party relay that mirrors direction commands.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RelayConfig {
    /// Base update URL of the relay (without query parameters).
    pub update_url: String,
    pub channel_id: String,
    pub api_key: String,
}

/// Configuration for one rover, loaded from a TOML file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct DashboardConfig {
    /// Base URL of the rover's onboard control server.
    pub control_base_url: String,
    /// Full URL of the telemetry endpoint.
    pub telemetry_url: String,
    /// API key appended to telemetry reads as a query parameter, if required.
    #[serde(default)]
    pub telemetry_api_key: Option<String>,
    pub telemetry_schema: TelemetrySchema,
    pub command_protocol: CommandProtocol,
    /// Mirror direction commands to a relay when present.
    #[serde(default)]
    pub relay: Option<RelayConfig>,
}

/// Error type for configuration loading failures.
#[derive(Debug)]
pub enum ConfigError {
    FileReadError(String),
    ParseError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::FileReadError(msg) => write!(f, "Failed to read config file: {}", msg),
            ConfigError::ParseError(msg) => write!(f, "Failed to parse config file: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl DashboardConfig {
    /// Load configuration from a TOML file.
    pub fn load(config_path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read file: {}", config_path.display()))
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;

        toml::from_str(&content)
            .context("Invalid TOML format")
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// URL of the onboard MJPEG stream.
    pub fn video_feed_url(&self) -> String {
        format!("{}/video_feed", self.control_base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_config_parses() {
        let config: DashboardConfig = toml::from_str(
            r#"
            control-base-url = "http://192.168.178.238:8000"
            telemetry-url = "https://api.example.net/channels/abc"
            telemetry-api-key = "secret"
            telemetry-schema = "indexed-fields"
            command-protocol = "legacy-numeric"

            [relay]
            update-url = "https://api.example.net/update"
            channel-id = "chan"
            api-key = "key"
            "#,
        )
        .unwrap();
        assert_eq!(config.telemetry_schema, TelemetrySchema::IndexedFields);
        assert_eq!(config.command_protocol, CommandProtocol::LegacyNumeric);
        assert_eq!(config.telemetry_api_key.as_deref(), Some("secret"));
        assert_eq!(config.relay.as_ref().unwrap().channel_id, "chan");
        assert_eq!(config.video_feed_url(), "http://192.168.178.238:8000/video_feed");
    }

    #[test]
    fn relay_and_api_key_are_optional() {
        let config: DashboardConfig = toml::from_str(
            r#"
            control-base-url = "http://192.168.1.10:8000"
            telemetry-url = "http://192.168.1.10:8000/rover/sensor_data"
            telemetry-schema = "flat"
            command-protocol = "json"
            "#,
        )
        .unwrap();
        assert_eq!(config.telemetry_schema, TelemetrySchema::Flat);
        assert!(config.telemetry_api_key.is_none());
        assert!(config.relay.is_none());
    }

    #[test]
    fn unknown_schema_name_is_rejected() {
        let result: Result<DashboardConfig, _> = toml::from_str(
            r#"
            control-base-url = "http://192.168.1.10:8000"
            telemetry-url = "http://192.168.1.10:8000/rover/sensor_data"
            telemetry-schema = "nested"
            command-protocol = "json"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn missing_file_reports_read_error() {
        let err = DashboardConfig::load(Path::new("/nonexistent/config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileReadError(_)));
    }
}
