//! Telemetry payload decoding.
//!
//! The rover fleet exposes two wire schemas for the same sensor set:
//!
//! - **Flat**: the onboard server returns `ir_sensors`, `gas_sensor` and
//!   `dht_sensor.{temperature,humidity}` at the top level.
//! - **Indexed fields**: the relay returns a `fields` map of stringified
//!   channel numbers to `{value}` objects, where channels 1/2 are
//!   temperature/humidity, 3 is a 0/1 gas flag and 4..7 are the four
//!   infrared sensors.
//!
//! Validation is field-presence only, not type checking: a payload is rejected
//! when a required key is absent, and individual values that fail to convert
//! degrade to their defaults. A rejected payload must never replace the
//! previously displayed snapshot.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// One complete sensor reading set, replaced wholesale on every poll.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SensorSnapshot {
    /// Infrared proximity readings keyed by sensor id, in display order.
    pub infrared: BTreeMap<String, f64>,
    pub gas_detected: bool,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
}

/// Which wire schema the configured telemetry endpoint speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TelemetrySchema {
    /// Top-level `ir_sensors` / `gas_sensor` / `dht_sensor` objects.
    Flat,
    /// Numbered `fields` map with `{value}` entries.
    IndexedFields,
}

/// Infrared channel numbers and their display ids in the indexed schema.
const INDEXED_IR_CHANNELS: [(&str, &str); 4] = [("4", "ir_1"), ("5", "ir_2"), ("6", "ir_3"), ("7", "ir_4")];

impl TelemetrySchema {
    /// Decode a telemetry response body into a snapshot.
    ///
    /// Returns a descriptive error when a required field is missing; the
    /// caller emits exactly one diagnostic per rejected payload and keeps the
    /// prior snapshot.
    pub fn decode(self, payload: &Value) -> Result<SensorSnapshot, String> {
        match self {
            TelemetrySchema::Flat => decode_flat(payload),
            TelemetrySchema::IndexedFields => decode_indexed(payload),
        }
    }
}

fn decode_flat(payload: &Value) -> Result<SensorSnapshot, String> {
    let ir_sensors = payload
        .get("ir_sensors")
        .ok_or_else(|| "missing required field: ir_sensors".to_string())?;
    let gas_sensor = payload
        .get("gas_sensor")
        .ok_or_else(|| "missing required field: gas_sensor".to_string())?;
    let dht_sensor = payload
        .get("dht_sensor")
        .ok_or_else(|| "missing required field: dht_sensor".to_string())?;
    for key in ["temperature", "humidity"] {
        if dht_sensor.get(key).is_none() {
            return Err(format!("missing required field: dht_sensor.{}", key));
        }
    }

    let mut infrared = BTreeMap::new();
    if let Some(map) = ir_sensors.as_object() {
        for (id, reading) in map {
            if let Some(v) = reading.as_f64() {
                infrared.insert(id.clone(), v);
            }
        }
    }

    Ok(SensorSnapshot {
        infrared,
        gas_detected: truthy(gas_sensor),
        temperature: dht_sensor.get("temperature").and_then(Value::as_f64),
        humidity: dht_sensor.get("humidity").and_then(Value::as_f64),
    })
}

fn decode_indexed(payload: &Value) -> Result<SensorSnapshot, String> {
    let fields = payload.get("fields").ok_or_else(|| "missing required field: fields".to_string())?;

    // Channels 1..3 must be present for the payload to count as a reading at
    // all; the infrared channels are optional and default to 0.
    for channel in ["1", "2", "3"] {
        if field_value(fields, channel).is_none() {
            return Err(format!("missing required field: fields.{}.value", channel));
        }
    }

    let mut infrared = BTreeMap::new();
    for (channel, id) in INDEXED_IR_CHANNELS {
        let reading = field_value(fields, channel).and_then(Value::as_f64).unwrap_or(0.0);
        infrared.insert(id.to_string(), reading);
    }

    Ok(SensorSnapshot {
        infrared,
        gas_detected: field_value(fields, "3").and_then(Value::as_f64) == Some(1.0),
        temperature: field_value(fields, "1").and_then(Value::as_f64),
        humidity: field_value(fields, "2").and_then(Value::as_f64),
    })
}

/// Look up `fields.<channel>.value`.
fn field_value<'a>(fields: &'a Value, channel: &str) -> Option<&'a Value> {
    fields.get(channel).and_then(|f| f.get("value"))
}

/// Gas flags arrive as a boolean from the onboard server and as 0/1 from
/// older firmware revisions.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|v| v != 0.0).unwrap_or(false),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flat_payload_decodes() {
        let payload = json!({
            "ir_sensors": {"ir_1": 5},
            "gas_sensor": true,
            "dht_sensor": {"temperature": 22, "humidity": 40}
        });
        let snapshot = TelemetrySchema::Flat.decode(&payload).unwrap();
        assert_eq!(snapshot.infrared.get("ir_1"), Some(&5.0));
        assert!(snapshot.gas_detected);
        assert_eq!(snapshot.temperature, Some(22.0));
        assert_eq!(snapshot.humidity, Some(40.0));
    }

    #[test]
    fn flat_payload_with_numeric_gas_flag() {
        let payload = json!({
            "ir_sensors": {},
            "gas_sensor": 1,
            "dht_sensor": {"temperature": null, "humidity": null}
        });
        let snapshot = TelemetrySchema::Flat.decode(&payload).unwrap();
        assert!(snapshot.gas_detected);
        assert_eq!(snapshot.temperature, None);
        assert_eq!(snapshot.humidity, None);
    }

    #[test]
    fn flat_payload_missing_field_is_rejected() {
        let payload = json!({
            "ir_sensors": {"ir_1": 5},
            "dht_sensor": {"temperature": 22, "humidity": 40}
        });
        let err = TelemetrySchema::Flat.decode(&payload).unwrap_err();
        assert!(err.contains("gas_sensor"));
    }

    #[test]
    fn flat_payload_missing_dht_reading_is_rejected() {
        let payload = json!({
            "ir_sensors": {"ir_1": 5},
            "gas_sensor": false,
            "dht_sensor": {"temperature": 22}
        });
        let err = TelemetrySchema::Flat.decode(&payload).unwrap_err();
        assert!(err.contains("dht_sensor.humidity"));
    }

    #[test]
    fn indexed_payload_decodes() {
        let payload = json!({
            "fields": {
                "1": {"value": 21.5},
                "2": {"value": 38.0},
                "3": {"value": 1},
                "4": {"value": 12},
                "5": {"value": 34},
                "6": {"value": 56},
                "7": {"value": 78}
            }
        });
        let snapshot = TelemetrySchema::IndexedFields.decode(&payload).unwrap();
        assert_eq!(snapshot.temperature, Some(21.5));
        assert_eq!(snapshot.humidity, Some(38.0));
        assert!(snapshot.gas_detected);
        assert_eq!(snapshot.infrared.get("ir_1"), Some(&12.0));
        assert_eq!(snapshot.infrared.get("ir_4"), Some(&78.0));
    }

    #[test]
    fn indexed_payload_missing_required_channel_is_rejected() {
        let payload = json!({
            "fields": {
                "1": {"value": 21.5},
                "3": {"value": 0}
            }
        });
        let err = TelemetrySchema::IndexedFields.decode(&payload).unwrap_err();
        assert!(err.contains("fields.2"));
    }

    #[test]
    fn indexed_payload_defaults_missing_ir_channels_to_zero() {
        let payload = json!({
            "fields": {
                "1": {"value": 20.0},
                "2": {"value": 50.0},
                "3": {"value": 0}
            }
        });
        let snapshot = TelemetrySchema::IndexedFields.decode(&payload).unwrap();
        assert!(!snapshot.gas_detected);
        assert_eq!(snapshot.infrared.len(), 4);
        assert!(snapshot.infrared.values().all(|v| *v == 0.0));
    }

    #[test]
    fn new_snapshot_does_not_inherit_old_readings() {
        let first = json!({
            "ir_sensors": {"ir_1": 5, "ir_2": 9},
            "gas_sensor": false,
            "dht_sensor": {"temperature": 22, "humidity": 40}
        });
        let second = json!({
            "ir_sensors": {"ir_3": 7},
            "gas_sensor": false,
            "dht_sensor": {"temperature": 23, "humidity": 41}
        });
        let _ = TelemetrySchema::Flat.decode(&first).unwrap();
        let snapshot = TelemetrySchema::Flat.decode(&second).unwrap();
        assert_eq!(snapshot.infrared.get("ir_1"), None);
        assert_eq!(snapshot.infrared.get("ir_3"), Some(&7.0));
    }
}
