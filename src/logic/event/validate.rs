//! Event Validator
//!
//! Turns an arbitrary decoded message into an `AttackPayload` or a `Rejected`.
//! Coordinates are mandatory; magnitude and type fall back to defaults.

use serde_json::{Map, Value};

use super::types::{
    is_latitude, is_longitude, AttackPayload, DEFAULT_MAGNITUDE, UNKNOWN_ATTACK_TYPE,
};

/// Why a message never reached the window
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Rejected {
    #[error("malformed JSON: {0}")]
    MalformedJson(String),

    #[error("message is not a JSON object")]
    NotAnObject,

    #[error("missing coordinate `{0}`")]
    MissingCoordinate(&'static str),

    #[error("coordinate `{0}` is not numeric")]
    NonNumericCoordinate(&'static str),

    #[error("coordinate `{field}` out of range: {value}")]
    CoordinateOutOfRange { field: &'static str, value: f64 },

    #[error("event has no plottable coordinates")]
    Unplottable,
}

/// Decode a text frame and validate it
pub fn decode(text: &str) -> Result<AttackPayload, Rejected> {
    let raw: Value =
        serde_json::from_str(text).map_err(|e| Rejected::MalformedJson(e.to_string()))?;
    validate(&raw)
}

/// Validate an already decoded message
pub fn validate(raw: &Value) -> Result<AttackPayload, Rejected> {
    let obj = raw.as_object().ok_or(Rejected::NotAnObject)?;

    let source_longitude = coordinate(obj, "src_lon", is_longitude)?;
    let source_latitude = coordinate(obj, "src_lat", is_latitude)?;
    let target_longitude = coordinate(obj, "dst_lon", is_longitude)?;
    let target_latitude = coordinate(obj, "dst_lat", is_latitude)?;

    Ok(AttackPayload {
        source_longitude,
        source_latitude,
        target_longitude,
        target_latitude,
        magnitude: magnitude(obj.get("magnitude")),
        attack_type: label(obj.get("attack_type"))
            .unwrap_or_else(|| UNKNOWN_ATTACK_TYPE.to_string()),
        source_country: label(obj.get("src_country")),
        target_country: label(obj.get("dst_country")),
    })
}

fn coordinate(
    obj: &Map<String, Value>,
    field: &'static str,
    in_range: fn(f64) -> bool,
) -> Result<f64, Rejected> {
    let value = match obj.get(field) {
        None | Some(Value::Null) => return Err(Rejected::MissingCoordinate(field)),
        Some(v) => number(v).ok_or(Rejected::NonNumericCoordinate(field))?,
    };

    if !in_range(value) {
        return Err(Rejected::CoordinateOutOfRange { field, value });
    }
    Ok(value)
}

/// JSON number, or a string holding one
fn number(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn magnitude(value: Option<&Value>) -> f64 {
    value
        .and_then(number)
        .filter(|m| *m > 0.0)
        .unwrap_or(DEFAULT_MAGNITUDE)
}

fn label(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_full_message() {
        let payload = assert_ok!(validate(&json!({
            "src_lon": -122.4, "src_lat": 37.7,
            "dst_lon": 139.7, "dst_lat": 35.6,
            "magnitude": 42,
            "attack_type": "SYN_FLOOD",
            "src_country": "United States",
            "source_ip": "10.0.0.1"
        })));

        assert_eq!(payload.source_longitude, -122.4);
        assert_eq!(payload.target_latitude, 35.6);
        assert_eq!(payload.magnitude, 42.0);
        assert_eq!(payload.attack_type, "SYN_FLOOD");
        assert_eq!(payload.source_country.as_deref(), Some("United States"));
        assert_eq!(payload.target_country, None);
    }

    #[test]
    fn test_defaults_for_optional_fields() {
        let payload = assert_ok!(validate(&json!({
            "src_lon": 0, "src_lat": 0, "dst_lon": 1, "dst_lat": 1
        })));
        assert_eq!(payload.magnitude, 1.0);
        assert_eq!(payload.attack_type, "UNKNOWN");
    }

    #[test]
    fn test_invalid_magnitude_defaults() {
        for bad in [json!(0), json!(-5), json!("big"), json!(null), json!([1])] {
            let payload = assert_ok!(validate(&json!({
                "src_lon": 0, "src_lat": 0, "dst_lon": 1, "dst_lat": 1,
                "magnitude": bad
            })));
            assert_eq!(payload.magnitude, 1.0);
        }
    }

    #[test]
    fn test_blank_type_defaults() {
        let payload = assert_ok!(validate(&json!({
            "src_lon": 0, "src_lat": 0, "dst_lon": 1, "dst_lat": 1,
            "attack_type": "   "
        })));
        assert_eq!(payload.attack_type, "UNKNOWN");
    }

    #[test]
    fn test_missing_coordinate_rejected() {
        let err = assert_err!(validate(&json!({
            "src_lon": 0, "src_lat": 0, "dst_lat": 1
        })));
        assert_eq!(err, Rejected::MissingCoordinate("dst_lon"));

        let err = assert_err!(validate(&json!({
            "src_lon": 0, "src_lat": null, "dst_lon": 1, "dst_lat": 1
        })));
        assert_eq!(err, Rejected::MissingCoordinate("src_lat"));
    }

    #[test]
    fn test_non_numeric_coordinate_rejected() {
        let err = assert_err!(validate(&json!({
            "src_lon": "west", "src_lat": 0, "dst_lon": 1, "dst_lat": 1
        })));
        assert_eq!(err, Rejected::NonNumericCoordinate("src_lon"));
    }

    #[test]
    fn test_numeric_string_coordinate_accepted() {
        let payload = assert_ok!(validate(&json!({
            "src_lon": " 12.5", "src_lat": "-3", "dst_lon": 1, "dst_lat": 1
        })));
        assert_eq!(payload.source_longitude, 12.5);
        assert_eq!(payload.source_latitude, -3.0);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let err = assert_err!(validate(&json!({
            "src_lon": 0, "src_lat": 0, "dst_lon": 1, "dst_lat": 95
        })));
        assert!(matches!(err, Rejected::CoordinateOutOfRange { field: "dst_lat", .. }));
    }

    #[test]
    fn test_transport_level_garbage() {
        assert!(matches!(decode("{not json"), Err(Rejected::MalformedJson(_))));
        assert_eq!(decode("[1,2,3]"), Err(Rejected::NotAnObject));
        assert!(decode(r#"{"src_lon":1,"src_lat":2,"dst_lon":3,"dst_lat":4}"#).is_ok());
    }
}
