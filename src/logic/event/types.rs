//! Attack Event Types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Label used when the source does not name the attack
pub const UNKNOWN_ATTACK_TYPE: &str = "UNKNOWN";

/// Magnitude used when the source omits it or sends garbage
pub const DEFAULT_MAGNITUDE: f64 = 1.0;

pub const LONGITUDE_RANGE: (f64, f64) = (-180.0, 180.0);
pub const LATITUDE_RANGE: (f64, f64) = (-90.0, 90.0);

// ============================================================================
// PAYLOAD (validated wire data, not yet admitted)
// ============================================================================

/// Normalized content of one wire message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackPayload {
    pub source_longitude: f64,
    pub source_latitude: f64,
    pub target_longitude: f64,
    pub target_latitude: f64,
    pub magnitude: f64,
    pub attack_type: String,
    /// Country label the producer resolved for the attacker, if any
    pub source_country: Option<String>,
    /// Country label the producer resolved for the victim, if any
    pub target_country: Option<String>,
}

impl AttackPayload {
    /// Payload with default magnitude and type
    pub fn new(src_lon: f64, src_lat: f64, dst_lon: f64, dst_lat: f64) -> Self {
        Self {
            source_longitude: src_lon,
            source_latitude: src_lat,
            target_longitude: dst_lon,
            target_latitude: dst_lat,
            magnitude: DEFAULT_MAGNITUDE,
            attack_type: UNKNOWN_ATTACK_TYPE.to_string(),
            source_country: None,
            target_country: None,
        }
    }

    pub fn with_magnitude(mut self, magnitude: f64) -> Self {
        self.magnitude = magnitude;
        self
    }

    pub fn with_type(mut self, attack_type: &str) -> Self {
        self.attack_type = attack_type.to_string();
        self
    }
}

// ============================================================================
// ATTACK EVENT
// ============================================================================

/// One observed attack, stamped at local ingestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackEvent {
    /// Session-scoped counter, used only as a render/list key
    pub id: u64,
    pub source_longitude: f64,
    pub source_latitude: f64,
    pub target_longitude: f64,
    pub target_latitude: f64,
    pub magnitude: f64,
    pub attack_type: String,
    pub source_country: Option<String>,
    pub target_country: Option<String>,
    /// Local receipt time, never taken from the wire
    pub received_at: DateTime<Utc>,
}

impl AttackEvent {
    /// Stamp a validated payload with its key and receipt time
    pub fn stamp(payload: AttackPayload, id: u64, received_at: DateTime<Utc>) -> Self {
        Self {
            id,
            source_longitude: payload.source_longitude,
            source_latitude: payload.source_latitude,
            target_longitude: payload.target_longitude,
            target_latitude: payload.target_latitude,
            magnitude: payload.magnitude,
            attack_type: payload.attack_type,
            source_country: payload.source_country,
            target_country: payload.target_country,
            received_at,
        }
    }

    /// All four coordinates are finite and inside their ranges
    pub fn has_coordinates(&self) -> bool {
        is_longitude(self.source_longitude)
            && is_latitude(self.source_latitude)
            && is_longitude(self.target_longitude)
            && is_latitude(self.target_latitude)
    }

    pub fn source_position(&self) -> [f64; 2] {
        [self.source_longitude, self.source_latitude]
    }

    pub fn target_position(&self) -> [f64; 2] {
        [self.target_longitude, self.target_latitude]
    }
}

pub fn is_longitude(value: f64) -> bool {
    value.is_finite() && value >= LONGITUDE_RANGE.0 && value <= LONGITUDE_RANGE.1
}

pub fn is_latitude(value: f64) -> bool {
    value.is_finite() && value >= LATITUDE_RANGE.0 && value <= LATITUDE_RANGE.1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stamp_keeps_payload() {
        let payload = AttackPayload::new(10.0, 20.0, -30.0, 40.0)
            .with_magnitude(7.0)
            .with_type("SYN_FLOOD");
        let now = Utc::now();
        let event = AttackEvent::stamp(payload, 42, now);

        assert_eq!(event.id, 42);
        assert_eq!(event.source_position(), [10.0, 20.0]);
        assert_eq!(event.target_position(), [-30.0, 40.0]);
        assert_eq!(event.magnitude, 7.0);
        assert_eq!(event.attack_type, "SYN_FLOOD");
        assert_eq!(event.received_at, now);
        assert!(event.has_coordinates());
    }

    #[test]
    fn test_non_finite_coordinates_not_plottable() {
        let mut event = AttackEvent::stamp(AttackPayload::new(0.0, 0.0, 0.0, 0.0), 1, Utc::now());
        event.target_longitude = f64::NAN;
        assert!(!event.has_coordinates());

        event.target_longitude = 0.0;
        event.source_latitude = 91.0;
        assert!(!event.has_coordinates());
    }
}
