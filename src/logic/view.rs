//! View State - camera parameters owned by the render surface / user input

use serde::{Deserialize, Serialize};

/// Web-mercator latitude limit
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051129;
pub const MIN_ZOOM: f64 = 0.0;
pub const MAX_ZOOM: f64 = 20.0;
pub const MAX_PITCH: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
}

impl Default for ViewState {
    /// Tilted world view for the 3D arc effect
    fn default() -> Self {
        Self {
            longitude: 0.0,
            latitude: 20.0,
            zoom: 1.8,
            pitch: 45.0,
            bearing: 0.0,
        }
    }
}

impl ViewState {
    pub fn is_finite(&self) -> bool {
        [self.longitude, self.latitude, self.zoom, self.pitch, self.bearing]
            .iter()
            .all(|v| v.is_finite())
    }

    /// Clamp into what the renderer accepts: longitude and bearing wrap,
    /// latitude/zoom/pitch clamp. Callers check `is_finite` first.
    pub fn sanitized(self) -> Self {
        Self {
            longitude: wrap(self.longitude, 180.0),
            latitude: self.latitude.clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE),
            zoom: self.zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            pitch: self.pitch.clamp(0.0, MAX_PITCH),
            bearing: wrap(self.bearing, 180.0),
        }
    }
}

/// Wrap into [-half, half)
fn wrap(value: f64, half: f64) -> f64 {
    let span = half * 2.0;
    (value + half).rem_euclid(span) - half
}
