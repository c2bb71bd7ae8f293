//! Impact marker sizing
//!
//! World radius grows with magnitude above a floor; the renderer then clamps
//! the projected size into a pixel band so small attacks stay visible and
//! huge ones do not swallow the map.

use serde::{Deserialize, Serialize};

use crate::logic::view::{ViewState, MAX_MERCATOR_LATITUDE};

/// Equatorial circumference used by web-mercator (meters)
const EARTH_CIRCUMFERENCE_M: f64 = 40_075_016.686;
/// deck.gl world tile size in pixels
const TILE_SIZE_PX: f64 = 512.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactScale {
    /// Smallest world radius (meters)
    pub floor_radius: f64,
    /// Meters of radius per unit of magnitude
    pub scale_factor: f64,
    pub min_pixels: f64,
    pub max_pixels: f64,
}

impl Default for ImpactScale {
    fn default() -> Self {
        Self {
            floor_radius: 100_000.0,
            scale_factor: 5_000.0,
            min_pixels: 3.0,
            max_pixels: 30.0,
        }
    }
}

impl ImpactScale {
    /// `max(floor_radius, magnitude × scale_factor)`; NaN magnitudes get the floor
    pub fn radius_meters(&self, magnitude: f64) -> f64 {
        self.floor_radius.max(magnitude * self.scale_factor)
    }

    /// On-screen radius of an impact at `latitude` under `view`, clamped to
    /// `[min_pixels, max_pixels]`
    pub fn pixel_radius(&self, magnitude: f64, view: &ViewState, latitude: f64) -> f64 {
        let px = self.radius_meters(magnitude) / meters_per_pixel(view.zoom, latitude);
        if px.is_nan() {
            return self.min_pixels;
        }
        px.clamp(self.min_pixels, self.max_pixels)
    }
}

/// Web-mercator ground resolution
pub fn meters_per_pixel(zoom: f64, latitude: f64) -> f64 {
    let lat = latitude.clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE).to_radians();
    EARTH_CIRCUMFERENCE_M * lat.cos() / (TILE_SIZE_PX * 2f64.powf(zoom))
}
