//! Layer descriptors
//!
//! Declarative, renderer-agnostic descriptions of what to draw. The JSON shape
//! follows deck.gl layer props so a browser renderer can instantiate them as-is.

use serde::{Deserialize, Serialize};

use super::theme::Color;
use crate::logic::basemap::BasemapData;

pub const BASEMAP_LAYER_ID: &str = "base-map";
pub const ARC_LAYER_ID: &str = "attack-arcs";
pub const IMPACT_LAYER_ID: &str = "impact-points";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LayerDescriptor {
    #[serde(rename = "GeoJsonLayer")]
    GeoJson(GeoJsonLayer),
    #[serde(rename = "ArcLayer")]
    Arc(ArcLayer),
    #[serde(rename = "ScatterplotLayer")]
    Scatterplot(ScatterplotLayer),
}

impl LayerDescriptor {
    pub fn id(&self) -> &str {
        match self {
            LayerDescriptor::GeoJson(l) => &l.id,
            LayerDescriptor::Arc(l) => &l.id,
            LayerDescriptor::Scatterplot(l) => &l.id,
        }
    }

    /// Number of drawable items (the basemap counts as one)
    pub fn len(&self) -> usize {
        match self {
            LayerDescriptor::GeoJson(_) => 1,
            LayerDescriptor::Arc(l) => l.data.len(),
            LayerDescriptor::Scatterplot(l) => l.data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// BASEMAP
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoJsonLayer {
    pub id: String,
    pub data: BasemapData,
    pub stroked: bool,
    pub filled: bool,
    pub line_width_min_pixels: f64,
    pub get_line_color: Color,
    pub get_fill_color: Color,
}

// ============================================================================
// ARCS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcDatum {
    /// Event id, for render keying
    pub key: u64,
    pub source_position: [f64; 2],
    pub target_position: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcLayer {
    pub id: String,
    pub data: Vec<ArcDatum>,
    pub get_source_color: Color,
    pub get_target_color: Color,
    pub get_width: f64,
    pub get_height: f64,
}

// ============================================================================
// IMPACTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactDatum {
    pub key: u64,
    pub position: [f64; 2],
    /// World radius in meters, before the pixel clamp
    pub radius: f64,
    pub magnitude: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterplotLayer {
    pub id: String,
    pub data: Vec<ImpactDatum>,
    pub get_fill_color: Color,
    pub get_line_color: Color,
    pub stroked: bool,
    pub line_width_min_pixels: f64,
    pub radius_min_pixels: f64,
    pub radius_max_pixels: f64,
}
