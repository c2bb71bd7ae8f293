//! Layer Module - window snapshot → render layer descriptors
//!
//! ## Structure
//! - `types.rs` - descriptors (deck.gl-shaped JSON)
//! - `theme.rs` - colors and arc geometry
//! - `impact.rs` - impact radius and pixel clamp
//! - `derive.rs` - the pure derivation

pub mod derive;
pub mod impact;
pub mod theme;
pub mod types;

pub use derive::{arc_layer, basemap_layer, derive_layers, impact_layer, LayerStyle};
pub use impact::ImpactScale;
pub use theme::{ArcStyle, Color, Theme};
pub use types::{
    ArcDatum, ArcLayer, GeoJsonLayer, ImpactDatum, LayerDescriptor, ScatterplotLayer,
    ARC_LAYER_ID, BASEMAP_LAYER_ID, IMPACT_LAYER_ID,
};
