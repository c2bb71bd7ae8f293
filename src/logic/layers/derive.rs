//! Layer Derivation
//!
//! Pure functions from a window snapshot to the three layer descriptors.
//! Re-run from scratch on every window change; no state carried between runs.

use super::impact::ImpactScale;
use super::theme::{ArcStyle, Theme};
use super::types::*;
use crate::logic::basemap::BasemapData;
use crate::logic::event::AttackEvent;

/// Everything visual that is not data-driven
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayerStyle {
    pub theme: Theme,
    pub arc: ArcStyle,
    pub impact: ImpactScale,
}

/// Basemap, arcs, impacts, in draw order
pub fn derive_layers(
    snapshot: &[AttackEvent],
    basemap: &BasemapData,
    style: &LayerStyle,
) -> Vec<LayerDescriptor> {
    vec![
        LayerDescriptor::GeoJson(basemap_layer(basemap, &style.theme)),
        LayerDescriptor::Arc(arc_layer(snapshot, style)),
        LayerDescriptor::Scatterplot(impact_layer(snapshot, style)),
    ]
}

pub fn basemap_layer(basemap: &BasemapData, theme: &Theme) -> GeoJsonLayer {
    GeoJsonLayer {
        id: BASEMAP_LAYER_ID.to_string(),
        data: basemap.clone(),
        stroked: true,
        filled: true,
        line_width_min_pixels: 1.0,
        get_line_color: theme.border,
        get_fill_color: theme.land,
    }
}

pub fn arc_layer(snapshot: &[AttackEvent], style: &LayerStyle) -> ArcLayer {
    ArcLayer {
        id: ARC_LAYER_ID.to_string(),
        data: plottable(snapshot)
            .map(|e| ArcDatum {
                key: e.id,
                source_position: e.source_position(),
                target_position: e.target_position(),
            })
            .collect(),
        get_source_color: style.theme.source,
        get_target_color: style.theme.target,
        get_width: style.arc.width,
        get_height: style.arc.height,
    }
}

pub fn impact_layer(snapshot: &[AttackEvent], style: &LayerStyle) -> ScatterplotLayer {
    ScatterplotLayer {
        id: IMPACT_LAYER_ID.to_string(),
        data: plottable(snapshot)
            .map(|e| ImpactDatum {
                key: e.id,
                position: e.target_position(),
                radius: style.impact.radius_meters(e.magnitude),
                magnitude: e.magnitude,
            })
            .collect(),
        get_fill_color: style.theme.impact_fill,
        get_line_color: style.theme.impact_stroke,
        stroked: true,
        line_width_min_pixels: 1.0,
        radius_min_pixels: style.impact.min_pixels,
        radius_max_pixels: style.impact.max_pixels,
    }
}

/// Shared arc/impact filter: only events with all four coordinates
fn plottable(snapshot: &[AttackEvent]) -> impl Iterator<Item = &AttackEvent> {
    snapshot.iter().filter(|e| e.has_coordinates())
}
