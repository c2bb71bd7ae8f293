//! Frame handlers - the newest derived output

use axum::{extract::State, Json};

use crate::logic::connection::ConnectionState;
use crate::logic::layers::LayerDescriptor;
use crate::logic::panel::{derive_panel, PanelView};
use crate::logic::surface::RenderState;
use crate::server::AppState;

/// Camera, layers and panel in one document
pub async fn render_state(State(state): State<AppState>) -> Json<RenderState> {
    Json(state.surface.render_state())
}

/// Layer descriptors only; empty before the first frame
pub async fn layers(State(state): State<AppState>) -> Json<Vec<LayerDescriptor>> {
    let layers = state
        .surface
        .latest_frame()
        .map(|f| f.layers.clone())
        .unwrap_or_default();
    Json(layers)
}

/// Log/status panel. Before the session has presented anything the feed is
/// empty and the indicator reads offline.
pub async fn panel(State(state): State<AppState>) -> Json<PanelView> {
    let panel = match state.surface.latest_frame() {
        Some(frame) => frame.panel.clone(),
        None => derive_panel(&[], ConnectionState::Closed, state.config.feed_limit),
    };
    Json(panel)
}
