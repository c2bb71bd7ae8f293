//! View state handlers

use axum::{extract::State, Json};

use crate::logic::view::ViewState;
use crate::server::AppState;
use crate::AppResult;

pub async fn get(State(state): State<AppState>) -> Json<ViewState> {
    Json(state.surface.view_state())
}

/// Replace the camera; responds with the stored, sanitized value
pub async fn update(
    State(state): State<AppState>,
    Json(req): Json<ViewState>,
) -> AppResult<Json<ViewState>> {
    let stored = state.surface.set_view_state(req)?;
    tracing::debug!(zoom = stored.zoom, pitch = stored.pitch, "View state updated");
    Ok(Json(stored))
}
