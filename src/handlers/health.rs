//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::constants::APP_VERSION;
use crate::logic::window::WindowStatus;
use crate::server::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
    /// Sequence of the newest presented frame, 0 before the first
    sequence: u64,
    window: WindowStatus,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: APP_VERSION,
        timestamp: chrono::Utc::now().timestamp(),
        sequence: state.surface.latest_frame().map_or(0, |f| f.sequence),
        window: state.window.status(),
    })
}
