//! Frame server - exposes the render surface to an external renderer

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::handlers;
use crate::logic::surface::FrameSurface;
use crate::logic::window::SharedWindow;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub surface: Arc<FrameSurface>,
    pub window: SharedWindow,
    pub config: Config,
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/api/v1/frame", get(handlers::frame::render_state))
        .route("/api/v1/layers", get(handlers::frame::layers))
        .route("/api/v1/panel", get(handlers::frame::panel))
        .route(
            "/api/v1/view",
            get(handlers::view::get).put(handlers::view::update),
        )
        .route("/api/v1/stream", get(handlers::stream::subscribe))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Bind and serve until the process exits
pub async fn serve(state: AppState) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], state.config.port));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("🚀 Frame server listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
