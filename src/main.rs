//! Attack Map viewer
//!
//! Connects to the event source, runs the session and serves the derived frames
//! to the browser renderer until Ctrl-C.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use attackmap::constants::{APP_NAME, APP_VERSION};
use attackmap::logic::{basemap, surface::FrameSurface, view::ViewState};
use attackmap::{AppState, Config, Session};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env();

    // Initialize logging; JSON lines in production
    let json = config.is_production();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "attackmap=debug,tower_http=info".into()),
        )
        .with((!json).then(|| tracing_subscriber::fmt::layer()))
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .init();

    config.validate().context("invalid configuration")?;

    tracing::info!("{} v{} starting...", APP_NAME, APP_VERSION);
    tracing::info!(
        "Window capacity {}, feed limit {}, environment {}",
        config.window_capacity,
        config.feed_limit,
        config.environment
    );

    let basemap = basemap::load(&config.basemap_url, config.basemap_prefetch).await;
    if !basemap.is_inline() {
        tracing::info!("Basemap served by URL: {}", config.basemap_url);
    }
    let surface = Arc::new(FrameSurface::new(ViewState::default()));

    let mut session = Session::new(&config, surface.clone(), basemap)?;
    tracing::info!("Session {} using event source {}", session.id(), session.endpoint().url);

    let state = AppState {
        surface,
        window: session.window(),
        config: config.clone(),
    };
    tokio::spawn(async move {
        if let Err(e) = attackmap::server::serve(state).await {
            tracing::error!("Frame server stopped: {:#}", e);
        }
    });

    session
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
            tracing::info!("Shutdown requested");
        })
        .await?;

    session.teardown();
    Ok(())
}
