//! Basemap - the static country polygon dataset
//!
//! Either handed to the renderer as a URL, or fetched once at startup and
//! embedded. A failed fetch only costs the base map; arcs and impacts do not
//! depend on it.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::BASEMAP_TIMEOUT_SECS;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BasemapData {
    /// Renderer fetches the dataset itself
    Url(String),
    /// Prefetched GeoJSON, immutable for the session
    Inline(Value),
}

impl BasemapData {
    pub fn is_inline(&self) -> bool {
        matches!(self, BasemapData::Inline(_))
    }
}

/// Resolve the basemap for a session. Never fails: a prefetch error falls back
/// to the URL.
pub async fn load(url: &str, prefetch: bool) -> BasemapData {
    if !prefetch {
        return BasemapData::Url(url.to_string());
    }

    match fetch(url).await {
        Ok(geojson) => {
            tracing::info!("Basemap prefetched from {}", url);
            BasemapData::Inline(geojson)
        }
        Err(e) => {
            tracing::warn!("Basemap prefetch failed, renderer will fetch it: {}", e);
            BasemapData::Url(url.to_string())
        }
    }
}

/// Download and sanity-check a GeoJSON document
pub async fn fetch(url: &str) -> AppResult<Value> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(BASEMAP_TIMEOUT_SECS))
        .build()?;

    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(AppError::Basemap(format!(
            "{} returned {}",
            url,
            response.status().as_u16()
        )));
    }

    let geojson: Value = response.json().await?;
    match geojson.get("type").and_then(Value::as_str) {
        Some(_) => Ok(geojson),
        None => Err(AppError::Basemap(format!("{} is not a GeoJSON object", url))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Json, Router};
    use serde_json::json;

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_prefetch_embeds_dataset() {
        let base = serve(Router::new().route(
            "/countries.geojson",
            get(|| async { Json(json!({"type": "FeatureCollection", "features": []})) }),
        ))
        .await;

        let data = load(&format!("{}/countries.geojson", base), true).await;
        assert_eq!(data, BasemapData::Inline(json!({"type": "FeatureCollection", "features": []})));
    }

    #[tokio::test]
    async fn test_failed_prefetch_falls_back_to_url() {
        let base = serve(Router::new()).await;
        let url = format!("{}/missing.geojson", base);

        assert!(matches!(fetch(&url).await, Err(AppError::Basemap(_))));
        assert_eq!(load(&url, true).await, BasemapData::Url(url.clone()));
    }

    #[tokio::test]
    async fn test_non_geojson_rejected() {
        let base = serve(Router::new().route("/x", get(|| async { Json(json!([1, 2])) }))).await;
        assert!(fetch(&format!("{}/x", base)).await.is_err());
    }

    #[tokio::test]
    async fn test_no_prefetch_keeps_url() {
        let data = load("https://example.invalid/world.geojson", false).await;
        assert!(!data.is_inline());
        let encoded = serde_json::to_value(&data).unwrap();
        assert_eq!(encoded, json!("https://example.invalid/world.geojson"));
    }
}
