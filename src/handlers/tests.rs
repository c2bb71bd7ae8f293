//! Router tests

#[cfg(test)]
mod router_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use futures_util::{Stream, StreamExt};
    use serde_json::{json, Value};
    use tokio_tungstenite::tungstenite::{Error as WsError, Message as WsMessage};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::logic::connection::ConnectionState;
    use crate::logic::panel::derive_panel;
    use crate::logic::surface::{FrameSurface, LayerFrame, RenderState, RenderSurface};
    use crate::logic::view::ViewState;
    use crate::logic::window::SharedWindow;
    use crate::server::{create_router, AppState};

    fn state() -> AppState {
        AppState {
            surface: Arc::new(FrameSurface::new(ViewState::default())),
            window: SharedWindow::new(30),
            config: Config::default(),
        }
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    async fn put_view(app: Router, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("PUT")
            .uri("/api/v1/view")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    async fn next_state<S>(ws: &mut S) -> RenderState
    where
        S: Stream<Item = Result<WsMessage, WsError>> + Unpin,
    {
        let message = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("no render state pushed")
            .unwrap()
            .unwrap();
        serde_json::from_str(message.to_text().unwrap()).unwrap()
    }

    fn frame(sequence: u64) -> LayerFrame {
        LayerFrame {
            sequence,
            layers: Vec::new(),
            panel: derive_panel(&[], ConnectionState::Open, 30),
        }
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json(create_router(state()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["sequence"], 0);
        assert_eq!(body["window"]["capacity"], 30);
    }

    #[tokio::test]
    async fn test_panel_before_first_frame() {
        let (status, body) = get_json(create_router(state()), "/api/v1/panel").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"]["label"], "OFFLINE");
        assert_eq!(body["placeholder"], "Waiting for traffic...");
    }

    #[tokio::test]
    async fn test_frame_follows_surface() {
        let state = state();
        state.surface.present(frame(7));

        let (_, body) = get_json(create_router(state.clone()), "/api/v1/frame").await;
        assert_eq!(body["sequence"], 7);
        assert_eq!(body["viewState"]["zoom"], 1.8);
        assert_eq!(body["panel"]["status"]["label"], "SYSTEM ONLINE");

        let (_, layers) = get_json(create_router(state), "/api/v1/layers").await;
        assert_eq!(layers, json!([]));
    }

    #[tokio::test]
    async fn test_view_update_is_sanitized() {
        let state = state();
        let (status, body) = put_view(
            create_router(state.clone()),
            json!({
                "longitude": 190.0,
                "latitude": 10.0,
                "zoom": 3.0,
                "pitch": 80.0,
                "bearing": 0.0
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["longitude"], -170.0);
        assert_eq!(body["pitch"], 60.0);
        assert_eq!(state.surface.view_state().zoom, 3.0);

        let (_, read_back) = get_json(create_router(state), "/api/v1/view").await;
        assert_eq!(read_back["pitch"], 60.0);
    }

    #[tokio::test]
    async fn test_malformed_view_rejected() {
        let state = state();
        let request = Request::builder()
            .method("PUT")
            .uri("/api/v1/view")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"longitude": "east"}"#))
            .unwrap();
        let response = create_router(state.clone()).oneshot(request).await.unwrap();

        assert!(response.status().is_client_error());
        assert_eq!(state.surface.view_state(), ViewState::default());
    }

    #[tokio::test]
    async fn test_stream_pushes_on_change() {
        let state = state();
        let surface = state.surface.clone();
        let app = create_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{}/api/v1/stream", addr))
            .await
            .unwrap();

        let initial = next_state(&mut ws).await;
        assert_eq!(initial.sequence, 0);
        assert!(initial.panel.is_none());

        surface.present(frame(1));
        let pushed = next_state(&mut ws).await;
        assert_eq!(pushed.sequence, 1);
        assert!(pushed.panel.is_some());
    }
}
