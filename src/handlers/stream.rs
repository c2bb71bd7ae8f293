//! Render state stream
//!
//! Pushes the full `RenderState` as a JSON text frame on connect and again every
//! time the frame or the camera changes. Intermediate changes a slow client
//! misses are coalesced; it always receives the newest state.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};

use crate::logic::surface::FrameSurface;
use crate::server::AppState;

pub async fn subscribe(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| push_render_state(socket, state.surface))
}

async fn push_render_state(mut socket: WebSocket, surface: Arc<FrameSurface>) {
    let mut changes = surface.subscribe();
    changes.borrow_and_update();
    tracing::debug!("Renderer subscribed");

    if send_state(&mut socket, &surface).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                changes.borrow_and_update();
                if send_state(&mut socket, &surface).await.is_err() {
                    break;
                }
            }
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                // renderers only listen; anything they send is ignored
                Some(Ok(_)) => {}
            },
        }
    }

    tracing::debug!("Renderer unsubscribed");
}

async fn send_state(socket: &mut WebSocket, surface: &FrameSurface) -> Result<(), ()> {
    let text = match serde_json::to_string(&surface.render_state()) {
        Ok(text) => text,
        Err(e) => {
            tracing::error!("Failed to encode render state: {}", e);
            return Err(());
        }
    };
    socket.send(Message::Text(text)).await.map_err(|_| ())
}
