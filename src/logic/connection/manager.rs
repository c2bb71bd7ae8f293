//! Connection Manager
//!
//! Owns the single live WebSocket to the event source. A background task does
//! the handshake and reads frames; everything it observes is published as
//! `ConnectionEvent`s on a bounded broadcast channel. A consumer that falls
//! behind loses the oldest queued events, never the newest.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;

use super::endpoint::Endpoint;
use super::ConnectionError;
use crate::constants::CONNECTION_EVENT_QUEUE;

const CLOSE_FRAME_TIMEOUT: Duration = Duration::from_secs(2);
const CLIENT_CLOSE_REASON: &str = "closed by client";

// ============================================================================
// TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::Closed => "closed",
        }
    }
}

/// Observable transitions of one connection
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionEvent {
    Opened,
    Message(String),
    Closed { reason: Option<String> },
}

struct ConnectionHandle {
    endpoint: Endpoint,
    state: Arc<RwLock<ConnectionState>>,
    shutdown: Option<oneshot::Sender<()>>,
    _task: JoinHandle<()>,
}

// ============================================================================
// MANAGER
// ============================================================================

pub struct ConnectionManager {
    handle: Option<ConnectionHandle>,
    queue: usize,
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Event queue length that can never lag away an event a window of
/// `window_capacity` would still hold: room for the whole window plus the
/// Opened and Closed transitions
pub fn event_queue_len(window_capacity: usize) -> usize {
    CONNECTION_EVENT_QUEUE.max(window_capacity.saturating_add(2))
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self::with_queue(CONNECTION_EVENT_QUEUE)
    }

    /// Manager whose connections queue up to `queue` events (at least 1)
    pub fn with_queue(queue: usize) -> Self {
        Self {
            handle: None,
            queue: queue.max(1),
        }
    }

    pub fn queue_len(&self) -> usize {
        self.queue
    }

    /// Start connecting to `endpoint`. Must be called inside a tokio runtime.
    ///
    /// Fails with `AlreadyOpen` while a previous handle is still connecting or
    /// open; a handle whose connection already closed is replaced.
    pub fn open(
        &mut self,
        endpoint: &Endpoint,
    ) -> Result<broadcast::Receiver<ConnectionEvent>, ConnectionError> {
        if let Some(handle) = &self.handle {
            if *handle.state.read() != ConnectionState::Closed {
                return Err(ConnectionError::AlreadyOpen(handle.endpoint.url.clone()));
            }
        }
        self.handle = None;

        let (events_tx, events_rx) = broadcast::channel(self.queue);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let state = Arc::new(RwLock::new(ConnectionState::Connecting));

        tracing::info!(url = %endpoint.url, secure = endpoint.secure, "Connecting to event source");

        let task = tokio::spawn(run_connection(
            endpoint.url.clone(),
            state.clone(),
            events_tx,
            shutdown_rx,
        ));

        self.handle = Some(ConnectionHandle {
            endpoint: endpoint.clone(),
            state,
            shutdown: Some(shutdown_tx),
            _task: task,
        });

        Ok(events_rx)
    }

    /// Current state; Closed when no handle is live
    pub fn state(&self) -> ConnectionState {
        self.handle
            .as_ref()
            .map(|h| *h.state.read())
            .unwrap_or(ConnectionState::Closed)
    }

    pub fn endpoint(&self) -> Option<&Endpoint> {
        self.handle.as_ref().map(|h| &h.endpoint)
    }

    /// Tear down the live connection. Idempotent, safe before Open.
    pub fn close(&mut self) {
        let Some(mut handle) = self.handle.take() else {
            return;
        };

        if let Some(shutdown) = handle.shutdown.take() {
            let _ = shutdown.send(());
        }
        *handle.state.write() = ConnectionState::Closed;
        tracing::debug!(url = %handle.endpoint.url, "Connection handle released");
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        self.close();
    }
}

// ============================================================================
// CONNECTION TASK
// ============================================================================

async fn run_connection(
    url: String,
    state: Arc<RwLock<ConnectionState>>,
    events: broadcast::Sender<ConnectionEvent>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let stream = tokio::select! {
        _ = &mut shutdown => {
            finish(&state, &events, Some(CLIENT_CLOSE_REASON.to_string()));
            return;
        }
        result = tokio_tungstenite::connect_async(url.as_str()) => match result {
            Ok((stream, _response)) => stream,
            Err(e) => {
                tracing::warn!("Event source unreachable ({}): {}", url, e);
                finish(&state, &events, Some(e.to_string()));
                return;
            }
        },
    };

    *state.write() = ConnectionState::Open;
    let _ = events.send(ConnectionEvent::Opened);
    tracing::info!("Event source connected: {}", url);

    let (mut write, mut read) = stream.split();

    let reason = loop {
        tokio::select! {
            _ = &mut shutdown => {
                let close = write.send(Message::Close(None));
                let _ = tokio::time::timeout(CLOSE_FRAME_TIMEOUT, close).await;
                break Some(CLIENT_CLOSE_REASON.to_string());
            }
            item = read.next() => match item {
                Some(Ok(Message::Text(text))) => {
                    let _ = events.send(ConnectionEvent::Message(text));
                }
                Some(Ok(Message::Binary(bytes))) => match String::from_utf8(bytes) {
                    Ok(text) => {
                        let _ = events.send(ConnectionEvent::Message(text));
                    }
                    Err(_) => tracing::debug!("Dropping non UTF-8 binary frame"),
                },
                Some(Ok(Message::Close(frame))) => {
                    break frame.map(|f| f.reason.to_string()).filter(|r| !r.is_empty());
                }
                // ping/pong are answered by tungstenite
                Some(Ok(_)) => {}
                Some(Err(e)) => break Some(e.to_string()),
                None => break None,
            },
        }
    };

    tracing::warn!("Event source closed: {} ({})", url, reason.as_deref().unwrap_or("no reason"));
    finish(&state, &events, reason);
}

fn finish(
    state: &RwLock<ConnectionState>,
    events: &broadcast::Sender<ConnectionEvent>,
    reason: Option<String>,
) {
    *state.write() = ConnectionState::Closed;
    let _ = events.send(ConnectionEvent::Closed { reason });
}
