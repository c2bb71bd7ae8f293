//! Session - one viewing session of the attack map
//!
//! Owns the event window and the connection for its lifetime. Every connection
//! event is handled on the session's task, in order: validate → admit →
//! derive layers and panel → present. Readers of the window (via
//! `SharedWindow`) only ever see whole admissions.

use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::Instrument;
use uuid::Uuid;

use super::basemap::BasemapData;
use super::connection::{
    event_queue_len, Backoff, ConnectionEvent, ConnectionManager, ConnectionState, Endpoint,
    ReconnectPolicy,
};
use super::event::{self, AttackEvent, AttackPayload, Rejected};
use super::layers::{derive_layers, LayerStyle};
use super::panel::derive_panel;
use super::surface::{LayerFrame, RenderSurface};
use super::window::{Admit, SharedWindow};
use crate::config::Config;
use crate::error::AppResult;

/// Result of ingesting one raw message
#[derive(Debug, Clone, PartialEq)]
pub enum Ingest {
    Admitted { id: u64, evicted: Option<u64> },
    Rejected(Rejected),
}

/// Pipeline counters, logged at teardown
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionStats {
    pub received: u64,
    pub admitted: u64,
    pub rejected: u64,
    pub evicted: u64,
    /// Connection events skipped because the session fell behind
    pub skipped: u64,
    pub connections: u64,
}

pub struct Session {
    id: Uuid,
    endpoint: Endpoint,
    reconnect: ReconnectPolicy,
    feed_limit: usize,
    window: SharedWindow,
    connection: ConnectionManager,
    basemap: BasemapData,
    style: LayerStyle,
    surface: Arc<dyn RenderSurface>,
    next_event_id: u64,
    sequence: u64,
    stats: SessionStats,
}

impl Session {
    pub fn new(
        config: &Config,
        surface: Arc<dyn RenderSurface>,
        basemap: BasemapData,
    ) -> AppResult<Self> {
        config.validate()?;
        let endpoint = config.endpoint()?;

        Ok(Self {
            id: Uuid::new_v4(),
            endpoint,
            reconnect: config.reconnect,
            feed_limit: config.feed_limit,
            window: SharedWindow::new(config.window_capacity),
            connection: ConnectionManager::with_queue(event_queue_len(config.window_capacity)),
            basemap,
            style: LayerStyle::default(),
            surface,
            next_event_id: 1,
            sequence: 0,
            stats: SessionStats::default(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Read handle on the window for other tasks
    pub fn window(&self) -> SharedWindow {
        self.window.clone()
    }

    pub fn snapshot(&self) -> Vec<AttackEvent> {
        self.window.snapshot()
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    // ========================================================================
    // PIPELINE
    // ========================================================================

    /// Validate one raw message and admit it. Rejections leave the window and
    /// the presented layers untouched.
    pub fn ingest(&mut self, raw: &str) -> Ingest {
        self.stats.received += 1;

        match event::decode(raw) {
            Ok(payload) => self.admit_payload(payload),
            Err(reason) => {
                self.stats.rejected += 1;
                tracing::debug!("Dropping message: {}", reason);
                Ingest::Rejected(reason)
            }
        }
    }

    /// Stamp a validated payload and admit it to the window
    pub fn admit_payload(&mut self, payload: AttackPayload) -> Ingest {
        let id = self.next_event_id;
        let event = AttackEvent::stamp(payload, id, Utc::now());

        match self.window.admit(event) {
            Admit::Admitted { evicted } => {
                self.next_event_id += 1;
                self.stats.admitted += 1;
                if evicted.is_some() {
                    self.stats.evicted += 1;
                }
                self.publish();
                Ingest::Admitted { id, evicted: evicted.map(|e| e.id) }
            }
            Admit::Refused => {
                self.stats.rejected += 1;
                tracing::debug!("Dropping event: {}", Rejected::Unplottable);
                Ingest::Rejected(Rejected::Unplottable)
            }
        }
    }

    pub fn handle_event(&mut self, event: ConnectionEvent) {
        match event {
            ConnectionEvent::Opened => {
                self.stats.connections += 1;
                tracing::info!("Live feed open ({})", self.endpoint.url);
                self.publish();
            }
            ConnectionEvent::Message(raw) => {
                self.ingest(&raw);
            }
            ConnectionEvent::Closed { reason } => {
                tracing::warn!(
                    "Live feed closed: {} ({} events kept)",
                    reason.as_deref().unwrap_or("no reason"),
                    self.window.len()
                );
                self.publish();
            }
        }
    }

    /// Re-derive every layer and the panel from the current snapshot and hand
    /// them to the surface
    pub fn publish(&mut self) {
        let snapshot = self.window.snapshot();
        self.sequence += 1;

        let frame = LayerFrame {
            sequence: self.sequence,
            layers: derive_layers(&snapshot, &self.basemap, &self.style),
            panel: derive_panel(&snapshot, self.connection.state(), self.feed_limit),
        };
        self.surface.present(frame);
    }

    // ========================================================================
    // CONNECTION LIFECYCLE
    // ========================================================================

    /// Open the connection and present the Connecting state
    pub fn open(&mut self) -> AppResult<broadcast::Receiver<ConnectionEvent>> {
        let events = self.connection.open(&self.endpoint)?;
        self.publish();
        Ok(events)
    }

    /// Drain connection events until the connection closes. Returns whether it
    /// ever delivered anything (used to reset the backoff).
    pub async fn pump(&mut self, events: &mut broadcast::Receiver<ConnectionEvent>) -> bool {
        let mut delivered = false;
        loop {
            match events.recv().await {
                Ok(event) => {
                    let closed = matches!(event, ConnectionEvent::Closed { .. });
                    if !closed {
                        delivered = true;
                    }
                    self.handle_event(event);
                    if closed {
                        return delivered;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    self.stats.skipped += skipped;
                    tracing::debug!("Session behind the feed, skipped {} oldest events", skipped);
                }
                Err(RecvError::Closed) => {
                    self.publish();
                    return delivered;
                }
            }
        }
    }

    /// Run until `shutdown` resolves, re-opening per the reconnect policy
    pub async fn run<F>(&mut self, shutdown: F) -> AppResult<()>
    where
        F: Future<Output = ()>,
    {
        let span = tracing::info_span!("session", id = %self.id);
        self.run_inner(shutdown).instrument(span).await
    }

    async fn run_inner<F>(&mut self, shutdown: F) -> AppResult<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        let mut backoff = Backoff::new(self.reconnect);

        loop {
            let mut events = self.open()?;

            let outcome = tokio::select! {
                _ = &mut shutdown => None,
                delivered = self.pump(&mut events) => Some(delivered),
            };
            let Some(delivered) = outcome else {
                self.close();
                return Ok(());
            };

            self.connection.close();
            if delivered {
                backoff.reset();
            }

            let Some(delay) = backoff.next_delay() else {
                tracing::info!("Reconnect disabled, staying offline");
                (&mut shutdown).await;
                return Ok(());
            };

            tracing::info!(
                "Reconnecting in {}ms (attempt {})",
                delay.as_millis(),
                backoff.attempts()
            );
            tokio::select! {
                _ = &mut shutdown => return Ok(()),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    /// Close the connection, keeping the window. Idempotent.
    pub fn close(&mut self) {
        let was_live = self.connection.state() != ConnectionState::Closed;
        self.connection.close();
        if was_live {
            self.publish();
        }
    }

    /// End the session: close the connection and discard the window
    pub fn teardown(mut self) {
        let state = self.connection.state();
        self.connection.close();
        self.window.clear();
        tracing::info!(
            session = %self.id,
            state = state.as_str(),
            received = self.stats.received,
            admitted = self.stats.admitted,
            rejected = self.stats.rejected,
            evicted = self.stats.evicted,
            skipped = self.stats.skipped,
            "Session torn down"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::surface::FrameSurface;
    use crate::logic::view::ViewState;

    fn session(capacity: usize) -> (Session, Arc<FrameSurface>) {
        let surface = Arc::new(FrameSurface::new(ViewState::default()));
        let config = Config { window_capacity: capacity, ..Config::default() };
        let session = Session::new(
            &config,
            surface.clone(),
            BasemapData::Url("https://example.invalid/world.geojson".to_string()),
        )
        .unwrap();
        (session, surface)
    }

    #[test]
    fn test_ingest_assigns_increasing_ids() {
        let (mut session, surface) = session(5);
        let msg = r#"{"src_lon":1,"src_lat":2,"dst_lon":3,"dst_lat":4}"#;

        assert_eq!(session.ingest(msg), Ingest::Admitted { id: 1, evicted: None });
        assert_eq!(session.ingest(msg), Ingest::Admitted { id: 2, evicted: None });
        assert_eq!(surface.latest_frame().unwrap().sequence, 2);
        assert_eq!(session.stats().admitted, 2);
    }

    #[test]
    fn test_rejected_message_does_not_publish() {
        let (mut session, surface) = session(5);
        session.ingest(r#"{"src_lon":1,"src_lat":2,"dst_lon":3,"dst_lat":4}"#);
        let before = surface.latest_frame().unwrap();

        let result = session.ingest("not json at all");
        assert!(matches!(result, Ingest::Rejected(Rejected::MalformedJson(_))));
        assert_eq!(session.snapshot().len(), 1);
        assert_eq!(surface.latest_frame().unwrap(), before);
        assert_eq!(session.stats().rejected, 1);
    }

    #[test]
    fn test_unplottable_payload_refused() {
        let (mut session, surface) = session(5);
        let payload = AttackPayload::new(f64::NAN, 0.0, 200.0, 0.0);

        assert_eq!(session.admit_payload(payload), Ingest::Rejected(Rejected::Unplottable));
        assert!(session.snapshot().is_empty());
        assert!(surface.latest_frame().is_none());
        assert_eq!(session.stats().rejected, 1);

        // the refused event does not consume an id
        let msg = r#"{"src_lon":1,"src_lat":2,"dst_lon":3,"dst_lat":4}"#;
        assert_eq!(session.ingest(msg), Ingest::Admitted { id: 1, evicted: None });
    }

    #[test]
    fn test_invalid_config_refused() {
        let surface = Arc::new(FrameSurface::new(ViewState::default()));
        let config = Config { window_capacity: 0, ..Config::default() };
        assert!(Session::new(&config, surface, BasemapData::Url(String::new())).is_err());
    }

    #[test]
    fn test_teardown_clears_window() {
        let (mut session, _surface) = session(5);
        session.ingest(r#"{"src_lon":1,"src_lat":2,"dst_lon":3,"dst_lat":4}"#);
        let reader = session.window();
        assert_eq!(reader.len(), 1);

        session.teardown();
        assert!(reader.is_empty());
    }
}
