//! Connection Module - link to the event source
//!
//! This module handles:
//! - Endpoint selection (dev host vs deployed host)
//! - The single live WebSocket and its state
//! - The reconnect policy the session applies after a close

pub mod endpoint;
pub mod manager;
pub mod reconnect;

pub use endpoint::{check_page_host, select_endpoint, Endpoint};
pub use manager::{event_queue_len, ConnectionEvent, ConnectionManager, ConnectionState};
pub use reconnect::{Backoff, ReconnectPolicy};

/// Connection errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConnectionError {
    #[error("a connection to {0} is already live")]
    AlreadyOpen(String),

    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}
