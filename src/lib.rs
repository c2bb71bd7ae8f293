//! Attack Map - live network-attack map pipeline
//!
//! Receives attack events over a WebSocket, keeps the most recent N in a
//! bounded window and derives the map layers and the event log from that
//! window on every change.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       ATTACK MAP                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌────────────┐   ┌──────────────────────────────────────┐  │
//! │  │ Connection │──▶│  Session task                        │  │
//! │  │ (ws / wss) │   │  validate → window → layers + panel  │  │
//! │  └────────────┘   └──────────────────┬───────────────────┘  │
//! │                                      ▼                      │
//! │                          ┌──────────────────────┐           │
//! │                          │ Render surface       │           │
//! │                          │ (frame + view state) │           │
//! │                          └──────────┬───────────┘           │
//! │                                     ▼                       │
//! │                          ┌──────────────────────┐           │
//! │                          │ Frame server (Axum)  │           │
//! │                          └──────────────────────┘           │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod logic;
pub mod server;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use logic::{Ingest, Session, SessionStats};
pub use server::{create_router, AppState};
