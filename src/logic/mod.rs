//! Logic Module - the attack map pipeline
//!
//! raw message → `event` (validate) → `window` (bounded FIFO) →
//! `layers` + `panel` (pure derivation) → `surface` (external renderer).
//!
//! ## Structure
//! - `event/` - payload schema and validator
//! - `connection/` - endpoint selection, WebSocket manager, reconnect policy
//! - `window.rs` - bounded event window
//! - `layers/` - basemap, arc and impact layer descriptors
//! - `panel.rs` - event log and status indicator
//! - `basemap.rs` - country polygon dataset
//! - `view.rs` - camera state
//! - `surface.rs` - render surface seam
//! - `session.rs` - ties one connection and one window together

// Data
pub mod event;
pub mod window;

// Connectivity
pub mod connection;

// Derivation & presentation
pub mod basemap;
pub mod layers;
pub mod panel;
pub mod surface;
pub mod view;

// Orchestration
pub mod session;


pub use session::{Ingest, Session, SessionStats};
