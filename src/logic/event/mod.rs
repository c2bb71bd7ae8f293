//! Event Schema & Validator
//!
//! ## Structure
//! - `types.rs` - AttackPayload (validated wire data) and AttackEvent (admitted)
//! - `validate.rs` - defensive parsing of raw messages

pub mod types;
pub mod validate;

pub use types::{AttackEvent, AttackPayload, DEFAULT_MAGNITUDE, UNKNOWN_ATTACK_TYPE};
pub use validate::{decode, validate, Rejected};
