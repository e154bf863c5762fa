//! Session management for PlantChat.
//!
//! One process-wide store maps session keys to rolling conversation
//! transcripts: creation seeds the system turn, appends record user and
//! assistant turns, trimming bounds the transcript length, and an idle
//! policy supports eviction of abandoned sessions.

pub mod lifecycle;
pub mod store;

pub use lifecycle::IdlePolicy;
pub use store::{SessionStore, SessionSummary};
