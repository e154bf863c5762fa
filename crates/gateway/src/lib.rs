//! PlantChat gateway — the HTTP face of the chat relay.
//!
//! Handlers validate input, resolve the per-variant policy, run the session
//! append/upstream/sanitize/trim pipeline in [`exchange`], and map every
//! failure onto the HTTP error taxonomy.

pub mod api;
pub mod bootstrap;
pub mod cli;
pub mod exchange;
pub mod sanitize;
pub mod state;
