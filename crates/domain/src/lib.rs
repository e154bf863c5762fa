//! Shared domain types for PlantChat.
//!
//! Everything the other crates agree on lives here: the conversation
//! `Turn`/`Role` model, the error taxonomy, and the configuration tree.

pub mod config;
pub mod error;
pub mod turn;

pub use error::{Error, Result};
pub use turn::{Role, Turn};
