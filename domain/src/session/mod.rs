//! Conversation session domain.
//!
//! - [`entities::Message`]: a single role-tagged message
//! - [`entities::Conversation`]: the append-only message log of a session
//! - [`state::SessionState`]: states of the orchestration loop

pub mod entities;
pub mod state;
