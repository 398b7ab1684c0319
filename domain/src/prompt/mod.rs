//! Prompt domain
//!
//! The initial system/user message pair that seeds every conversation.

mod initial;

pub use initial::InitialPrompt;
