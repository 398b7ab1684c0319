//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod llm_executor;
pub mod session;
