//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod conversation_logger;
pub mod llm_client;
pub mod llm_transport;
pub mod prompt_builder;
pub mod tool_executor;
