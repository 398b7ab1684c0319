//! Application layer for mcpbridge
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ExecutionParams;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    llm_client::{CompletionOptions, ConfiguredLlmClient, LlmClient, LlmClientFactory, LlmError},
    llm_transport::{HttpResponse, LlmTransport, TransportError},
    prompt_builder::{PromptBuilderPort, PromptError},
    tool_executor::{ToolExecutorError, ToolExecutorPort},
};
pub use use_cases::llm_executor::LlmExecutor;
pub use use_cases::session::{Session, SessionError, SessionOutcome};
