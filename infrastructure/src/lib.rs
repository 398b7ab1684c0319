//! Infrastructure layer for mcpbridge
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: configuration loading, LLM provider clients, MCP tool
//! servers over stdio, prompt templates and the conversation transcript.

pub mod config;
pub mod logging;
pub mod prompt;
pub mod providers;
pub mod tools;

// Re-export commonly used types
pub use config::{ConfigLoader, FileLlmConfig};
pub use logging::JsonlConversationLogger;
pub use prompt::TemplatePromptBuilder;
pub use providers::{GeminiClient, OpenAiClient, ProviderClientFactory, ReqwestTransport};
pub use tools::{StdioToolServerClient, ToolExecutor};
