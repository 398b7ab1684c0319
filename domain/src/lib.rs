//! Domain layer for mcpbridge
//!
//! This crate contains the core entities, value objects and pure logic of the
//! bridge between tool servers and an LLM. It has no dependencies on
//! infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Tool servers
//!
//! External processes exposing a catalog of callable tools. Each configured
//! server gets a unique name which becomes the namespace of its tools
//! (`"<server>-<tool>"`), so several servers share one flat catalog.
//!
//! ## Providers
//!
//! LLM services with their own wire format. [`LlmProvider`] is a closed enum;
//! tool conversion and tool-call extraction dispatch on it.
//!
//! ## Conversation
//!
//! The append-only, role-tagged message log exchanged with the LLM across
//! every turn of a session.

pub mod config;
pub mod core;
pub mod llm;
pub mod prompt;
pub mod session;
pub mod tool;

// Re-export commonly used types
pub use config::{
    CommandChain, CommandLevel, CommandRecord, Context, LlmConfig, ToolServerConfig,
    ToolServerConfigParser,
};
pub use core::error::ConfigurationError;
pub use llm::{Completion, LlmProvider, ToolValidationError};
pub use prompt::InitialPrompt;
pub use session::{
    entities::{Conversation, FunctionCall, Message, ToolCall},
    state::{AbortReason, SessionState},
};
pub use tool::{
    ErrorInfo, NormalizedToolResult, RawToolResult, StructuralValidationError, ToolCallRequest,
    ToolDefinition, ToolResultParser, ToolServerClient, ToolServerError,
};
