//! Invocation configuration for the domain layer
//!
//! A bridge invocation is described by a [`CommandChain`]: an ordered list of
//! typed command records where position *i* holds level *i*
//! (root → service → transport). The chain is validated in a single pass by
//! [`ToolServerConfigParser`] into the list of tool servers to connect to.
//!
//! ```text
//!  level 0 (root)        level 1 (service)     level 2 (transport)
//! ┌────────────────┐    ┌────────────────┐    ┌──────────────────────┐
//! │ main           │───▶│ mcpserver      │───▶│ stdio                │
//! │ prompt = "..." │    │                │    │ tools = [{name, ...}]│
//! └────────────────┘    └────────────────┘    └──────────────────────┘
//! ```

mod command;
mod context;
mod llm;
mod server;

pub use command::{CommandChain, CommandLevel, CommandRecord};
pub use context::Context;
pub use llm::{
    DEFAULT_MAX_TOKENS, DEFAULT_OPENAI_BASE_URL, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS,
    LlmConfig, env,
};
pub use server::{
    PROMPT_OPTION, SERVICE_MARKER, TOOLS_OPTION, TRANSPORT_MARKER, ToolServerConfig,
    ToolServerConfigParser,
};
