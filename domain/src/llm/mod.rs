//! LLM provider domain
//!
//! Provider-specific logic that needs no I/O: converting tool catalogs into
//! each provider's function-calling schema, detecting tool-call requests in a
//! raw completion and extracting them as [`ToolCallRequest`]s.
//!
//! ```text
//!             ┌─────────────── LlmProvider ───────────────┐
//!             │ convert_tools │ need_tools_call │ prepare │
//!             └───────┬───────────────┬─────────────┬─────┘
//!                     ▼               ▼             ▼
//!                 openai::*       gemini::*     tool_converter
//! ```
//!
//! [`ToolCallRequest`]: crate::tool::ToolCallRequest

mod arguments;
pub mod completion;
pub mod gemini;
pub mod openai;
pub mod provider;
pub mod tool_converter;

pub use completion::Completion;
pub use provider::LlmProvider;
pub use tool_converter::{SUPPORTED_PARAMETER_TYPES, ToolValidationError, validate_tool};
