//! Tool domain module
//!
//! This module defines how tools hosted by external tool servers are
//! described, requested, and how their results are normalized.
//!
//! # Overview
//!
//! ```text
//! ┌────────────────┐    ┌─────────────────┐    ┌─────────────────────┐
//! │ ToolDefinition │───▶│ ToolCallRequest │───▶│ RawToolResult       │
//! │ "fs-read_file" │    │ (from the LLM)  │    │ (from the server)   │
//! └────────────────┘    └─────────────────┘    └──────────┬──────────┘
//!                                                         │ ToolResultParser
//!                                                         ▼
//!                                              ┌─────────────────────┐
//!                                              │ NormalizedToolResult│
//!                                              └─────────────────────┘
//! ```
//!
//! # Namespacing
//!
//! Tools from several servers share one flat catalog. Each tool name is
//! prefixed with its server name and [`NAMESPACE_SEPARATOR`]
//! (`"fs" + "read_file"` → `"fs-read_file"`). Splitting on the **first**
//! separator recovers the pair, so server names must not contain it; the
//! function part may.
//!
//! # Key Types
//!
//! - [`ToolDefinition`]: catalog entry advertised by a tool server
//! - [`ToolCallRequest`]: invocation requested by the LLM
//! - [`ToolServerClient`]: capability trait implemented per tool server
//! - [`ToolResultParser`]: raw result → [`NormalizedToolResult`]

pub mod entities;
pub mod provider;
pub mod result_parser;
pub mod value_objects;

pub use entities::{
    NAMESPACE_SEPARATOR, ToolCallRequest, ToolDefinition, namespaced_name, split_namespaced_name,
};
pub use provider::{ToolServerClient, ToolServerError};
pub use result_parser::{StructuralValidationError, ToolResultParser};
pub use value_objects::{ErrorInfo, NormalizedToolResult, RawToolResult};
