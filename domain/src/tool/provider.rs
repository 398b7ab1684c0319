//! Tool server client abstraction
//!
//! A [`ToolServerClient`] is the capability the bridge needs from one external
//! tool server: list its catalog and call a function by its server-local name.
//! Wire protocol and process management live behind this trait in the
//! infrastructure layer.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                ToolExecutor                  │
//! │  (namespaces catalogs, routes "srv-fn")      │
//! └──────────────────────────────────────────────┘
//!        │                 │                 │
//!        ▼                 ▼                 ▼
//!  ┌──────────┐      ┌──────────┐      ┌──────────┐
//!  │ "fs"     │      │ "git"    │      │ "web"    │
//!  │ client   │      │ client   │      │ client   │
//!  └──────────┘      └──────────┘      └──────────┘
//! ```

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use super::entities::ToolDefinition;
use super::value_objects::RawToolResult;

/// Error type for tool server operations
#[derive(Debug, Error)]
pub enum ToolServerError {
    /// The server process could not be started
    #[error("Failed to start tool server '{server}': {source}")]
    Spawn {
        server: String,
        #[source]
        source: std::io::Error,
    },

    /// The connection to the server broke or was never established
    #[error("Transport error with tool server '{server}': {reason}")]
    Transport { server: String, reason: String },

    /// The server answered with a JSON-RPC error
    #[error("Tool server '{server}' returned error {code}: {message}")]
    Rpc {
        server: String,
        code: i64,
        message: String,
    },

    /// The server answered with something that is not the expected shape
    #[error("Invalid response from tool server '{server}': {reason}")]
    InvalidResponse { server: String, reason: String },
}

/// Capability exposed by one tool server.
///
/// Implementations open their connection lazily on first use and release it
/// in [`close`](Self::close).
#[async_trait]
pub trait ToolServerClient: Send + Sync {
    /// Name of the server; the namespace of its tools.
    fn server_name(&self) -> &str;

    /// The server's tool catalog, with server-local names, in server order.
    async fn list_tools(&self) -> Result<Vec<ToolDefinition>, ToolServerError>;

    /// Invoke a function by its server-local name.
    async fn call_tool(
        &self,
        function_name: &str,
        arguments: &Map<String, Value>,
    ) -> Result<RawToolResult, ToolServerError>;

    /// Release the connection. Safe to call when never opened.
    async fn close(&self) -> Result<(), ToolServerError> {
        Ok(())
    }
}
