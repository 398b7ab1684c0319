//! Tool Executor port
//!
//! Defines the interface the session uses to discover and call tools across
//! every configured tool server.

use async_trait::async_trait;
use mcpbridge_domain::{
    NormalizedToolResult, StructuralValidationError, ToolCallRequest, ToolDefinition,
    ToolServerError,
};
use thiserror::Error;

/// Errors from tool discovery or execution. All of them are fatal to the
/// session.
#[derive(Error, Debug)]
pub enum ToolExecutorError {
    #[error("Tool name '{0}' has no server namespace")]
    MissingNamespace(String),

    #[error("Unknown tool server '{server}' for tool '{name}'")]
    UnknownServer { server: String, name: String },

    #[error("Invalid result from tool '{name}': {source}")]
    InvalidResult {
        name: String,
        #[source]
        source: StructuralValidationError,
    },

    #[error(transparent)]
    Server(#[from] ToolServerError),

    #[error("No tool servers are registered")]
    NoServers,
}

impl ToolExecutorError {
    /// Whether the call could not be routed to a server.
    pub fn is_routing(&self) -> bool {
        matches!(
            self,
            ToolExecutorError::MissingNamespace(_) | ToolExecutorError::UnknownServer { .. }
        )
    }
}

/// Port for tool discovery and execution
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// The flat, namespaced catalog of every configured server.
    async fn get_tools_definition(&self) -> Result<Vec<ToolDefinition>, ToolExecutorError>;

    /// Route a namespaced call to its server and normalize the result.
    async fn call_tool(
        &self,
        request: &ToolCallRequest,
    ) -> Result<NormalizedToolResult, ToolExecutorError>;

    /// Release every server connection.
    async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_errors() {
        let err = ToolExecutorError::UnknownServer {
            server: "ghost".to_string(),
            name: "ghost-server-fn".to_string(),
        };
        assert!(err.is_routing());
        assert_eq!(
            err.to_string(),
            "Unknown tool server 'ghost' for tool 'ghost-server-fn'"
        );

        let err = ToolExecutorError::InvalidResult {
            name: "fs-read".to_string(),
            source: StructuralValidationError::MissingIsError,
        };
        assert!(!err.is_routing());
        assert!(!ToolExecutorError::NoServers.is_routing());
    }
}
