//! Tool Executor
//!
//! The [`ToolExecutor`] aggregates one [`ToolServerClient`] per configured
//! server and implements [`ToolExecutorPort`]. It handles catalog discovery,
//! namespacing, and call routing.
//!
//! # Usage
//!
//! ```ignore
//! use mcpbridge_infrastructure::tools::ToolExecutor;
//!
//! let executor = ToolExecutor::from_configs(&context.servers);
//!
//! // "fs" + "read_file" → "fs-read_file"
//! let tools = executor.get_tools_definition().await?;
//!
//! // Routed to the "fs" server as "read_file"
//! let request = ToolCallRequest::new("call_1", "fs-read_file").with_arg("path", "README.md");
//! let result = executor.call_tool(&request).await?;
//! ```
//!
//! # Ordering
//!
//! Servers are queried concurrently, but the catalog is assembled in
//! registration order, then in each server's own tool order, so it is
//! identical across calls for a fixed configuration.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::try_join_all;
use mcpbridge_application::{ToolExecutorError, ToolExecutorPort};
use mcpbridge_domain::{
    NormalizedToolResult, ToolCallRequest, ToolDefinition, ToolResultParser, ToolServerClient,
    ToolServerConfig,
};
use tracing::{debug, info, warn};

use super::stdio::StdioToolServerClient;

/// Tool executor that routes namespaced calls to their server
pub struct ToolExecutor {
    /// Registered servers, in configuration order
    servers: Vec<Arc<dyn ToolServerClient>>,
}

impl ToolExecutor {
    /// Create an executor with no servers
    pub fn new() -> Self {
        Self {
            servers: Vec::new(),
        }
    }

    /// One stdio client per configured server.
    pub fn from_configs(configs: &[ToolServerConfig]) -> Self {
        configs.iter().fold(Self::new(), |executor, config| {
            executor.register(StdioToolServerClient::new(config.clone()))
        })
    }

    /// Register a server client (builder pattern)
    pub fn register(mut self, server: impl ToolServerClient + 'static) -> Self {
        self.servers.push(Arc::new(server));
        self
    }

    /// Register a shared server client
    pub fn register_arc(mut self, server: Arc<dyn ToolServerClient>) -> Self {
        self.servers.push(server);
        self
    }

    /// Registered server names, in order
    pub fn server_names(&self) -> Vec<&str> {
        self.servers.iter().map(|s| s.server_name()).collect()
    }

    fn server(&self, name: &str) -> Option<&Arc<dyn ToolServerClient>> {
        self.servers.iter().find(|s| s.server_name() == name)
    }
}

impl Default for ToolExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolExecutorPort for ToolExecutor {
    async fn get_tools_definition(&self) -> Result<Vec<ToolDefinition>, ToolExecutorError> {
        if self.servers.is_empty() {
            return Err(ToolExecutorError::NoServers);
        }

        let catalogs = try_join_all(self.servers.iter().map(|server| async move {
            let tools = server.list_tools().await?;
            debug!(
                component = "tool_executor",
                server = server.server_name(),
                tools = tools.len(),
                "Listed tools"
            );
            Ok::<_, ToolExecutorError>(
                tools
                    .into_iter()
                    .map(|tool| tool.namespaced(server.server_name()))
                    .collect::<Vec<_>>(),
            )
        }))
        .await?;

        let tools: Vec<ToolDefinition> = catalogs.into_iter().flatten().collect();
        info!(
            component = "tool_executor",
            servers = self.servers.len(),
            tools = tools.len(),
            "Tool catalog assembled"
        );
        Ok(tools)
    }

    async fn call_tool(
        &self,
        request: &ToolCallRequest,
    ) -> Result<NormalizedToolResult, ToolExecutorError> {
        let (server_name, function_name) = request
            .route()
            .ok_or_else(|| ToolExecutorError::MissingNamespace(request.name.clone()))?;

        let server = self.server(server_name).ok_or_else(|| {
            warn!(
                component = "tool_executor",
                server = server_name,
                tool = %request.name,
                "No server registered for namespace"
            );
            ToolExecutorError::UnknownServer {
                server: server_name.to_string(),
                name: request.name.clone(),
            }
        })?;

        debug!(
            component = "tool_executor",
            server = server_name,
            function = function_name,
            call_id = %request.id,
            "Calling tool"
        );
        let raw = server.call_tool(function_name, &request.arguments).await?;

        ToolResultParser::parse(&request.id, &raw).map_err(|source| {
            ToolExecutorError::InvalidResult {
                name: request.name.clone(),
                source,
            }
        })
    }

    async fn close(&self) {
        for server in &self.servers {
            if let Err(e) = server.close().await {
                warn!(
                    component = "tool_executor",
                    server = server.server_name(),
                    error = %e,
                    "Failed to close tool server"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcpbridge_domain::{RawToolResult, ToolServerError};
    use serde_json::{Map, Value, json};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    // ==================== Test Mocks ====================

    struct MockServer {
        name: &'static str,
        tools: Vec<&'static str>,
        calls: Mutex<Vec<(String, Map<String, Value>)>>,
        result: RawToolResult,
        closed: AtomicBool,
    }

    impl MockServer {
        fn new(name: &'static str, tools: Vec<&'static str>) -> Self {
            Self {
                name,
                tools,
                calls: Mutex::new(Vec::new()),
                result: json!({"isError": false, "content": [{"type": "text", "text": "ok"}]}),
                closed: AtomicBool::new(false),
            }
        }

        fn with_result(mut self, result: RawToolResult) -> Self {
            self.result = result;
            self
        }
    }

    #[async_trait]
    impl ToolServerClient for MockServer {
        fn server_name(&self) -> &str {
            self.name
        }

        async fn list_tools(&self) -> Result<Vec<ToolDefinition>, ToolServerError> {
            Ok(self
                .tools
                .iter()
                .map(|t| ToolDefinition::new(*t, format!("{t} tool"), json!({"type": "object", "properties": {}})))
                .collect())
        }

        async fn call_tool(
            &self,
            function_name: &str,
            arguments: &Map<String, Value>,
        ) -> Result<RawToolResult, ToolServerError> {
            self.calls
                .lock()
                .unwrap()
                .push((function_name.to_string(), arguments.clone()));
            Ok(self.result.clone())
        }

        async fn close(&self) -> Result<(), ToolServerError> {
            self.closed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    struct BrokenServer;

    #[async_trait]
    impl ToolServerClient for BrokenServer {
        fn server_name(&self) -> &str {
            "broken"
        }

        async fn list_tools(&self) -> Result<Vec<ToolDefinition>, ToolServerError> {
            Err(ToolServerError::Transport {
                server: "broken".to_string(),
                reason: "stdout closed".to_string(),
            })
        }

        async fn call_tool(
            &self,
            _function_name: &str,
            _arguments: &Map<String, Value>,
        ) -> Result<RawToolResult, ToolServerError> {
            unreachable!()
        }
    }

    fn names(tools: &[ToolDefinition]) -> Vec<&str> {
        tools.iter().map(|t| t.name.as_str()).collect()
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_catalog_is_namespaced_and_ordered() {
        let executor = ToolExecutor::new()
            .register(MockServer::new("fs", vec!["read_file", "write_file"]))
            .register(MockServer::new("empty", vec![]))
            .register(MockServer::new("weather", vec!["get-forecast"]));

        let tools = executor.get_tools_definition().await.unwrap();
        assert_eq!(
            names(&tools),
            vec!["fs-read_file", "fs-write_file", "weather-get-forecast"]
        );
        assert_eq!(tools[0].description, "read_file tool");
    }

    #[tokio::test]
    async fn test_catalog_is_idempotent() {
        let executor = ToolExecutor::new()
            .register(MockServer::new("a", vec!["x", "y"]))
            .register(MockServer::new("b", vec!["z"]));

        let first = executor.get_tools_definition().await.unwrap();
        let second = executor.get_tools_definition().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_empty_executor_has_no_servers() {
        let err = ToolExecutor::new().get_tools_definition().await.unwrap_err();
        assert!(matches!(err, ToolExecutorError::NoServers));
    }

    #[tokio::test]
    async fn test_discovery_failure_propagates() {
        let executor = ToolExecutor::new()
            .register(MockServer::new("fs", vec!["read_file"]))
            .register(BrokenServer);
        let err = executor.get_tools_definition().await.unwrap_err();
        assert!(matches!(err, ToolExecutorError::Server(ToolServerError::Transport { .. })));
    }

    #[tokio::test]
    async fn test_call_routes_on_first_separator() {
        let weather = Arc::new(MockServer::new("weather", vec!["get-forecast"]));
        let executor = ToolExecutor::new()
            .register(MockServer::new("fs", vec!["read_file"]))
            .register_arc(weather.clone());

        let request = ToolCallRequest::new("call_7", "weather-get-forecast").with_arg("city", "Oslo");
        let result = executor.call_tool(&request).await.unwrap();

        assert!(result.success);
        assert_eq!(result.tool_call_id, "call_7");
        assert_eq!(result.text_content, "ok");

        let calls = weather.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "get-forecast");
        assert_eq!(calls[0].1["city"], "Oslo");
    }

    #[tokio::test]
    async fn test_unknown_server_is_routing_error() {
        let executor = ToolExecutor::new().register(MockServer::new("fs", vec!["read_file"]));

        let err = executor
            .call_tool(&ToolCallRequest::new("c1", "ghost-server-fn"))
            .await
            .unwrap_err();
        assert!(err.is_routing());
        match err {
            ToolExecutorError::UnknownServer { server, name } => {
                assert_eq!(server, "ghost");
                assert_eq!(name, "ghost-server-fn");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = executor
            .call_tool(&ToolCallRequest::new("c2", "read_file"))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolExecutorError::MissingNamespace(name) if name == "read_file"));
    }

    #[tokio::test]
    async fn test_malformed_result_is_structural_error() {
        let executor = ToolExecutor::new().register(
            MockServer::new("fs", vec!["read_file"]).with_result(json!({"content": []})),
        );
        let err = executor
            .call_tool(&ToolCallRequest::new("c1", "fs-read_file"))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolExecutorError::InvalidResult { name, .. } if name == "fs-read_file"));
    }

    #[tokio::test]
    async fn test_close_closes_every_server() {
        let a = Arc::new(MockServer::new("a", vec![]));
        let b = Arc::new(MockServer::new("b", vec![]));
        let executor = ToolExecutor::new().register_arc(a.clone()).register_arc(b.clone());

        executor.close().await;
        assert!(a.closed.load(Ordering::SeqCst));
        assert!(b.closed.load(Ordering::SeqCst));
        assert_eq!(executor.server_names(), vec!["a", "b"]);
    }
}
