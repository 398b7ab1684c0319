//! MCP tool server client over a child process's stdio.
//!
//! The server process (`<command> <path>`) is spawned on first use. Each
//! new connection performs the MCP handshake (`initialize`, then
//! `notifications/initialized`) before any other request and is kept for
//! the rest of the session.

use std::collections::HashSet;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use mcpbridge_domain::{
    RawToolResult, ToolDefinition, ToolServerClient, ToolServerConfig, ToolServerError,
};
use serde_json::{Map, Value, json};
use tokio::io::{AsyncRead, AsyncWrite, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::protocol::{
    ListToolsResult, METHOD_INITIALIZE, METHOD_INITIALIZED, METHOD_TOOLS_CALL, METHOD_TOOLS_LIST,
    initialize_params,
};
use super::transport::JsonRpcConnection;

/// How long a server may take to exit after its stdin is closed.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

type BoxedReader = BufReader<Box<dyn AsyncRead + Send + Unpin>>;
type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

struct Connection {
    rpc: JsonRpcConnection<BoxedReader, BoxedWriter>,
    /// Absent when the streams were supplied directly.
    child: Option<Child>,
    initialized: bool,
}

impl Connection {
    fn new(
        server: &str,
        reader: impl AsyncRead + Send + Unpin + 'static,
        writer: impl AsyncWrite + Send + Unpin + 'static,
        child: Option<Child>,
    ) -> Self {
        let reader: Box<dyn AsyncRead + Send + Unpin> = Box::new(reader);
        let writer: BoxedWriter = Box::new(writer);
        Self {
            rpc: JsonRpcConnection::new(server, BufReader::new(reader), writer),
            child,
            initialized: false,
        }
    }
}

/// [`ToolServerClient`] for one configured stdio tool server.
pub struct StdioToolServerClient {
    config: ToolServerConfig,
    connection: Mutex<Option<Connection>>,
}

impl StdioToolServerClient {
    pub fn new(config: ToolServerConfig) -> Self {
        Self {
            config,
            connection: Mutex::new(None),
        }
    }

    /// Talk over already connected streams instead of spawning a process.
    pub fn from_streams(
        config: ToolServerConfig,
        reader: impl AsyncRead + Send + Unpin + 'static,
        writer: impl AsyncWrite + Send + Unpin + 'static,
    ) -> Self {
        let connection = Connection::new(&config.name, reader, writer, None);
        Self {
            config,
            connection: Mutex::new(Some(connection)),
        }
    }

    fn spawn(&self) -> Result<Connection, ToolServerError> {
        let spawn_error = |source| ToolServerError::Spawn {
            server: self.config.name.clone(),
            source,
        };

        info!(
            component = "stdio",
            server = %self.config.name,
            command = %self.config.command,
            path = %self.config.path,
            "Starting tool server"
        );

        let mut cmd = Command::new(&self.config.command);
        cmd.arg(&self.config.path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        // Linux: request kernel to send SIGTERM to child when parent dies.
        // This catches cases where Drop doesn't run (SIGKILL, OOM kill).
        #[cfg(target_os = "linux")]
        unsafe {
            cmd.pre_exec(|| {
                libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGTERM);
                Ok(())
            });
        }

        let mut child = cmd.spawn().map_err(spawn_error)?;
        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| spawn_error(std::io::Error::other("failed to capture stdin")))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| spawn_error(std::io::Error::other("failed to capture stdout")))?;

        Ok(Connection::new(&self.config.name, stdout, stdin, Some(child)))
    }

    async fn handshake(&self, connection: &mut Connection) -> Result<(), ToolServerError> {
        let result = connection
            .rpc
            .request(METHOD_INITIALIZE, Some(initialize_params()))
            .await?;
        let protocol = result.get("protocolVersion").and_then(|v| v.as_str());
        debug!(
            component = "stdio",
            server = %self.config.name,
            protocol,
            server_info = %result.get("serverInfo").cloned().unwrap_or_default(),
            "Tool server initialized"
        );
        connection.rpc.notify(METHOD_INITIALIZED, None).await?;
        connection.initialized = true;
        Ok(())
    }

    /// Send a request over the initialized connection, opening it first
    /// if needed.
    async fn request(&self, method: &str, params: Option<Value>) -> Result<Value, ToolServerError> {
        let mut guard = self.connection.lock().await;
        if guard.is_none() {
            *guard = Some(self.spawn()?);
        }
        let Some(connection) = guard.as_mut() else {
            return Err(ToolServerError::Transport {
                server: self.config.name.clone(),
                reason: "not connected".to_string(),
            });
        };

        if !connection.initialized {
            self.handshake(connection).await?;
        }
        connection.rpc.request(method, params).await
    }
}

#[async_trait]
impl ToolServerClient for StdioToolServerClient {
    fn server_name(&self) -> &str {
        &self.config.name
    }

    async fn list_tools(&self) -> Result<Vec<ToolDefinition>, ToolServerError> {
        let mut tools = Vec::new();
        let mut cursor: Option<String> = None;
        let mut seen_cursors = HashSet::new();

        loop {
            let params = cursor.as_ref().map(|c| json!({"cursor": c}));
            let result = self.request(METHOD_TOOLS_LIST, params).await?;
            let page: ListToolsResult =
                serde_json::from_value(result).map_err(|e| ToolServerError::InvalidResponse {
                    server: self.config.name.clone(),
                    reason: format!("invalid tools/list result: {e}"),
                })?;

            tools.extend(page.tools);
            match page.next_cursor {
                Some(next) if !next.is_empty() => {
                    if !seen_cursors.insert(next.clone()) {
                        warn!(
                            component = "stdio",
                            server = %self.config.name,
                            cursor = %next,
                            "Tool server repeated a pagination cursor, stopping"
                        );
                        break;
                    }
                    cursor = Some(next);
                }
                _ => break,
            }
        }

        debug!(component = "stdio", server = %self.config.name, tools = tools.len(), "Listed tools");
        Ok(tools)
    }

    async fn call_tool(
        &self,
        function_name: &str,
        arguments: &Map<String, Value>,
    ) -> Result<RawToolResult, ToolServerError> {
        let params = json!({"name": function_name, "arguments": arguments});
        self.request(METHOD_TOOLS_CALL, Some(params)).await
    }

    async fn close(&self) -> Result<(), ToolServerError> {
        let Some(mut connection) = self.connection.lock().await.take() else {
            return Ok(());
        };

        let shutdown = connection.rpc.shutdown().await;
        if let Some(mut child) = connection.child.take() {
            match tokio::time::timeout(SHUTDOWN_GRACE, child.wait()).await {
                Ok(Ok(status)) => {
                    debug!(component = "stdio", server = %self.config.name, %status, "Tool server exited");
                }
                Ok(Err(e)) => {
                    warn!(component = "stdio", server = %self.config.name, error = %e, "Failed to wait for tool server");
                }
                Err(_) => {
                    warn!(component = "stdio", server = %self.config.name, "Tool server did not exit, killing it");
                    if let Err(e) = child.kill().await {
                        warn!(component = "stdio", server = %self.config.name, error = %e, "Failed to kill tool server");
                    }
                }
            }
        }
        shutdown
    }
}
