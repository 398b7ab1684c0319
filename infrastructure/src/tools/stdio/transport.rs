//! Line-delimited JSON-RPC over a byte stream pair.
//!
//! Used over a child process's stdin/stdout, and over in-memory pipes in
//! tests. Requests are strictly sequential: one request is written, then
//! lines are read until its response arrives. Lines that are not JSON
//! (server log output), notifications, and requests from the server are
//! skipped.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, trace};

use super::protocol::{
    JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, MessageKind, classify_message,
};
use mcpbridge_domain::ToolServerError;

pub struct JsonRpcConnection<R, W> {
    server: String,
    reader: R,
    writer: W,
    next_id: AtomicU64,
}

impl<R, W> JsonRpcConnection<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(server: impl Into<String>, reader: R, writer: W) -> Self {
        Self {
            server: server.into(),
            reader,
            writer,
            next_id: AtomicU64::new(1),
        }
    }

    fn transport_error(&self, reason: impl Into<String>) -> ToolServerError {
        ToolServerError::Transport {
            server: self.server.clone(),
            reason: reason.into(),
        }
    }

    async fn write_message(&mut self, message: &impl Serialize) -> Result<(), ToolServerError> {
        let mut json = serde_json::to_string(message)
            .map_err(|e| self.transport_error(format!("failed to serialize message: {e}")))?;
        json.push('\n');

        self.writer
            .write_all(json.as_bytes())
            .await
            .map_err(|e| self.transport_error(format!("failed to write to stdin: {e}")))?;
        self.writer
            .flush()
            .await
            .map_err(|e| self.transport_error(format!("failed to flush stdin: {e}")))
    }

    /// Send a request and wait for its result.
    pub async fn request(&mut self, method: &str, params: Option<Value>) -> Result<Value, ToolServerError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.write_message(&JsonRpcRequest::new(id, method, params)).await?;
        trace!(component = "stdio", server = %self.server, id, method, "Request sent");

        let response = self.read_response(id).await?;
        if let Some(err) = response.error {
            return Err(ToolServerError::Rpc {
                server: self.server.clone(),
                code: err.code,
                message: err.message,
            });
        }
        response.result.ok_or_else(|| ToolServerError::InvalidResponse {
            server: self.server.clone(),
            reason: format!("response to '{method}' has neither result nor error"),
        })
    }

    /// Send a notification; no response is expected.
    pub async fn notify(&mut self, method: &str, params: Option<Value>) -> Result<(), ToolServerError> {
        self.write_message(&JsonRpcNotification::new(method, params)).await
    }

    async fn read_response(&mut self, id: u64) -> Result<JsonRpcResponse, ToolServerError> {
        let mut line = String::new();
        loop {
            line.clear();
            let bytes_read = self
                .reader
                .read_line(&mut line)
                .await
                .map_err(|e| self.transport_error(format!("failed to read from stdout: {e}")))?;
            if bytes_read == 0 {
                return Err(self.transport_error("server stdout closed (process may have exited)"));
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let Ok(json) = serde_json::from_str::<Value>(trimmed) else {
                debug!(component = "stdio", server = %self.server, line = trimmed, "Skipping non-JSON output");
                continue;
            };

            match classify_message(&json) {
                MessageKind::Response { id: got } if got == id => {
                    return serde_json::from_value(json).map_err(|e| ToolServerError::InvalidResponse {
                        server: self.server.clone(),
                        reason: e.to_string(),
                    });
                }
                MessageKind::Response { id: got } => {
                    debug!(component = "stdio", server = %self.server, expected = id, got, "Skipping stale response");
                }
                MessageKind::ServerRequest | MessageKind::Notification => {
                    trace!(component = "stdio", server = %self.server, message = %json, "Skipping server message");
                }
            }
        }
    }

    /// Close the write half so the server sees end of input.
    pub async fn shutdown(&mut self) -> Result<(), ToolServerError> {
        self.writer
            .shutdown()
            .await
            .map_err(|e| self.transport_error(format!("failed to close stdin: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::io::{BufReader, DuplexStream, duplex};

    type TestConnection = JsonRpcConnection<BufReader<DuplexStream>, DuplexStream>;

    /// Returns the connection plus the server's ends of the pipes.
    fn pipe() -> (TestConnection, BufReader<DuplexStream>, DuplexStream) {
        let (client_out, server_in) = duplex(4096);
        let (server_out, client_in) = duplex(4096);
        let connection = JsonRpcConnection::new("test", BufReader::new(client_in), client_out);
        (connection, BufReader::new(server_in), server_out)
    }

    #[tokio::test]
    async fn test_request_skips_noise_until_matching_response() {
        let (mut connection, mut server_in, mut server_out) = pipe();

        let server = tokio::spawn(async move {
            let mut line = String::new();
            server_in.read_line(&mut line).await.unwrap();
            let request: Value = serde_json::from_str(&line).unwrap();
            assert_eq!(request["method"], "tools/list");
            let id = request["id"].as_u64().unwrap();

            let replies = [
                "Server starting on stdio...".to_string(),
                json!({"jsonrpc": "2.0", "method": "notifications/message"}).to_string(),
                json!({"jsonrpc": "2.0", "id": id + 100, "result": {}}).to_string(),
                json!({"jsonrpc": "2.0", "id": id, "result": {"tools": []}}).to_string(),
            ];
            for reply in replies {
                server_out.write_all(format!("{reply}\n").as_bytes()).await.unwrap();
            }
        });

        let result = connection.request("tools/list", None).await.unwrap();
        assert_eq!(result, json!({"tools": []}));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_rpc_error_is_reported() {
        let (mut connection, mut server_in, mut server_out) = pipe();

        tokio::spawn(async move {
            let mut line = String::new();
            server_in.read_line(&mut line).await.unwrap();
            let id = serde_json::from_str::<Value>(&line).unwrap()["id"].clone();
            let reply = json!({"jsonrpc": "2.0", "id": id, "error": {"code": -32601, "message": "Method not found"}});
            server_out.write_all(format!("{reply}\n").as_bytes()).await.unwrap();
        });

        let err = connection.request("nope", None).await.unwrap_err();
        assert!(matches!(err, ToolServerError::Rpc { code: -32601, .. }));
    }

    #[tokio::test]
    async fn test_closed_stream_is_transport_error() {
        let (mut connection, server_in, server_out) = pipe();
        drop(server_out);
        drop(server_in);

        let err = connection.request("tools/list", None).await.unwrap_err();
        assert!(matches!(err, ToolServerError::Transport { .. }));
    }
}
