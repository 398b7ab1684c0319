//! JSON-RPC protocol types for MCP tool servers.
//!
//! Messages are exchanged as one JSON object per line.
//!
//! # Protocol Overview
//!
//! - **Requests**: bridge → server (`initialize`, `tools/list`, `tools/call`)
//! - **Responses**: server → bridge (result or error, correlated by `id`)
//! - **Notifications**: either direction, no `id` (`notifications/initialized`)

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// MCP protocol revision announced during `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

pub const METHOD_INITIALIZE: &str = "initialize";
pub const METHOD_INITIALIZED: &str = "notifications/initialized";
pub const METHOD_TOOLS_LIST: &str = "tools/list";
pub const METHOD_TOOLS_CALL: &str = "tools/call";

/// JSON-RPC request
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn new(id: u64, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method: method.into(),
            params,
        }
    }
}

/// JSON-RPC notification (no `id`, no response)
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcNotification {
    pub jsonrpc: &'static str,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcNotification {
    pub fn new(method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            method: method.into(),
            params,
        }
    }
}

/// JSON-RPC response
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    pub id: Option<u64>,
    pub result: Option<Value>,
    pub error: Option<RpcError>,
}

/// JSON-RPC error object
#[derive(Debug, Clone, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    pub data: Option<Value>,
}

/// Classification of an incoming line.
#[derive(Debug, PartialEq, Eq)]
pub enum MessageKind {
    /// A response to one of our requests (has `id`, no `method`).
    Response { id: u64 },
    /// A request from the server (has `id` + `method`).
    ServerRequest,
    /// A notification (has `method`, no `id`), or anything else.
    Notification,
}

/// Classify a JSON-RPC message by inspecting `id` and `method` fields.
pub fn classify_message(json: &Value) -> MessageKind {
    let id = json.get("id").and_then(Value::as_u64);
    let method = json.get("method").and_then(Value::as_str);

    match (id, method) {
        (Some(_), Some(_)) => MessageKind::ServerRequest,
        (Some(id), None) => MessageKind::Response { id },
        _ => MessageKind::Notification,
    }
}

/// Parameters of the `initialize` request.
pub fn initialize_params() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {},
        "clientInfo": {
            "name": "mcpbridge",
            "version": env!("CARGO_PKG_VERSION"),
        },
    })
}

/// Result of `tools/list`; `nextCursor` is set while more pages remain.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListToolsResult {
    #[serde(default)]
    pub tools: Vec<mcpbridge_domain::ToolDefinition>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_response() {
        let json = json!({"jsonrpc": "2.0", "id": 3, "result": {}});
        assert_eq!(classify_message(&json), MessageKind::Response { id: 3 });
    }

    #[test]
    fn classify_server_request() {
        let json = json!({"jsonrpc": "2.0", "id": 1, "method": "roots/list"});
        assert_eq!(classify_message(&json), MessageKind::ServerRequest);
    }

    #[test]
    fn classify_notification() {
        let json = json!({"jsonrpc": "2.0", "method": "notifications/message", "params": {}});
        assert_eq!(classify_message(&json), MessageKind::Notification);
    }

    #[test]
    fn request_serialization() {
        let request = JsonRpcRequest::new(7, METHOD_TOOLS_LIST, None);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, json!({"jsonrpc": "2.0", "id": 7, "method": "tools/list"}));
    }

    #[test]
    fn list_tools_result_reads_cursor_and_schemas() {
        let result: ListToolsResult = serde_json::from_value(json!({
            "tools": [{
                "name": "read_file",
                "description": "Read a file",
                "inputSchema": {"type": "object", "properties": {"path": {"type": "string"}}}
            }],
            "nextCursor": "page-2"
        }))
        .unwrap();
        assert_eq!(result.tools[0].name, "read_file");
        assert_eq!(result.tools[0].input_schema["properties"]["path"]["type"], "string");
        assert_eq!(result.next_cursor.as_deref(), Some("page-2"));
    }
}
