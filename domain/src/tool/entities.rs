//! Tool domain entities

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Separator between the server namespace and the server-local tool name.
pub const NAMESPACE_SEPARATOR: char = '-';

/// Build the catalog name `"<server>-<function>"`.
pub fn namespaced_name(server: &str, function: &str) -> String {
    format!("{server}{NAMESPACE_SEPARATOR}{function}")
}

/// Split a catalog name on the **first** separator into `(server, function)`.
///
/// Returns `None` when the name carries no namespace.
pub fn split_namespaced_name(name: &str) -> Option<(&str, &str)> {
    name.split_once(NAMESPACE_SEPARATOR)
}

/// A tool as advertised by a tool server.
///
/// Field names follow the tool-server wire format (`inputSchema`,
/// `outputSchema`) so catalogs deserialize directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "inputSchema", default = "empty_object_schema")]
    pub input_schema: Value,
    #[serde(
        rename = "outputSchema",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub output_schema: Option<Value>,
}

fn empty_object_schema() -> Value {
    serde_json::json!({"type": "object", "properties": {}})
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
            output_schema: None,
        }
    }

    pub fn with_output_schema(mut self, schema: Value) -> Self {
        self.output_schema = Some(schema);
        self
    }

    /// Rename this tool into the given server's namespace.
    pub fn namespaced(mut self, server: &str) -> Self {
        self.name = namespaced_name(server, &self.name);
        self
    }

    /// The provider-neutral "standard" tool definition handed to tool
    /// converters: `{name, description, parameters}`.
    pub fn to_standard(&self) -> Value {
        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "parameters": self.input_schema,
        })
    }
}

/// A tool invocation requested by the LLM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Provider-assigned call id, echoed back in the tool result message.
    pub id: String,
    /// Namespaced tool name.
    pub name: String,
    pub arguments: Map<String, Value>,
}

impl ToolCallRequest {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: Map::new(),
        }
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    pub fn with_arguments(mut self, arguments: Map<String, Value>) -> Self {
        self.arguments = arguments;
        self
    }

    /// `(server, function)` parts of the requested name.
    pub fn route(&self) -> Option<(&str, &str)> {
        split_namespaced_name(&self.name)
    }
}
