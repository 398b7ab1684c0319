//! OpenAI-compatible response parsing and tool conversion
//!
//! Response shape: `{choices: [{message: {role, content?, tool_calls?}}]}`
//! where each tool call is `{id, type: "function", function: {name, arguments}}`
//! and `arguments` is a JSON-encoded string.

use super::arguments::parse_arguments;
use super::tool_converter::{ToolValidationError, standard_tools};
use crate::session::entities::{Message, ToolCall};
use crate::tool::entities::{ToolCallRequest, ToolDefinition};
use serde_json::{Value, json};
use tracing::warn;

/// `[{type: "function", function: {name, description, parameters}}]`
pub fn convert_tools(tools: &[ToolDefinition]) -> Result<Vec<Value>, ToolValidationError> {
    Ok(standard_tools(tools)?
        .into_iter()
        .map(|function| json!({"type": "function", "function": function}))
        .collect())
}

fn first_message(response: &Value) -> Option<&Value> {
    response.get("choices")?.as_array()?.first()?.get("message")
}

fn raw_tool_calls(response: &Value) -> Option<&Vec<Value>> {
    first_message(response)?
        .get("tool_calls")?
        .as_array()
        .filter(|calls| !calls.is_empty())
}

pub fn need_tools_call(response: &Value) -> bool {
    raw_tool_calls(response).is_some()
}

pub fn prepare_tools_call(response: &Value) -> Vec<ToolCallRequest> {
    let Some(calls) = raw_tool_calls(response) else {
        return Vec::new();
    };

    calls
        .iter()
        .enumerate()
        .filter_map(|(index, call)| match extract_call(call) {
            Ok(request) => Some(request),
            Err(reason) => {
                warn!(provider = "openai", index, %reason, "Skipping malformed tool call");
                None
            }
        })
        .collect()
}

fn extract_call(call: &Value) -> Result<ToolCallRequest, String> {
    let id = call
        .get("id")
        .and_then(Value::as_str)
        .ok_or("missing 'id'")?;
    let function = call.get("function").ok_or("missing 'function'")?;
    let name = function
        .get("name")
        .and_then(Value::as_str)
        .ok_or("missing 'function.name'")?;
    let arguments = function
        .get("arguments")
        .ok_or("missing 'function.arguments'")?;

    Ok(ToolCallRequest::new(id, name).with_arguments(parse_arguments(arguments)?))
}

/// The assistant message of the first choice.
pub fn assistant_message(response: &Value) -> Option<Message> {
    let message = first_message(response)?;
    let content = message
        .get("content")
        .and_then(Value::as_str)
        .map(str::to_string);

    let tool_calls = message
        .get("tool_calls")
        .and_then(Value::as_array)
        .map(|calls| calls.iter().filter_map(recorded_call).collect())
        .unwrap_or_default();

    Some(Message::assistant(content, tool_calls))
}

fn recorded_call(call: &Value) -> Option<ToolCall> {
    let id = call.get("id")?.as_str()?;
    let function = call.get("function")?;
    let name = function.get("name")?.as_str()?;
    let arguments = match function.get("arguments") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "{}".to_string(),
        Some(other) => other.to_string(),
    };
    Some(ToolCall::function(id, name, arguments))
}
