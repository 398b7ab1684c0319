//! Gemini response parsing and tool conversion
//!
//! Response shape: `{predictions: [{content, finishReason, toolCalls?}]}`
//! where each tool call is `{id, name, arguments}` and `arguments` is a
//! JSON-encoded string. Tools are sent as a single
//! `{functionDeclarations: [...]}` entry.

use super::arguments::parse_arguments;
use super::tool_converter::{ToolValidationError, standard_tools};
use crate::session::entities::{Message, ToolCall};
use crate::tool::entities::{ToolCallRequest, ToolDefinition};
use serde_json::{Map, Value, json};
use tracing::warn;

/// `[{functionDeclarations: [{name, description, parameters}]}]`
pub fn convert_tools(tools: &[ToolDefinition]) -> Result<Vec<Value>, ToolValidationError> {
    let declarations = standard_tools(tools)?;
    Ok(vec![json!({"functionDeclarations": declarations})])
}

fn first_prediction(response: &Value) -> Option<&Value> {
    response.get("predictions")?.as_array()?.first()
}

fn raw_tool_calls(response: &Value) -> Option<&Vec<Value>> {
    first_prediction(response)?
        .get("toolCalls")?
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
                warn!(provider = "gemini", index, %reason, "Skipping malformed tool call");
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
    let name = call
        .get("name")
        .and_then(Value::as_str)
        .ok_or("missing 'name'")?;
    // Gemini omits arguments for parameterless functions.
    let arguments = match call.get("arguments") {
        None | Some(Value::Null) => Map::new(),
        Some(raw) => parse_arguments(raw)?,
    };

    Ok(ToolCallRequest::new(id, name).with_arguments(arguments))
}

/// The first prediction expressed as an OpenAI-shaped assistant message.
pub fn assistant_message(response: &Value) -> Option<Message> {
    let prediction = first_prediction(response)?;
    let content = prediction
        .get("content")
        .and_then(Value::as_str)
        .map(str::to_string);

    let tool_calls = prediction
        .get("toolCalls")
        .and_then(Value::as_array)
        .map(|calls| calls.iter().filter_map(recorded_call).collect())
        .unwrap_or_default();

    Some(Message::assistant(content, tool_calls))
}

fn recorded_call(call: &Value) -> Option<ToolCall> {
    let id = call.get("id")?.as_str()?;
    let name = call.get("name")?.as_str()?;
    let arguments = match call.get("arguments") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "{}".to_string(),
        Some(other) => other.to_string(),
    };
    Some(ToolCall::function(id, name, arguments))
}
