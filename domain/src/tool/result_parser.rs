//! Normalization of raw tool-server results
//!
//! [`ToolResultParser::parse`] turns a [`RawToolResult`] into a
//! [`NormalizedToolResult`]. The raw envelope is validated up front; any
//! structural violation is an error and no partial result is produced.

use super::value_objects::{ErrorInfo, NormalizedToolResult, RawToolResult};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

const SUMMARY_LIMIT: usize = 100;
const SUMMARY_TRUNCATED: usize = 97;
const FAILURE_MESSAGE: &str = "Tool execution failed";

/// A raw tool result that does not have the expected shape.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StructuralValidationError {
    #[error("Tool result must be a JSON object, got: {0}")]
    NotAnObject(String),

    #[error("Tool result is missing required field 'isError'")]
    MissingIsError,

    #[error("Tool result 'content' must be a list")]
    ContentNotAList,

    #[error("Tool result content item #{0} must be an object")]
    ContentItemNotAnObject(usize),

    #[error("Tool result content item #{0} is missing required field 'type'")]
    ContentItemMissingType(usize),

    #[error("Tool result 'structuredContent' must be an object or null")]
    StructuredContentNotAnObject,
}

/// Stateless normalizer for tool results.
pub struct ToolResultParser;

impl ToolResultParser {
    pub fn parse(
        tool_call_id: &str,
        raw: &RawToolResult,
    ) -> Result<NormalizedToolResult, StructuralValidationError> {
        let envelope = validate(raw)?;

        let success = !is_truthy(envelope.get("isError"));
        let content = envelope
            .get("content")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let text_content = extract_text(content);
        let structured_data = extract_structured(envelope.get("structuredContent"));
        let metadata = extract_metadata(envelope.get("_meta"), content);
        let summary = summarize(success, &text_content, &structured_data);
        let error_info = (!success).then(|| error_info(&text_content, &structured_data));

        Ok(NormalizedToolResult {
            tool_call_id: tool_call_id.to_string(),
            success,
            text_content,
            structured_data,
            summary,
            metadata,
            error_info,
        })
    }
}

fn validate(raw: &Value) -> Result<&Map<String, Value>, StructuralValidationError> {
    let envelope = raw
        .as_object()
        .ok_or_else(|| StructuralValidationError::NotAnObject(raw.to_string()))?;

    if !envelope.contains_key("isError") {
        return Err(StructuralValidationError::MissingIsError);
    }

    if let Some(content) = envelope.get("content") {
        let items = content
            .as_array()
            .ok_or(StructuralValidationError::ContentNotAList)?;
        for (index, item) in items.iter().enumerate() {
            let item = item
                .as_object()
                .ok_or(StructuralValidationError::ContentItemNotAnObject(index))?;
            if !item.contains_key("type") {
                return Err(StructuralValidationError::ContentItemMissingType(index));
            }
        }
    }

    match envelope.get("structuredContent") {
        None | Some(Value::Null) | Some(Value::Object(_)) => Ok(envelope),
        Some(_) => Err(StructuralValidationError::StructuredContentNotAnObject),
    }
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

/// Render a JSON value as plain text (strings without quotes).
fn plain_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn extract_text(content: &[Value]) -> String {
    content
        .iter()
        .filter(|item| item.get("type").and_then(Value::as_str) == Some("text"))
        .filter_map(|item| item.get("text"))
        .map(plain_text)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn extract_structured(value: Option<&Value>) -> Map<String, Value> {
    match value {
        Some(Value::Object(map)) => map.clone(),
        None | Some(Value::Null) => Map::new(),
        Some(other) => {
            warn!(
                kind = json_kind(other),
                "structuredContent is not an object, ignoring"
            );
            Map::new()
        }
    }
}

fn extract_metadata(meta: Option<&Value>, content: &[Value]) -> Map<String, Value> {
    let mut metadata = Map::new();

    if let Some(meta) = meta.filter(|m| !m.is_null()) {
        metadata.insert("tool_meta".to_string(), meta.clone());
    }

    let content_metadata: Vec<Value> = content
        .iter()
        .filter_map(|item| {
            let meta = item.get("_meta").filter(|v| !v.is_null());
            let annotations = item.get("annotations").filter(|v| !v.is_null());
            if meta.is_none() && annotations.is_none() {
                return None;
            }
            let mut entry = Map::new();
            if let Some(meta) = meta {
                entry.insert("_meta".to_string(), meta.clone());
            }
            if let Some(annotations) = annotations {
                entry.insert("annotations".to_string(), annotations.clone());
            }
            Some(Value::Object(entry))
        })
        .collect();

    if !content_metadata.is_empty() {
        metadata.insert(
            "content_metadata".to_string(),
            Value::Array(content_metadata),
        );
    }

    metadata
}

fn summarize(success: bool, text: &str, structured: &Map<String, Value>) -> String {
    if !success {
        return FAILURE_MESSAGE.to_string();
    }

    if !text.is_empty() {
        let shown = if text.chars().count() > SUMMARY_LIMIT {
            let head: String = text.chars().take(SUMMARY_TRUNCATED).collect();
            format!("{head}...")
        } else {
            text.to_string()
        };
        return format!("Tool executed successfully: {shown}");
    }

    if let Some(result) = structured.get("result") {
        return format!(
            "Tool executed successfully with result: {}",
            plain_text(result)
        );
    }

    if !structured.is_empty() {
        return format!(
            "Tool executed successfully with {} data fields",
            structured.len()
        );
    }

    "Tool executed successfully".to_string()
}

fn error_info(text: &str, structured: &Map<String, Value>) -> ErrorInfo {
    let message = if text.is_empty() {
        FAILURE_MESSAGE.to_string()
    } else {
        text.to_string()
    };

    ErrorInfo {
        error_type: structured
            .get("error_type")
            .map(plain_text)
            .unwrap_or_else(|| "unknown".to_string()),
        message,
        details: structured.get("details").map(plain_text).unwrap_or_default(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_simple_text_result() {
        let raw = json!({"isError": false, "content": [{"type": "text", "text": "ok"}]});
        let result = ToolResultParser::parse("call_1", &raw).unwrap();

        assert!(result.success);
        assert_eq!(result.tool_call_id, "call_1");
        assert_eq!(result.text_content, "ok");
        assert_eq!(result.summary, "Tool executed successfully: ok");
        assert!(result.error_info.is_none());
        assert!(result.structured_data.is_empty());
        assert!(result.metadata.is_empty());
    }

    #[test]
    fn test_missing_is_error() {
        let raw = json!({"content": [{"type": "text", "text": "ok"}]});
        assert_eq!(
            ToolResultParser::parse("call_1", &raw),
            Err(StructuralValidationError::MissingIsError)
        );
    }

    #[test]
    fn test_structural_violations() {
        let cases = [
            (json!("text"), "NotAnObject"),
            (json!({"isError": false, "content": "x"}), "ContentNotAList"),
            (json!({"isError": false, "content": ["x"]}), "ContentItemNotAnObject"),
            (json!({"isError": false, "content": [{"text": "x"}]}), "ContentItemMissingType"),
            (json!({"isError": false, "structuredContent": [1]}), "StructuredContentNotAnObject"),
        ];
        for (raw, expected) in cases {
            let err = ToolResultParser::parse("c", &raw).unwrap_err();
            assert!(format!("{err:?}").starts_with(expected), "{raw} -> {err:?}");
        }
    }

    #[test]
    fn test_text_joined_in_order_skipping_other_types() {
        let raw = json!({
            "isError": false,
            "content": [
                {"type": "text", "text": "first"},
                {"type": "image", "data": "...", "mimeType": "image/png"},
                {"type": "text", "text": ""},
                {"type": "text", "text": "second"},
            ]
        });
        let result = ToolResultParser::parse("c", &raw).unwrap();
        assert_eq!(result.text_content, "first second");
    }

    #[test]
    fn test_long_text_summary_truncated() {
        let text = "x".repeat(150);
        let raw = json!({"isError": false, "content": [{"type": "text", "text": text}]});
        let result = ToolResultParser::parse("c", &raw).unwrap();

        let expected = format!("Tool executed successfully: {}...", "x".repeat(97));
        assert_eq!(result.summary, expected);

        let exactly_limit = "y".repeat(100);
        let raw = json!({"isError": false, "content": [{"type": "text", "text": exactly_limit}]});
        let result = ToolResultParser::parse("c", &raw).unwrap();
        assert_eq!(result.summary, format!("Tool executed successfully: {}", "y".repeat(100)));
    }

    #[test]
    fn test_structured_summaries() {
        let raw = json!({"isError": false, "content": [], "structuredContent": {"result": 42}});
        let result = ToolResultParser::parse("c", &raw).unwrap();
        assert_eq!(result.summary, "Tool executed successfully with result: 42");
        assert_eq!(result.structured_data["result"], 42);

        let raw = json!({"isError": false, "structuredContent": {"a": 1, "b": 2}});
        let result = ToolResultParser::parse("c", &raw).unwrap();
        assert_eq!(result.summary, "Tool executed successfully with 2 data fields");

        let raw = json!({"isError": false, "structuredContent": null});
        let result = ToolResultParser::parse("c", &raw).unwrap();
        assert_eq!(result.summary, "Tool executed successfully");
    }

    #[test]
    fn test_error_result() {
        let raw = json!({
            "isError": true,
            "content": [{"type": "text", "text": "file not found"}],
            "structuredContent": {"error_type": "not_found", "details": "/tmp/missing"},
        });
        let result = ToolResultParser::parse("c", &raw).unwrap();

        assert!(!result.success);
        assert_eq!(result.summary, "Tool execution failed");
        let info = result.error_info.unwrap();
        assert_eq!(info.error_type, "not_found");
        assert_eq!(info.message, "file not found");
        assert_eq!(info.details, "/tmp/missing");
    }

    #[test]
    fn test_error_result_defaults() {
        let raw = json!({"isError": true});
        let info = ToolResultParser::parse("c", &raw).unwrap().error_info.unwrap();
        assert_eq!(info.error_type, "unknown");
        assert_eq!(info.message, "Tool execution failed");
        assert_eq!(info.details, "");
    }

    #[test]
    fn test_metadata_collected() {
        let raw = json!({
            "isError": false,
            "_meta": {"duration_ms": 12},
            "content": [
                {"type": "text", "text": "a", "annotations": {"audience": ["user"]}},
                {"type": "text", "text": "b"},
                {"type": "text", "text": "c", "_meta": {"source": "cache"}},
            ]
        });
        let result = ToolResultParser::parse("c", &raw).unwrap();

        assert_eq!(result.metadata["tool_meta"]["duration_ms"], 12);
        let items = result.metadata["content_metadata"].as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["annotations"]["audience"][0], "user");
        assert_eq!(items[1]["_meta"]["source"], "cache");
        assert!(items[0].get("_meta").is_none());
        assert!(items[1].get("annotations").is_none());
    }

    #[test]
    fn test_parse_is_deterministic() {
        let raw = json!({"isError": false, "content": [{"type": "text", "text": "same"}]});
        assert_eq!(
            ToolResultParser::parse("c", &raw).unwrap(),
            ToolResultParser::parse("c", &raw).unwrap()
        );
    }
}
