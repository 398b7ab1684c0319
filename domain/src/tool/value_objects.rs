//! Tool result value objects

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Result envelope as returned by a tool server:
/// `{isError, content: [{type, text?, ...}], structuredContent?, _meta?}`.
///
/// Kept as raw JSON; its shape is checked by the result parser.
pub type RawToolResult = Value;

/// Failure details attached to an unsuccessful tool result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub error_type: String,
    pub message: String,
    pub details: String,
}

/// A tool result in the standard shape the session feeds back to the LLM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedToolResult {
    pub tool_call_id: String,
    pub success: bool,
    pub text_content: String,
    pub structured_data: Map<String, Value>,
    pub summary: String,
    pub metadata: Map<String, Value>,
    /// Present only when `success` is false.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_info: Option<ErrorInfo>,
}

impl NormalizedToolResult {
    /// Text to place in the tool result message.
    ///
    /// Falls back to the error message when a failed tool produced no text.
    pub fn message_content(&self) -> &str {
        match &self.error_info {
            Some(info) if self.text_content.is_empty() => &info.message,
            _ => &self.text_content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(success: bool, text: &str) -> NormalizedToolResult {
        NormalizedToolResult {
            tool_call_id: "call_1".to_string(),
            success,
            text_content: text.to_string(),
            structured_data: Map::new(),
            summary: String::new(),
            metadata: Map::new(),
            error_info: (!success).then(|| ErrorInfo {
                error_type: "unknown".to_string(),
                message: "Tool execution failed".to_string(),
                details: String::new(),
            }),
        }
    }

    #[test]
    fn test_message_content() {
        assert_eq!(result(true, "ok").message_content(), "ok");
        assert_eq!(result(false, "boom").message_content(), "boom");
        assert_eq!(result(false, "").message_content(), "Tool execution failed");
    }

    #[test]
    fn test_error_info_skipped_on_success() {
        let value = serde_json::to_value(result(true, "ok")).unwrap();
        assert!(value.get("error_info").is_none());
    }
}
