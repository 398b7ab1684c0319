//! Supported LLM providers

use super::tool_converter::ToolValidationError;
use super::{gemini, openai};
use crate::config::env;
use crate::core::error::ConfigurationError;
use crate::session::entities::Message;
use crate::tool::entities::{ToolCallRequest, ToolDefinition};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// The closed set of LLM providers.
///
/// Selected once from configuration; every provider-specific parsing and
/// conversion step dispatches on this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    OpenAi,
    Gemini,
}

impl LlmProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "openai",
            LlmProvider::Gemini => "gemini",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi => "gpt-4",
            LlmProvider::Gemini => "gemini-pro",
        }
    }

    /// Environment variable holding this provider's API key.
    pub fn api_key_variable(&self) -> &'static str {
        match self {
            LlmProvider::OpenAi => env::OPENAI_API_KEY,
            LlmProvider::Gemini => env::GEMINI_API_KEY,
        }
    }

    /// Whether requests go to a configurable base URL.
    pub fn requires_base_url(&self) -> bool {
        matches!(self, LlmProvider::OpenAi)
    }

    /// Convert tools into the value of the request's `tools` field.
    pub fn convert_tools(&self, tools: &[ToolDefinition]) -> Result<Vec<Value>, ToolValidationError> {
        match self {
            LlmProvider::OpenAi => openai::convert_tools(tools),
            LlmProvider::Gemini => gemini::convert_tools(tools),
        }
    }

    /// True iff the response asks for at least one tool call. Never fails.
    pub fn need_tools_call(&self, response: &Value) -> bool {
        match self {
            LlmProvider::OpenAi => openai::need_tools_call(response),
            LlmProvider::Gemini => gemini::need_tools_call(response),
        }
    }

    /// Well-formed tool-call requests, in response order; malformed items are skipped.
    pub fn prepare_tools_call(&self, response: &Value) -> Vec<ToolCallRequest> {
        match self {
            LlmProvider::OpenAi => openai::prepare_tools_call(response),
            LlmProvider::Gemini => gemini::prepare_tools_call(response),
        }
    }

    /// The response's assistant message in provider-neutral form.
    pub fn assistant_message(&self, response: &Value) -> Option<Message> {
        match self {
            LlmProvider::OpenAi => openai::assistant_message(response),
            LlmProvider::Gemini => gemini::assistant_message(response),
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LlmProvider {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(LlmProvider::OpenAi),
            "gemini" => Ok(LlmProvider::Gemini),
            other => Err(ConfigurationError::UnsupportedProvider(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_str() {
        assert_eq!("openai".parse::<LlmProvider>().unwrap(), LlmProvider::OpenAi);
        assert_eq!(" Gemini ".parse::<LlmProvider>().unwrap(), LlmProvider::Gemini);
        assert_eq!(
            "claude".parse::<LlmProvider>(),
            Err(ConfigurationError::UnsupportedProvider("claude".to_string()))
        );
    }

    #[test]
    fn test_dispatch_uses_provider_shape() {
        let openai_response = json!({"choices": [{"message": {"tool_calls": [
            {"id": "c1", "type": "function", "function": {"name": "a-b", "arguments": "{}"}}
        ]}}]});

        assert!(LlmProvider::OpenAi.need_tools_call(&openai_response));
        // The same payload is not a Gemini tool-call response.
        assert!(!LlmProvider::Gemini.need_tools_call(&openai_response));
        assert!(LlmProvider::Gemini.prepare_tools_call(&openai_response).is_empty());
    }
}
