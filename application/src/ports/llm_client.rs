//! LLM client port
//!
//! Defines the provider-agnostic completion interface and the error
//! taxonomy every provider client reports through.

use async_trait::async_trait;
use mcpbridge_domain::{
    ConfigurationError, LlmConfig, LlmProvider, Message, ToolDefinition, ToolValidationError,
};
use serde_json::Value;
use thiserror::Error;

/// Errors raised while talking to an LLM provider.
///
/// These never escape the [`LlmExecutor`](crate::use_cases::llm_executor::LlmExecutor):
/// it logs them and reports an absent completion instead.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Authentication failed - check your API key")]
    Authentication {
        status_code: u16,
        error_code: Option<String>,
    },

    #[error("API error (status {status_code}): {message}")]
    Api {
        status_code: u16,
        error_code: Option<String>,
        message: String,
    },

    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: f64 },

    #[error("Rate limit exceeded (retry after: {retry_after:?})")]
    RateLimit {
        status_code: u16,
        error_code: Option<String>,
        retry_after: Option<f64>,
    },

    #[error("Invalid response: {0}")]
    Response(String),

    #[error("Model not found: {model}")]
    Model {
        model: String,
        status_code: u16,
        error_code: Option<String>,
    },

    #[error("Token limit exceeded: {message}")]
    TokenLimit {
        status_code: u16,
        error_code: Option<String>,
        message: String,
    },

    #[error(transparent)]
    ToolValidation(#[from] ToolValidationError),
}

impl LlmError {
    /// Short category name for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            LlmError::Configuration(_) => "configuration",
            LlmError::Connection(_) => "connection",
            LlmError::Authentication { .. } => "authentication",
            LlmError::Api { .. } => "api",
            LlmError::Timeout { .. } => "timeout",
            LlmError::RateLimit { .. } => "rate_limit",
            LlmError::Response(_) => "response",
            LlmError::Model { .. } => "model",
            LlmError::TokenLimit { .. } => "token_limit",
            LlmError::ToolValidation(_) => "tool_validation",
        }
    }

    /// HTTP status code, for errors that came from an HTTP response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            LlmError::Authentication { status_code, .. }
            | LlmError::Api { status_code, .. }
            | LlmError::RateLimit { status_code, .. }
            | LlmError::Model { status_code, .. }
            | LlmError::TokenLimit { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

/// Per-call overrides of the configured request parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CompletionOptions<'a> {
    pub model: Option<&'a str>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

/// A provider client performing chat completions.
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmClient: Send + Sync {
    fn provider(&self) -> LlmProvider;

    /// Send the conversation (and tools, when given) and return the
    /// provider-native response body.
    async fn chat_completion(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
        options: CompletionOptions<'_>,
    ) -> Result<Value, LlmError>;

    /// Prepare the client for use.
    async fn open(&self) -> Result<(), LlmError> {
        Ok(())
    }

    /// Release the client's resources.
    async fn close(&self) {}
}

/// A client together with the configuration it was built from.
pub struct ConfiguredLlmClient {
    pub client: Box<dyn LlmClient>,
    pub config: LlmConfig,
}

/// Builds the configured provider client for a session.
pub trait LlmClientFactory: Send + Sync {
    fn create(&self, session_id: &str) -> Result<ConfiguredLlmClient, ConfigurationError>;
}
