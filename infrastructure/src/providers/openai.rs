//! OpenAI-compatible chat completions client

use super::USER_AGENT;
use super::http_error::completion_body;
use async_trait::async_trait;
use mcpbridge_application::{CompletionOptions, LlmClient, LlmError, LlmTransport};
use mcpbridge_domain::{ConfigurationError, LlmConfig, LlmProvider, Message, ToolDefinition};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info};

/// Client for `POST {base_url}/chat/completions`.
///
/// Works against any endpoint speaking the OpenAI chat completions
/// protocol; the base URL comes from configuration.
pub struct OpenAiClient {
    transport: Arc<dyn LlmTransport>,
    config: LlmConfig,
    base_url: String,
    session_id: String,
}

impl OpenAiClient {
    pub fn new(
        transport: Arc<dyn LlmTransport>,
        config: LlmConfig,
        session_id: impl Into<String>,
    ) -> Result<Self, ConfigurationError> {
        let base_url = config
            .base_url
            .as_deref()
            .map(|u| u.trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .ok_or_else(|| {
                ConfigurationError::MissingVariable(mcpbridge_domain::config::env::BASE_URL.to_string())
            })?;
        let session_id = session_id.into();

        info!(component = "llm_client", provider = "openai", %base_url, session_id = %session_id, "Initialized OpenAI client");

        Ok(Self {
            transport,
            config,
            base_url,
            session_id,
        })
    }

    fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("Authorization".to_string(), format!("Bearer {}", self.config.api_key)),
            ("Content-Type".to_string(), "application/json".to_string()),
            ("User-Agent".to_string(), USER_AGENT.to_string()),
            ("X-Session-ID".to_string(), self.session_id.clone()),
        ]
    }

    fn request_body(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
        options: CompletionOptions<'_>,
    ) -> Result<Value, LlmError> {
        let mut body = json!({
            "model": options.model.unwrap_or(&self.config.model),
            "messages": messages,
            "temperature": options.temperature.unwrap_or(self.config.temperature),
            "max_tokens": options.max_tokens.unwrap_or(self.config.max_tokens),
        });

        if let Some(tools) = tools.filter(|t| !t.is_empty()) {
            body["tools"] = Value::Array(LlmProvider::OpenAi.convert_tools(tools)?);
        }
        Ok(body)
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    fn provider(&self) -> LlmProvider {
        LlmProvider::OpenAi
    }

    async fn chat_completion(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
        options: CompletionOptions<'_>,
    ) -> Result<Value, LlmError> {
        let body = self.request_body(messages, tools, options)?;
        let model = options.model.unwrap_or(&self.config.model);
        let url = format!("{}/chat/completions", self.base_url);

        info!(component = "llm_client", provider = "openai", model, messages = messages.len(), "Sending chat completion request");
        debug!(component = "llm_client", payload = %body, "Request payload");

        let result = self.transport.post_json(&url, &self.headers(), &body).await;
        completion_body(LlmProvider::OpenAi, model, self.config.timeout_secs, result)
    }
}
