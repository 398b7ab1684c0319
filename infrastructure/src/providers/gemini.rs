//! Gemini `generateContent` client

use super::USER_AGENT;
use super::http_error::completion_body;
use async_trait::async_trait;
use mcpbridge_application::{CompletionOptions, LlmClient, LlmError, LlmTransport};
use mcpbridge_domain::{LlmConfig, LlmProvider, Message, ToolDefinition};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, info};

pub const GEMINI_API_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1";

const TOP_K: u32 = 40;
const TOP_P: f64 = 0.95;

pub struct GeminiClient {
    transport: Arc<dyn LlmTransport>,
    config: LlmConfig,
    session_id: String,
}

impl GeminiClient {
    pub fn new(transport: Arc<dyn LlmTransport>, config: LlmConfig, session_id: impl Into<String>) -> Self {
        let session_id = session_id.into();
        info!(component = "llm_client", provider = "gemini", session_id = %session_id, "Initialized Gemini client");
        Self {
            transport,
            config,
            session_id,
        }
    }

    fn headers(&self) -> Vec<(String, String)> {
        vec![
            ("x-goog-api-key".to_string(), self.config.api_key.clone()),
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
            "contents": messages.iter().map(to_content).collect::<Vec<_>>(),
            "generationConfig": {
                "temperature": options.temperature.unwrap_or(self.config.temperature),
                "maxOutputTokens": options.max_tokens.unwrap_or(self.config.max_tokens),
                "topK": TOP_K,
                "topP": TOP_P,
            },
        });

        if let Some(tools) = tools.filter(|t| !t.is_empty()) {
            body["tools"] = Value::Array(LlmProvider::Gemini.convert_tools(tools)?);
        }
        Ok(body)
    }
}

/// Gemini only knows `user` and `model` turns; everything that is not an
/// assistant turn is sent as user input.
fn to_content(message: &Message) -> Value {
    let role = match message {
        Message::Assistant { .. } => "model",
        _ => "user",
    };
    json!({
        "role": role,
        "parts": [{"text": message.content().unwrap_or_default()}],
    })
}

#[async_trait]
impl LlmClient for GeminiClient {
    fn provider(&self) -> LlmProvider {
        LlmProvider::Gemini
    }

    async fn chat_completion(
        &self,
        messages: &[Message],
        tools: Option<&[ToolDefinition]>,
        options: CompletionOptions<'_>,
    ) -> Result<Value, LlmError> {
        let body = self.request_body(messages, tools, options)?;
        let model = options.model.unwrap_or(&self.config.model);
        let url = format!("{GEMINI_API_ENDPOINT}/models/{model}:generateContent");

        info!(component = "llm_client", provider = "gemini", model, messages = messages.len(), "Sending chat completion request");
        debug!(component = "llm_client", payload = %body, "Request payload");

        let result = self.transport.post_json(&url, &self.headers(), &body).await;
        completion_body(LlmProvider::Gemini, model, self.config.timeout_secs, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::test_support::RecordingTransport;
    use mcpbridge_application::HttpResponse;
    use mcpbridge_domain::ToolCall;

    fn client(transport: Arc<RecordingTransport>) -> GeminiClient {
        let config = LlmConfig::new(LlmProvider::Gemini, "AIza-secret")
            .with_temperature(0.7)
            .with_max_tokens(2048);
        GeminiClient::new(transport, config, "session-g")
    }

    #[tokio::test]
    async fn test_request_shape() {
        let transport = Arc::new(RecordingTransport::replying(vec![Ok(HttpResponse::new(
            200,
            r#"{"predictions": [{"content": "ok"}]}"#,
        ))]));
        let client = client(transport.clone());

        let tools = [ToolDefinition::new(
            "weather-forecast",
            "Get a forecast",
            json!({"type": "object", "properties": {"city": {"type": "string"}}}),
        )];
        let messages = vec![
            Message::system("be brief"),
            Message::user("weather?"),
            Message::assistant(Some("checking".to_string()), vec![ToolCall::function("c1", "weather-forecast", "{}")]),
            Message::tool_result("c1", "weather-forecast", "sunny"),
        ];
        let body = client
            .chat_completion(&messages, Some(&tools), CompletionOptions::default())
            .await
            .unwrap();
        assert_eq!(body["predictions"][0]["content"], "ok");

        let sent = transport.last_request();
        assert_eq!(
            sent.url,
            "https://generativelanguage.googleapis.com/v1/models/gemini-pro:generateContent"
        );
        assert_eq!(sent.header("x-goog-api-key"), Some("AIza-secret"));
        assert!(sent.header("Authorization").is_none());

        let roles: Vec<&str> = sent.body["contents"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["role"].as_str().unwrap())
            .collect();
        assert_eq!(roles, vec!["user", "user", "model", "user"]);
        assert_eq!(sent.body["contents"][3]["parts"][0]["text"], "sunny");

        let generation = &sent.body["generationConfig"];
        assert_eq!(generation["temperature"], 0.7);
        assert_eq!(generation["maxOutputTokens"], 2048);
        assert_eq!(generation["topK"], 40);
        assert_eq!(generation["topP"], 0.95);

        let declarations = &sent.body["tools"][0]["functionDeclarations"];
        assert_eq!(declarations[0]["name"], "weather-forecast");
    }

    #[tokio::test]
    async fn test_no_tools_key_without_tools() {
        let transport = Arc::new(RecordingTransport::replying(vec![Ok(HttpResponse::new(200, "{}"))]));
        let client = client(transport.clone());
        client
            .chat_completion(&[Message::user("hi")], Some(&[]), CompletionOptions::default())
            .await
            .unwrap();
        assert!(transport.last_request().body.get("tools").is_none());
    }

    #[tokio::test]
    async fn test_model_not_found() {
        let transport = Arc::new(RecordingTransport::replying(vec![Ok(HttpResponse::new(404, "{}"))]));
        let client = client(transport);
        let err = client
            .chat_completion(&[Message::user("hi")], None, CompletionOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Model not found: gemini-pro");
    }
}
