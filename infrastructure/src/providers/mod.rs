//! LLM provider adapters
//!
//! Each provider client implements [`LlmClient`](mcpbridge_application::LlmClient)
//! on top of a shared [`LlmTransport`](mcpbridge_application::LlmTransport).
//! [`ProviderClientFactory`] picks the client matching the configuration.

mod factory;
mod gemini;
mod http;
mod http_error;
mod openai;

pub use factory::ProviderClientFactory;
pub use gemini::{GEMINI_API_ENDPOINT, GeminiClient};
pub use http::ReqwestTransport;
pub use openai::OpenAiClient;

/// `User-Agent` sent with every provider request.
pub const USER_AGENT: &str = concat!("mcpbridge/", env!("CARGO_PKG_VERSION"));

#[cfg(test)]
pub(crate) mod test_support {
    use async_trait::async_trait;
    use mcpbridge_application::{HttpResponse, LlmTransport, TransportError};
    use serde_json::Value;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// A request seen by [`RecordingTransport`].
    #[derive(Debug, Clone)]
    pub struct SentRequest {
        pub url: String,
        pub headers: Vec<(String, String)>,
        pub body: Value,
    }

    impl SentRequest {
        pub fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(n, _)| n.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
        }
    }

    /// Replays canned responses and records every request.
    #[derive(Default)]
    pub struct RecordingTransport {
        pub responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
        pub sent: Mutex<Vec<SentRequest>>,
    }

    impl RecordingTransport {
        pub fn replying(responses: Vec<Result<HttpResponse, TransportError>>) -> Self {
            Self {
                responses: Mutex::new(VecDeque::from(responses)),
                sent: Mutex::new(Vec::new()),
            }
        }

        pub fn last_request(&self) -> SentRequest {
            self.sent.lock().unwrap().last().cloned().unwrap()
        }
    }

    #[async_trait]
    impl LlmTransport for RecordingTransport {
        async fn post_json(
            &self,
            url: &str,
            headers: &[(String, String)],
            body: &Value,
        ) -> Result<HttpResponse, TransportError> {
            self.sent.lock().unwrap().push(SentRequest {
                url: url.to_string(),
                headers: headers.to_vec(),
                body: body.clone(),
            });
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::Connection("no scripted response".to_string())))
        }
    }
}
