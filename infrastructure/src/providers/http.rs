//! reqwest-backed [`LlmTransport`]

use async_trait::async_trait;
use mcpbridge_application::{HttpResponse, LlmTransport, TransportError};
use mcpbridge_domain::ConfigurationError;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Shared HTTP client with the configured request timeout.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, ConfigurationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ConfigurationError::HttpClient(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl LlmTransport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Value,
    ) -> Result<HttpResponse, TransportError> {
        let mut request = self.client.post(url).json(body);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = response.text().await.map_err(map_reqwest_error)?;

        debug!(component = "http", url, status, bytes = text.len(), "Received response");

        let response = HttpResponse::new(status, text);
        Ok(match retry_after {
            Some(value) => response.with_retry_after(value),
            None => response,
        })
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Connection(e.to_string())
    }
}
