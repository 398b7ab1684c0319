//! Construction of the configured provider client

use super::gemini::GeminiClient;
use super::http::ReqwestTransport;
use super::openai::OpenAiClient;
use crate::config::ConfigLoader;
use mcpbridge_application::{ConfiguredLlmClient, LlmClient, LlmClientFactory, LlmTransport};
use mcpbridge_domain::{ConfigurationError, LlmConfig, LlmProvider};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

enum ConfigSource {
    /// Read from files and environment when the client is created.
    Load { config_path: Option<PathBuf> },
    Fixed(LlmConfig),
}

/// Builds an [`OpenAiClient`] or [`GeminiClient`] according to the
/// LLM configuration.
pub struct ProviderClientFactory {
    source: ConfigSource,
    transport: Option<Arc<dyn LlmTransport>>,
}

impl ProviderClientFactory {
    /// Configuration is read from all sources on [`create`](LlmClientFactory::create).
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self {
            source: ConfigSource::Load { config_path },
            transport: None,
        }
    }

    /// Use an already validated configuration.
    pub fn with_config(config: LlmConfig) -> Self {
        Self {
            source: ConfigSource::Fixed(config),
            transport: None,
        }
    }

    /// Replace the HTTP transport (otherwise a [`ReqwestTransport`] is built
    /// with the configured timeout).
    pub fn with_transport(mut self, transport: Arc<dyn LlmTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    fn config(&self) -> Result<LlmConfig, ConfigurationError> {
        match &self.source {
            ConfigSource::Load { config_path } => ConfigLoader::load_llm_config(config_path.as_deref()),
            ConfigSource::Fixed(config) => {
                config.validate()?;
                Ok(config.clone())
            }
        }
    }
}

impl LlmClientFactory for ProviderClientFactory {
    fn create(&self, session_id: &str) -> Result<ConfiguredLlmClient, ConfigurationError> {
        let config = self.config()?;
        debug!(component = "llm_factory", config = %config, "Creating LLM client");

        let transport: Arc<dyn LlmTransport> = match &self.transport {
            Some(transport) => transport.clone(),
            None => Arc::new(ReqwestTransport::new(config.timeout())?),
        };

        let client: Box<dyn LlmClient> = match config.provider {
            LlmProvider::OpenAi => Box::new(OpenAiClient::new(transport, config.clone(), session_id)?),
            LlmProvider::Gemini => Box::new(GeminiClient::new(transport, config.clone(), session_id)),
        };

        Ok(ConfiguredLlmClient { client, config })
    }
}
