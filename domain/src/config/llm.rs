//! LLM configuration snapshot

use crate::core::error::ConfigurationError;
use crate::llm::LlmProvider;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_TEMPERATURE: f64 = 1.0;
pub const DEFAULT_MAX_TOKENS: u32 = 4096;
pub const DEFAULT_TIMEOUT_SECS: f64 = 120.0;

/// Environment variable names, used both by the loader and in error messages.
pub mod env {
    pub const PROVIDER: &str = "MCPBRIDGE_LLM_PROVIDER";
    pub const OPENAI_API_KEY: &str = "MCPBRIDGE_OPENAI_API_KEY";
    pub const GEMINI_API_KEY: &str = "MCPBRIDGE_GEMINI_API_KEY";
    pub const BASE_URL: &str = "MCPBRIDGE_LLM_BASE_URL";
    pub const MODEL: &str = "MCPBRIDGE_LLM_MODEL";
    pub const TEMPERATURE: &str = "MCPBRIDGE_LLM_TEMPERATURE";
    pub const MAX_TOKENS: &str = "MCPBRIDGE_LLM_MAX_TOKENS";
    pub const TIMEOUT: &str = "MCPBRIDGE_LLM_TIMEOUT";
    pub const TOOLS_ENABLED: &str = "MCPBRIDGE_LLM_TOOLS_ENABLED";
}

/// Immutable snapshot of the LLM settings, read once at session start.
#[derive(Clone, PartialEq)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub api_key: String,
    /// Only meaningful for providers that accept a custom endpoint.
    pub base_url: Option<String>,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub timeout_secs: f64,
    pub tools_enabled: bool,
}

impl LlmConfig {
    /// Create a config with the provider's defaults.
    pub fn new(provider: LlmProvider, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
            base_url: provider
                .requires_base_url()
                .then(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            model: provider.default_model().to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            tools_enabled: true,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: f64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_tools_enabled(mut self, enabled: bool) -> Self {
        self.tools_enabled = enabled;
        self
    }

    /// Check ranges and required values.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigurationError::MissingVariable(
                self.provider.api_key_variable().to_string(),
            ));
        }
        if self.provider.requires_base_url()
            && self.base_url.as_deref().is_none_or(|u| u.trim().is_empty())
        {
            return Err(ConfigurationError::MissingVariable(env::BASE_URL.to_string()));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigurationError::MissingVariable(env::MODEL.to_string()));
        }
        if !self.temperature.is_finite() || self.temperature < 0.0 {
            return Err(ConfigurationError::below_minimum(env::TEMPERATURE, 0.0, self.temperature));
        }
        if self.temperature > 2.0 {
            return Err(ConfigurationError::above_maximum(env::TEMPERATURE, 2.0, self.temperature));
        }
        if self.max_tokens < 1 {
            return Err(ConfigurationError::below_minimum(env::MAX_TOKENS, 1, self.max_tokens));
        }
        if !self.timeout_secs.is_finite() || self.timeout_secs < 1.0 {
            return Err(ConfigurationError::below_minimum(env::TIMEOUT, 1.0, self.timeout_secs));
        }
        if Duration::try_from_secs_f64(self.timeout_secs).is_err() {
            return Err(ConfigurationError::above_maximum(env::TIMEOUT, u64::MAX, self.timeout_secs));
        }
        Ok(())
    }

    /// Request timeout; saturates for values [`validate`](Self::validate) rejects.
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_secs).unwrap_or(Duration::MAX)
    }

    /// API key reduced to its first 8 characters.
    pub fn masked_api_key(&self) -> String {
        let prefix: String = self.api_key.chars().take(8).collect();
        format!("{prefix}...")
    }
}

impl fmt::Display for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LlmConfig(provider={}, model={}, api_key={}, temperature={}, max_tokens={}, timeout={}s, tools_enabled={}",
            self.provider,
            self.model,
            self.masked_api_key(),
            self.temperature,
            self.max_tokens,
            self.timeout_secs,
            self.tools_enabled,
        )?;
        if let Some(base_url) = &self.base_url {
            write!(f, ", base_url={base_url}")?;
        }
        f.write_str(")")
    }
}

// Never print the raw key, not even in debug output.
impl fmt::Debug for LlmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.masked_api_key())
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .field("tools_enabled", &self.tools_enabled)
            .finish()
    }
}
