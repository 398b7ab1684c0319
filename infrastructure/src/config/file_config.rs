//! Raw LLM configuration as merged from files and environment
//!
//! Keys are flat and match the environment variables without the
//! `MCPBRIDGE_` prefix (`MCPBRIDGE_LLM_MODEL` ⇔ `llm_model`). Values are kept
//! loosely typed here so that type and range errors can name the offending
//! variable; [`FileLlmConfig::into_llm_config`] performs the validation.

use mcpbridge_domain::config::env;
use mcpbridge_domain::{ConfigurationError, LlmConfig, LlmProvider};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLlmConfig {
    pub llm_provider: Option<Value>,
    pub openai_api_key: Option<Value>,
    pub gemini_api_key: Option<Value>,
    pub llm_base_url: Option<Value>,
    pub llm_model: Option<Value>,
    pub llm_temperature: Option<Value>,
    pub llm_max_tokens: Option<Value>,
    pub llm_timeout: Option<Value>,
    pub llm_tools_enabled: Option<Value>,
}

impl FileLlmConfig {
    /// Validate into an immutable [`LlmConfig`].
    ///
    /// The API key of the selected provider is required; everything else
    /// falls back to provider defaults.
    pub fn into_llm_config(self) -> Result<LlmConfig, ConfigurationError> {
        let provider = match string_setting(env::PROVIDER, self.llm_provider.as_ref())? {
            Some(name) => name.parse::<LlmProvider>()?,
            None => LlmProvider::default(),
        };

        let key_variable = provider.api_key_variable();
        let key_value = match provider {
            LlmProvider::OpenAi => self.openai_api_key.as_ref(),
            LlmProvider::Gemini => self.gemini_api_key.as_ref(),
        };
        let api_key = string_setting(key_variable, key_value)?
            .ok_or_else(|| ConfigurationError::MissingVariable(key_variable.to_string()))?;

        let mut config = LlmConfig::new(provider, api_key);

        if provider.requires_base_url()
            && let Some(base_url) = string_setting(env::BASE_URL, self.llm_base_url.as_ref())?
        {
            config = config.with_base_url(base_url.trim_end_matches('/'));
        }
        if let Some(model) = string_setting(env::MODEL, self.llm_model.as_ref())? {
            config = config.with_model(model);
        }
        if let Some(temperature) = float_setting(env::TEMPERATURE, self.llm_temperature.as_ref())? {
            config = config.with_temperature(temperature);
        }
        if let Some(max_tokens) = int_setting(env::MAX_TOKENS, self.llm_max_tokens.as_ref())? {
            if max_tokens < 1 {
                return Err(ConfigurationError::below_minimum(env::MAX_TOKENS, 1, max_tokens));
            }
            let max_tokens = u32::try_from(max_tokens).map_err(|_| {
                ConfigurationError::above_maximum(env::MAX_TOKENS, u32::MAX, max_tokens)
            })?;
            config = config.with_max_tokens(max_tokens);
        }
        if let Some(timeout) = float_setting(env::TIMEOUT, self.llm_timeout.as_ref())? {
            config = config.with_timeout_secs(timeout);
        }
        if let Some(enabled) = bool_setting(env::TOOLS_ENABLED, self.llm_tools_enabled.as_ref())? {
            config = config.with_tools_enabled(enabled);
        }

        config.validate()?;
        Ok(config)
    }
}

fn invalid(variable: &str, expected: &str, got: &Value) -> ConfigurationError {
    ConfigurationError::InvalidValue {
        variable: variable.to_string(),
        reason: format!("must be {expected}, got {got}"),
    }
}

/// Empty and whitespace-only strings count as unset.
fn string_setting(variable: &str, value: Option<&Value>) -> Result<Option<String>, ConfigurationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        // Figment parses numeric-looking values; a model named "4" is still a string.
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(invalid(variable, "a string", other)),
    }
}

fn float_setting(variable: &str, value: Option<&Value>) -> Result<Option<f64>, ConfigurationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_f64().map(Some).ok_or_else(|| invalid(variable, "a number", &Value::Number(n.clone()))),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(v @ Value::String(s)) => s.trim().parse::<f64>().map(Some).map_err(|_| invalid(variable, "a number", v)),
        Some(other) => Err(invalid(variable, "a number", other)),
    }
}

fn int_setting(variable: &str, value: Option<&Value>) -> Result<Option<i64>, ConfigurationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v @ Value::Number(n)) => n.as_i64().map(Some).ok_or_else(|| invalid(variable, "an integer", v)),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(v @ Value::String(s)) => s.trim().parse::<i64>().map(Some).map_err(|_| invalid(variable, "an integer", v)),
        Some(other) => Err(invalid(variable, "an integer", other)),
    }
}

fn bool_setting(variable: &str, value: Option<&Value>) -> Result<Option<bool>, ConfigurationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(v @ Value::Number(n)) => match n.as_i64() {
            Some(0) => Ok(Some(false)),
            Some(1) => Ok(Some(true)),
            _ => Err(invalid(variable, "a boolean", v)),
        },
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(v @ Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(Some(true)),
            "false" | "no" | "off" | "0" => Ok(Some(false)),
            _ => Err(invalid(variable, "a boolean", v)),
        },
        Some(other) => Err(invalid(variable, "a boolean", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn openai() -> FileLlmConfig {
        FileLlmConfig {
            openai_api_key: Some(json!("sk-test-key")),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_for_openai() {
        let config = openai().into_llm_config().unwrap();
        assert_eq!(config.provider, LlmProvider::OpenAi);
        assert_eq!(config.model, "gpt-4");
        assert_eq!(config.base_url.as_deref(), Some("https://api.openai.com/v1"));
        assert_eq!(config.temperature, 1.0);
        assert_eq!(config.max_tokens, 4096);
        assert_eq!(config.timeout_secs, 120.0);
        assert!(config.tools_enabled);
    }

    #[test]
    fn test_missing_api_key_is_named() {
        let err = FileLlmConfig::default().into_llm_config().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Required environment variable 'MCPBRIDGE_OPENAI_API_KEY' is not set"
        );

        let gemini = FileLlmConfig {
            llm_provider: Some(json!("gemini")),
            openai_api_key: Some(json!("sk-wrong-provider")),
            ..Default::default()
        };
        assert_eq!(
            gemini.into_llm_config().unwrap_err(),
            ConfigurationError::MissingVariable("MCPBRIDGE_GEMINI_API_KEY".to_string())
        );
    }

    #[test]
    fn test_empty_key_counts_as_unset() {
        let config = FileLlmConfig {
            openai_api_key: Some(json!("  ")),
            ..Default::default()
        };
        assert!(matches!(
            config.into_llm_config(),
            Err(ConfigurationError::MissingVariable(_))
        ));
    }

    #[test]
    fn test_gemini_ignores_base_url() {
        let config = FileLlmConfig {
            llm_provider: Some(json!("gemini")),
            gemini_api_key: Some(json!("AIza-key")),
            llm_base_url: Some(json!("https://proxy.example")),
            ..Default::default()
        }
        .into_llm_config()
        .unwrap();
        assert_eq!(config.model, "gemini-pro");
        assert!(config.base_url.is_none());
    }

    #[test]
    fn test_string_values_are_parsed() {
        let config = FileLlmConfig {
            llm_temperature: Some(json!("0.2")),
            llm_max_tokens: Some(json!("512")),
            llm_timeout: Some(json!("30")),
            llm_tools_enabled: Some(json!("false")),
            llm_base_url: Some(json!("http://localhost:8080/v1/")),
            ..openai()
        }
        .into_llm_config()
        .unwrap();

        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.max_tokens, 512);
        assert_eq!(config.timeout_secs, 30.0);
        assert!(!config.tools_enabled);
        assert_eq!(config.base_url.as_deref(), Some("http://localhost:8080/v1"));
    }

    #[test]
    fn test_type_and_range_errors() {
        let err = FileLlmConfig {
            llm_max_tokens: Some(json!("lots")),
            ..openai()
        }
        .into_llm_config()
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "MCPBRIDGE_LLM_MAX_TOKENS must be an integer, got \"lots\""
        );

        let err = FileLlmConfig {
            llm_max_tokens: Some(json!(0)),
            ..openai()
        }
        .into_llm_config()
        .unwrap_err();
        assert_eq!(err.to_string(), "MCPBRIDGE_LLM_MAX_TOKENS must be >= 1, got 0");

        let err = FileLlmConfig {
            llm_temperature: Some(json!(3.5)),
            ..openai()
        }
        .into_llm_config()
        .unwrap_err();
        assert!(err.to_string().starts_with("MCPBRIDGE_LLM_TEMPERATURE must be <= 2"));

        let err = FileLlmConfig {
            llm_timeout: Some(json!(0)),
            ..openai()
        }
        .into_llm_config()
        .unwrap_err();
        assert!(err.to_string().starts_with("MCPBRIDGE_LLM_TIMEOUT must be >= 1"));

        let err = FileLlmConfig {
            llm_timeout: Some(json!(1e20)),
            ..openai()
        }
        .into_llm_config()
        .unwrap_err();
        assert!(err.to_string().starts_with("MCPBRIDGE_LLM_TIMEOUT must be <= "));
    }

    #[test]
    fn test_unknown_provider() {
        let err = FileLlmConfig {
            llm_provider: Some(json!("anthropic")),
            ..openai()
        }
        .into_llm_config()
        .unwrap_err();
        assert_eq!(err, ConfigurationError::UnsupportedProvider("anthropic".to_string()));
    }
}
