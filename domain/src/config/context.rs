//! Validated invocation context

use super::command::{CommandChain, CommandLevel};
use super::server::{PROMPT_OPTION, ToolServerConfig, ToolServerConfigParser};
use crate::core::error::ConfigurationError;
use serde_json::Value;

/// Everything a session needs from the invocation: the user prompt and the
/// tool servers to bridge.
#[derive(Debug, Clone, PartialEq)]
pub struct Context {
    pub prompt: String,
    pub servers: Vec<ToolServerConfig>,
}

impl Context {
    pub fn new(prompt: impl Into<String>, servers: Vec<ToolServerConfig>) -> Self {
        Self {
            prompt: prompt.into(),
            servers,
        }
    }

    /// Validate a command chain into a context.
    ///
    /// The server list is validated before the prompt so that a broken tool
    /// entry is reported even when the prompt is also missing.
    pub fn from_chain(chain: &CommandChain) -> Result<Self, ConfigurationError> {
        let servers = ToolServerConfigParser::parse(chain)?;

        let prompt = chain
            .get(CommandLevel::Root)
            .and_then(|root| root.option(PROMPT_OPTION))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or(ConfigurationError::MissingPrompt)?;

        Ok(Self {
            prompt: prompt.to_string(),
            servers,
        })
    }
}
