//! Domain error types

use thiserror::Error;

/// Fatal configuration problems.
///
/// These are always surfaced before any network or process activity:
/// command-chain validation, environment-driven LLM settings, and HTTP
/// client construction all report through this type.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("Missing command level '{level}'")]
    MissingCommandLevel { level: &'static str },

    #[error("Unexpected command at level '{level}': expected '{expected}', got '{found}'")]
    UnexpectedCommand {
        level: &'static str,
        expected: &'static str,
        found: String,
    },

    #[error("Unexpected extra command level '{found}' after the transport level")]
    ExtraCommandLevel { found: String },

    #[error("No tools configured for the transport level")]
    MissingTools,

    #[error("Tool entry #{index} is not a mapping: {entry}")]
    InvalidToolEntry { index: usize, entry: String },

    #[error("Missing required field '{field}' in tool entry: {entry}")]
    MissingToolField { field: &'static str, entry: String },

    #[error("Duplicate tool server name '{0}'")]
    DuplicateServerName(String),

    #[error("Tool server name '{name}' must not contain '{separator}'")]
    InvalidServerName { name: String, separator: char },

    #[error("Prompt is not set in command options")]
    MissingPrompt,

    #[error("Required environment variable '{0}' is not set")]
    MissingVariable(String),

    #[error("{variable} {reason}")]
    InvalidValue { variable: String, reason: String },

    #[error("Unsupported LLM provider '{0}' (expected one of: openai, gemini)")]
    UnsupportedProvider(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

impl ConfigurationError {
    /// Build an [`InvalidValue`](Self::InvalidValue) error for a value below its minimum.
    pub fn below_minimum(variable: impl Into<String>, min: impl ToString, got: impl ToString) -> Self {
        Self::InvalidValue {
            variable: variable.into(),
            reason: format!("must be >= {}, got {}", min.to_string(), got.to_string()),
        }
    }

    /// Build an [`InvalidValue`](Self::InvalidValue) error for a value above its maximum.
    pub fn above_maximum(variable: impl Into<String>, max: impl ToString, got: impl ToString) -> Self {
        Self::InvalidValue {
            variable: variable.into(),
            reason: format!("must be <= {}, got {}", max.to_string(), got.to_string()),
        }
    }
}
