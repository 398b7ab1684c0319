//! Prompt builder port
//!
//! Produces the system/user pair that seeds a conversation. Template format
//! and file resolution are adapter concerns.

use mcpbridge_domain::InitialPrompt;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PromptError {
    #[error("Failed to read prompt template '{path}': {reason}")]
    Read { path: String, reason: String },

    #[error("Prompt template '{name}' is not valid JSON after brace normalization: {reason}")]
    InvalidTemplate { name: String, reason: String },
}

pub trait PromptBuilderPort: Send + Sync {
    fn build_initial_prompt(&self, user_prompt: &str) -> Result<InitialPrompt, PromptError>;
}
