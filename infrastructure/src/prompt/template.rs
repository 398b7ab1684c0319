//! JSON prompt templates
//!
//! A template is a JSON document written with doubled braces (`{{`/`}}`)
//! and a `{user_prompt}` placeholder:
//!
//! ```text
//! {{
//!   "messages": [
//!     {{"role": "system", "content": "You are ..."}},
//!     {{"role": "user", "content": "{user_prompt}"}}
//!   ]
//! }}
//! ```
//!
//! Only the system content is taken from the template; the user content is
//! always the prompt itself, inserted as a plain string so no escaping of
//! user input is needed.

use mcpbridge_application::{PromptBuilderPort, PromptError};
use mcpbridge_domain::InitialPrompt;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

const DEFAULT_TEMPLATE: &str = include_str!("../../templates/default.txt");
const USER_PROMPT_PLACEHOLDER: &str = "{user_prompt}";

#[derive(Debug, Clone)]
pub struct TemplatePromptBuilder {
    name: String,
    system: String,
}

impl TemplatePromptBuilder {
    /// The built-in template.
    pub fn builtin() -> Result<Self, PromptError> {
        Self::parse("default", DEFAULT_TEMPLATE)
    }

    /// Load a template file.
    pub fn from_file(path: &Path) -> Result<Self, PromptError> {
        let content = std::fs::read_to_string(path).map_err(|e| PromptError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::parse(name, &content)
    }

    /// Parse template text.
    pub fn parse(name: impl Into<String>, content: &str) -> Result<Self, PromptError> {
        let name = name.into();
        let json_like = content
            .replace("{{", "{")
            .replace("}}", "}")
            .replace(USER_PROMPT_PLACEHOLDER, "");

        let template: Value =
            serde_json::from_str(&json_like).map_err(|e| PromptError::InvalidTemplate {
                name: name.clone(),
                reason: e.to_string(),
            })?;

        let system = system_content(&template).unwrap_or_else(|| {
            warn!(component = "prompt", template = %name, "Template has no leading system message");
            String::new()
        });
        debug!(component = "prompt", template = %name, chars = system.len(), "Loaded prompt template");

        Ok(Self { name, system })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn system_content(&self) -> &str {
        &self.system
    }
}

/// `messages[0].content` when the first message is a system message.
fn system_content(template: &Value) -> Option<String> {
    let first = template.get("messages")?.as_array()?.first()?;
    if first.get("role")?.as_str()? != "system" {
        return None;
    }
    Some(first.get("content")?.as_str()?.to_string())
}

impl PromptBuilderPort for TemplatePromptBuilder {
    fn build_initial_prompt(&self, user_prompt: &str) -> Result<InitialPrompt, PromptError> {
        Ok(InitialPrompt::new(self.system.clone(), user_prompt))
    }
}
