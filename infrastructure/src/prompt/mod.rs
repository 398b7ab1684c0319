//! Prompt template loading

mod template;

pub use template::TemplatePromptBuilder;
