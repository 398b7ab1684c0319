//! Configuration loading for mcpbridge
//!
//! LLM settings are merged from several sources. The priority order
//! (highest to lowest):
//!
//! 1. `MCPBRIDGE_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./mcpbridge.toml`
//! 4. Global: `<config_dir>/mcpbridge/config.toml`
//! 5. Default values
//!
//! File keys use the variable name without the prefix, lowercased
//! (`llm_model = "gpt-4o"`).

mod file_config;
mod loader;

pub use file_config::FileLlmConfig;
pub use loader::{ConfigLoader, ENV_PREFIX};
