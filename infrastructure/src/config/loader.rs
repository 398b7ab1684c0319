//! LLM configuration loader with multi-source merging

use super::file_config::FileLlmConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use mcpbridge_domain::{ConfigurationError, LlmConfig};
use std::path::{Path, PathBuf};

/// Prefix shared by every environment variable the bridge reads.
pub const ENV_PREFIX: &str = "MCPBRIDGE_";

const PROJECT_CONFIG_FILE: &str = "mcpbridge.toml";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Build the merged configuration source.
    ///
    /// Priority (highest to lowest):
    /// 1. `MCPBRIDGE_*` environment variables
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./mcpbridge.toml`
    /// 4. Global: `<config_dir>/mcpbridge/config.toml`
    /// 5. Default values
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileLlmConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(project_path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(project_path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Read and validate the LLM configuration from all sources.
    pub fn load_llm_config(config_path: Option<&Path>) -> Result<LlmConfig, ConfigurationError> {
        Self::llm_config_from(&Self::figment(config_path))
    }

    /// Validate the LLM configuration held by an already built figment.
    pub fn llm_config_from(figment: &Figment) -> Result<LlmConfig, ConfigurationError> {
        let raw: FileLlmConfig = figment.extract().map_err(|e| {
            let variable = e
                .path
                .last()
                .map(|key| format!("{ENV_PREFIX}{}", key.to_ascii_uppercase()))
                .unwrap_or_else(|| "configuration".to_string());
            ConfigurationError::InvalidValue {
                variable,
                reason: format!("could not be read: {}", e.kind),
            }
        })?;
        raw.into_llm_config()
    }

    /// Get the global config file path
    ///
    /// Returns `<config_dir>/mcpbridge/config.toml`, where the config dir
    /// follows the platform convention (`$XDG_CONFIG_HOME` on Linux).
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("mcpbridge").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        let path = PathBuf::from(PROJECT_CONFIG_FILE);
        path.exists().then_some(path)
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(config_path: Option<&Path>) {
        println!("Configuration sources (in priority order):");
        println!("  [  *  ] Environment: {ENV_PREFIX}*");

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{mark:^5}] Explicit: {}", path.display());
        }

        match Self::project_config_path() {
            Some(path) => println!("  [FOUND] Project: {}", path.display()),
            None => println!("  [     ] Project: ./{PROJECT_CONFIG_FILE}"),
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "     " };
            println!("  [{mark}] Global:  {}", path.display());
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcpbridge_domain::LlmProvider;
    use std::io::Write;

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("mcpbridge"));
    }

    #[test]
    fn test_toml_values_are_merged() {
        let figment = Figment::new()
            .merge(Serialized::defaults(FileLlmConfig::default()))
            .merge(Toml::string(
                r#"
                llm_provider = "gemini"
                gemini_api_key = "AIza-from-file"
                llm_model = "gemini-1.5-pro"
                llm_temperature = 0.3
                llm_tools_enabled = false
                "#,
            ));

        let config = ConfigLoader::llm_config_from(&figment).unwrap();
        assert_eq!(config.provider, LlmProvider::Gemini);
        assert_eq!(config.api_key, "AIza-from-file");
        assert_eq!(config.model, "gemini-1.5-pro");
        assert_eq!(config.temperature, 0.3);
        assert!(!config.tools_enabled);
    }

    #[test]
    fn test_later_sources_override_earlier_ones() {
        let figment = Figment::new()
            .merge(Toml::string(
                "openai_api_key = \"sk-file\"\nllm_model = \"gpt-4o\"",
            ))
            .merge(Serialized::default("llm_model", "gpt-4o-mini"));

        let config = ConfigLoader::llm_config_from(&figment).unwrap();
        assert_eq!(config.api_key, "sk-file");
        assert_eq!(config.model, "gpt-4o-mini");
    }

    #[test]
    fn test_explicit_file_is_read() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "openai_api_key = \"sk-explicit\"").unwrap();
        writeln!(file, "llm_max_tokens = 256").unwrap();

        let figment = Figment::new().merge(Toml::file(file.path()));
        let config = ConfigLoader::llm_config_from(&figment).unwrap();
        assert_eq!(config.api_key, "sk-explicit");
        assert_eq!(config.max_tokens, 256);
    }

    #[test]
    fn test_missing_key_reported() {
        let figment = Figment::new().merge(Serialized::defaults(FileLlmConfig::default()));
        let err = ConfigLoader::llm_config_from(&figment).unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::MissingVariable("MCPBRIDGE_OPENAI_API_KEY".to_string())
        );
    }
}
