//! Finagent configuration system.
//!
//! TOML-based configuration with serde defaults on every section, so a
//! partial (or missing) config file works out of the box. The model
//! credential is resolved separately: the `GEMINI_API_KEY` environment
//! variable wins over the file.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use finagent_config::{load_config, resolve_api_key};
//!
//! let config = load_config().expect("failed to load config");
//! let configured = resolve_api_key(&config).is_some();
//! println!("credential configured: {configured}");
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{AgentConfig, DataConfig, FinagentConfig, LoggingConfig, ModelConfig};
pub use toml_loader::{create_default_config, default_config_path, load_default, load_from_path};

use finagent_common::ConfigError;

/// Environment variable holding the model provider credential.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Load config from the platform default path and validate it.
pub fn load_config() -> Result<FinagentConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Resolve the model credential from the environment, then the config file.
///
/// Empty values count as absent.
pub fn resolve_api_key(config: &FinagentConfig) -> Option<String> {
    pick_api_key(std::env::var(API_KEY_ENV).ok(), config.model.api_key.as_deref())
}

fn pick_api_key(env_value: Option<String>, file_value: Option<&str>) -> Option<String> {
    env_value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| {
            file_value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        })
}

/// Serialize a config to a pretty-printed JSON string with secrets removed.
pub fn config_to_json(config: &FinagentConfig) -> String {
    let mut redacted = config.clone();
    if redacted.model.api_key.is_some() {
        redacted.model.api_key = Some("[REDACTED]".into());
    }
    serde_json::to_string_pretty(&redacted)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
