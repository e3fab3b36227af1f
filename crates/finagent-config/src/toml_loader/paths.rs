//! Where the config file lives, and writing the commented default.

use finagent_common::ConfigError;
use std::path::{Path, PathBuf};
use tracing::info;

use super::template::default_config_toml;

const APP_DIR: &str = "finagent";
const CONFIG_FILE: &str = "config.toml";

/// `<platform config dir>/finagent/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
        .ok_or_else(|| ConfigError::ParseError("could not determine config directory".into()))
}

/// Write the documented default config to `path`, creating parent
/// directories as needed.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    let write_failed = |what: &str, target: &Path, e: std::io::Error| {
        ConfigError::ParseError(format!("failed to {what} {}: {e}", target.display()))
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| write_failed("create config directory", parent, e))?;
    }
    std::fs::write(path, default_config_toml())
        .map_err(|e| write_failed("write default config to", path, e))?;

    info!(path = %path.display(), "created default config");
    Ok(())
}
