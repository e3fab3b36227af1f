//! System configuration types: market data location and logging.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// File-backed market data source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Root directory holding one sub-directory per ticker.
    pub dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: dirs::data_dir()
                .map(|d| d.join("finagent").join("market"))
                .unwrap_or_else(|| PathBuf::from("data")),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `finagent=debug`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "finagent=info".into(),
        }
    }
}
