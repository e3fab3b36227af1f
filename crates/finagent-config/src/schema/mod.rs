//! Configuration schema types for Finagent.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod agent;
mod model;
mod system;

pub use agent::*;
pub use model::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Root configuration for Finagent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FinagentConfig {
    pub model: ModelConfig,
    pub agent: AgentConfig,
    pub data: DataConfig,
    pub logging: LoggingConfig,
}
