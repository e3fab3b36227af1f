//! Orchestration settings.

use serde::{Deserialize, Serialize};

/// Tool-calling loop configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Maximum messages sent to the model per query (valid range: 1-50).
    pub max_turns: u32,
    /// History window the model is told to assume when the question
    /// names no dates (valid range: 1-24 months).
    pub default_history_months: u32,
    /// How many characters of each tool result to log.
    pub log_result_chars: usize,
    /// Replaces the built-in system instruction when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_turns: 10,
            default_history_months: 3,
            log_result_chars: 200,
            system_prompt: None,
        }
    }
}
