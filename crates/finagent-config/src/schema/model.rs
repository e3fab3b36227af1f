//! Language model provider settings.

use serde::{Deserialize, Serialize};
use std::fmt;

use finagent_common::provider::{DEFAULT_API_BASE, DEFAULT_MODEL};

/// Model provider configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model name, e.g. `gemini-2.0-flash`.
    pub name: String,
    /// Base URL of the Generative Language models endpoint.
    pub api_base: String,
    pub max_output_tokens: u32,
    /// Sampling temperature (valid range: 0.0-2.0).
    pub temperature: f64,
    /// Whole-request timeout in seconds.
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// Credential fallback; `GEMINI_API_KEY` takes precedence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl fmt::Debug for ModelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelConfig")
            .field("name", &self.name)
            .field("api_base", &self.api_base)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("temperature", &self.temperature)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_MODEL.into(),
            api_base: DEFAULT_API_BASE.into(),
            max_output_tokens: 4096,
            temperature: 0.7,
            request_timeout_secs: 120,
            connect_timeout_secs: 10,
            api_key: None,
        }
    }
}
