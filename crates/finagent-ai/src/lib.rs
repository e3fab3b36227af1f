//! AI engine for Finagent.
//!
//! Drives a tool-calling conversation with a language model until it
//! produces a final answer:
//! - Tool registry with schema-validated, typed dispatch
//! - Provider declarations built from the registry
//! - Gemini chat session over the Generative Language API
//! - Orchestration loop with a bounded turn budget
//! - Token usage tracking

pub mod agent;
pub mod gemini;
pub mod session;
pub mod token_tracker;
pub mod tools;

pub use agent::{
    default_system_instruction, is_error_answer, Agent, AgentSettings, QueryError, ERROR_MARKER,
};
pub use gemini::{GeminiConfig, GeminiSession, GeminiSessionFactory};
pub use session::{LlmSession, SessionFactory};
pub use token_tracker::TokenTracker;
pub use tools::{
    error_envelope, sync_handler, to_gemini_tool, ParamKind, ParamSpec, RegistryError, ToolArgs,
    ToolError, ToolHandler, ToolRegistry, ToolSpec,
};

/// Provider-neutral declaration of one callable tool.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema object describing the arguments, in declaration order.
    pub parameters: serde_json::Value,
}

/// A model's request to invoke one tool.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ToolCallRequest {
    pub name: String,
    pub arguments: serde_json::Value,
}

/// The model's reply to one message.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnResponse {
    /// The provider returned no candidate at all.
    NoCandidate,
    /// Non-empty free text; the conversation is finished.
    Text(String),
    /// A request to call one tool.
    ToolCall(ToolCallRequest),
    /// A candidate with neither text nor a tool call.
    Empty,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("API error: {0}")]
    ApiError(String),
    #[error("Rate limited")]
    RateLimited,
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Timeout")]
    Timeout,
}
