//! The conversational channel the orchestration loop talks to.
//!
//! A session is stateful and owned by exactly one query. The loop only ever
//! sends one message and waits for one [`TurnResponse`]; the history stays
//! private to the implementation.

use async_trait::async_trait;

use crate::{AiError, TokenUsage, ToolDefinition, TurnResponse};

#[async_trait]
pub trait LlmSession: Send {
    /// Send a user message and wait for the model's reply.
    async fn send(&mut self, message: &str) -> Result<TurnResponse, AiError>;

    /// Send a tool's result back, keyed by the tool name, and wait for the
    /// model's reply.
    async fn send_tool_result(
        &mut self,
        tool_name: &str,
        result: &str,
    ) -> Result<TurnResponse, AiError>;

    /// Tokens consumed so far by this session.
    fn usage(&self) -> TokenUsage {
        TokenUsage::default()
    }
}

/// Opens fresh sessions, one per query.
pub trait SessionFactory: Send + Sync {
    fn open(
        &self,
        credential: &str,
        system_instruction: &str,
        tools: &[ToolDefinition],
    ) -> Result<Box<dyn LlmSession>, AiError>;
}
