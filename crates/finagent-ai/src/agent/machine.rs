//! The tool-calling state machine.

use tracing::{debug, info, warn};

use super::QueryError;
use crate::session::LlmSession;
use crate::tools::{RegisteredTool, ToolError, ToolRegistry};
use crate::{ToolCallRequest, TurnResponse};

/// Where the loop stands after each step.
#[derive(Debug, Clone, PartialEq)]
pub enum LoopState {
    /// A reply arrived and has not been classified yet.
    AwaitingResponse(TurnResponse),
    /// The model asked for a tool.
    ToolDispatch(ToolCallRequest),
    /// The model answered.
    FinalAnswer(String),
}

impl LoopState {
    /// Classify a reply. Text is checked before tool calls, so a reply that
    /// already holds an answer is never treated as a request.
    pub fn from_reply(reply: TurnResponse) -> Result<LoopState, QueryError> {
        match reply {
            TurnResponse::NoCandidate => Err(QueryError::NoResponse),
            TurnResponse::Text(text) if !text.is_empty() => Ok(LoopState::FinalAnswer(text)),
            TurnResponse::ToolCall(call) => Ok(LoopState::ToolDispatch(call)),
            TurnResponse::Text(_) | TurnResponse::Empty => Err(QueryError::CannotProcess),
        }
    }
}

/// Turns used by one query. A turn is one message sent to the model.
#[derive(Debug, Clone)]
pub struct IterationCounter {
    limit: u32,
    taken: u32,
    dispatches: u32,
}

impl IterationCounter {
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            taken: 0,
            dispatches: 0,
        }
    }

    /// Reserve the next turn, or fail once the budget is spent.
    pub fn claim(&mut self) -> Result<(), QueryError> {
        if self.taken >= self.limit {
            return Err(QueryError::BudgetExceeded(self.limit));
        }
        self.taken += 1;
        Ok(())
    }

    pub fn taken(&self) -> u32 {
        self.taken
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn dispatches(&self) -> u32 {
        self.dispatches
    }
}

/// Run one question to completion on `session`.
pub(super) async fn drive(
    session: &mut dyn LlmSession,
    registry: &ToolRegistry,
    counter: &mut IterationCounter,
    question: &str,
    log_result_chars: usize,
) -> Result<String, QueryError> {
    counter.claim()?;
    let mut state = LoopState::AwaitingResponse(session.send(question).await?);

    loop {
        state = match state {
            LoopState::AwaitingResponse(reply) => LoopState::from_reply(reply)?,
            LoopState::ToolDispatch(call) => {
                let tool = registry
                    .resolve(&call.name)
                    .ok_or_else(|| QueryError::UnsupportedTool(call.name.clone()))?;
                counter.claim()?;
                let result = dispatch(tool, &call, log_result_chars).await;
                counter.dispatches += 1;
                LoopState::AwaitingResponse(session.send_tool_result(&call.name, &result).await?)
            }
            LoopState::FinalAnswer(text) => {
                debug!(turns = counter.taken(), "model produced final answer");
                return Ok(text);
            }
        };
    }
}

/// Invoke one tool. Failures become an error envelope for the model.
async fn dispatch(
    tool: &RegisteredTool,
    call: &ToolCallRequest,
    log_result_chars: usize,
) -> String {
    info!(tool = %call.name, args = %call.arguments, "dispatching tool");

    match tool.invoke(&call.arguments).await {
        Ok(result) => {
            info!(
                tool = %call.name,
                result = truncate_chars(&result, log_result_chars),
                "tool returned"
            );
            result
        }
        Err(e @ ToolError::InvalidArguments { .. }) => {
            warn!(tool = %call.name, error = %e, "tool arguments rejected");
            e.to_envelope()
        }
        Err(e) => {
            warn!(tool = %call.name, error = %e, "tool failed");
            e.to_envelope()
        }
    }
}

/// At most `max` characters of `s`, cut on a char boundary.
pub(crate) fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
