//! Query orchestration.
//!
//! [`Agent::run_query`] opens a fresh session for every question and drives
//! it through the tool-calling state machine until the model answers, the
//! exchange fails, or the turn budget runs out. Every outcome comes back as
//! a string; failures start with [`ERROR_MARKER`].

mod error;
mod machine;
mod prompt;


use std::sync::Arc;

use finagent_common::QueryId;
use tracing::{info, warn, Instrument};

pub use error::QueryError;
pub use machine::{IterationCounter, LoopState};
pub use prompt::{default_system_instruction, DEFAULT_HISTORY_MONTHS};

use crate::session::SessionFactory;
use crate::tools::ToolRegistry;

/// Prefix of every failed answer.
pub const ERROR_MARKER: &str = "Error: ";

/// Whether an answer returned by [`Agent::run_query`] reports a failure.
pub fn is_error_answer(answer: &str) -> bool {
    answer.starts_with(ERROR_MARKER)
}

/// Loop parameters.
#[derive(Debug, Clone)]
pub struct AgentSettings {
    /// Maximum messages sent to the model per query.
    pub max_turns: u32,
    /// Characters of each tool result kept in the dispatch log.
    pub log_result_chars: usize,
    pub system_instruction: String,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_turns: 10,
            log_result_chars: 200,
            system_instruction: default_system_instruction(
                chrono::Local::now().date_naive(),
                DEFAULT_HISTORY_MONTHS,
            ),
        }
    }
}

impl AgentSettings {
    pub fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = instruction.into();
        self
    }

    pub fn with_log_result_chars(mut self, chars: usize) -> Self {
        self.log_result_chars = chars;
        self
    }
}

/// Answers questions by letting a model call registered tools.
///
/// The registry and session factory are shared read-only; each query gets
/// its own session and iteration counter.
pub struct Agent {
    registry: Arc<ToolRegistry>,
    sessions: Arc<dyn SessionFactory>,
    credential: Option<String>,
    settings: AgentSettings,
}

impl Agent {
    pub fn new(
        registry: Arc<ToolRegistry>,
        sessions: Arc<dyn SessionFactory>,
        credential: Option<String>,
        settings: AgentSettings,
    ) -> Self {
        Self {
            registry,
            sessions,
            credential: credential.filter(|c| !c.trim().is_empty()),
            settings,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.credential.is_some()
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &AgentSettings {
        &self.settings
    }

    /// Answer one question. Never fails: errors come back as text starting
    /// with [`ERROR_MARKER`].
    pub async fn run_query(&self, question: &str) -> String {
        let id = QueryId::new();
        let span = tracing::info_span!("query", id = %id);
        match self.try_run_query(question).instrument(span).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(query = %id, error = %e, "query failed");
                e.into_answer()
            }
        }
    }

    /// Answer one question, keeping the failure typed.
    pub async fn try_run_query(&self, question: &str) -> Result<String, QueryError> {
        let credential = self
            .credential
            .as_deref()
            .ok_or(QueryError::MissingCredential)?;

        let declarations = self.registry.declarations();
        let mut session = self.sessions.open(
            credential,
            &self.settings.system_instruction,
            &declarations,
        )?;

        let mut counter = IterationCounter::new(self.settings.max_turns);
        let outcome = machine::drive(
            session.as_mut(),
            &self.registry,
            &mut counter,
            question,
            self.settings.log_result_chars,
        )
        .await;

        let usage = session.usage();
        info!(
            turns = counter.taken(),
            dispatches = counter.dispatches(),
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            ok = outcome.is_ok(),
            "query finished"
        );
        outcome
    }
}
