//! Terminal outcomes of a query.

use super::ERROR_MARKER;
use crate::AiError;

/// Why a query ended without an answer.
///
/// Tool failures have no variant here: they are fed back to the model and
/// never end a query.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("GEMINI_API_KEY is not configured. Set the GEMINI_API_KEY environment variable to your API key.")]
    MissingCredential,
    #[error("no response from model")]
    NoResponse,
    #[error("unsupported tool '{0}'")]
    UnsupportedTool(String),
    #[error("cannot process the question")]
    CannotProcess,
    #[error("exceeded maximum call iterations ({0})")]
    BudgetExceeded(u32),
    #[error("agent failed: {0}")]
    Session(#[from] AiError),
}

impl QueryError {
    /// Render as a user-visible answer.
    pub fn into_answer(self) -> String {
        format!("{ERROR_MARKER}{self}")
    }
}
