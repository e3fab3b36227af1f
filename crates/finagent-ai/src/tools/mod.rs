//! Tool registry and declarations.
//!
//! Tools are named, schema-described functions the model may ask to call
//! to fetch external data. The registry is built once at startup and is
//! read-only afterwards, so one instance can be shared by every query.

mod declarations;
mod registry;
mod spec;


pub use declarations::{to_gemini_schema, to_gemini_tool};
pub use registry::{sync_handler, RegisteredTool, RegistryError, ToolHandler, ToolRegistry};
pub use spec::{ParamKind, ParamSpec, ToolArgs, ToolSpec};

/// Failure of a single tool invocation.
///
/// Always recoverable: the loop folds it into an error envelope and hands it
/// back to the model instead of aborting the query.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ToolError {
    #[error("invalid arguments for tool '{tool}': {reason}")]
    InvalidArguments { tool: String, reason: String },
    #[error("{0}")]
    Execution(String),
    #[error("tool '{0}' panicked")]
    Panicked(String),
}

impl ToolError {
    /// Render as the `{"error": "..."}` payload forwarded to the model.
    pub fn to_envelope(&self) -> String {
        error_envelope(&self.to_string())
    }
}

/// Build the `{"error": "<message>"}` result payload.
pub fn error_envelope(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}
