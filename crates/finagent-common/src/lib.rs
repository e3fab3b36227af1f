//! Types shared by every Finagent crate.

pub mod errors;
pub mod id;
pub mod provider;

pub use errors::{ConfigError, FinagentError};
pub use id::QueryId;

pub type Result<T> = std::result::Result<T, FinagentError>;
