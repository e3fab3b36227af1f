//! Google Gemini chat session.
//!
//! Implements [`LlmSession`](crate::LlmSession) over the Generative
//! Language API's `generateContent` method with function calling.

mod client;
mod config;
mod session;


pub use config::GeminiConfig;
pub use session::{GeminiSession, GeminiSessionFactory};
