//! Stateful Gemini chat session and its factory.

use async_trait::async_trait;
use serde_json::Value;

use super::client::{
    build_request_body, function_response, parse_response, user_message, GeminiClient,
};
use super::config::GeminiConfig;
use crate::session::{LlmSession, SessionFactory};
use crate::token_tracker::TokenTracker;
use crate::tools::to_gemini_tool;
use crate::{AiError, TokenUsage, ToolDefinition, TurnResponse};

/// One conversation with a Gemini model.
///
/// Keeps the full `contents` history so every request carries the prior
/// turns, including the model's own function calls.
pub struct GeminiSession {
    client: GeminiClient,
    system_instruction: String,
    tools: Vec<Value>,
    history: Vec<Value>,
    tracker: TokenTracker,
}

impl GeminiSession {
    pub(crate) fn new(
        client: GeminiClient,
        system_instruction: &str,
        tools: &[ToolDefinition],
    ) -> Self {
        Self {
            client,
            system_instruction: system_instruction.to_string(),
            tools: tools.iter().map(to_gemini_tool).collect(),
            history: Vec::new(),
            tracker: TokenTracker::new(),
        }
    }

    async fn exchange(&mut self, content: Value) -> Result<TurnResponse, AiError> {
        self.history.push(content);
        let body = build_request_body(
            &self.client.config,
            &self.system_instruction,
            &self.history,
            &self.tools,
        );

        let json = self.client.generate(&body).await?;
        let reply = parse_response(&json)?;
        self.tracker.record(&reply.usage);
        if let Some(content) = reply.content {
            self.history.push(content);
        }
        Ok(reply.turn)
    }
}

#[async_trait]
impl LlmSession for GeminiSession {
    async fn send(&mut self, message: &str) -> Result<TurnResponse, AiError> {
        self.exchange(user_message(message)).await
    }

    async fn send_tool_result(
        &mut self,
        tool_name: &str,
        result: &str,
    ) -> Result<TurnResponse, AiError> {
        self.exchange(function_response(tool_name, result)).await
    }

    fn usage(&self) -> TokenUsage {
        self.tracker.total()
    }
}

/// Opens [`GeminiSession`]s that share one HTTP connection pool.
pub struct GeminiSessionFactory {
    config: GeminiConfig,
    http: reqwest::Client,
}

impl GeminiSessionFactory {
    pub fn new(config: GeminiConfig) -> Result<Self, AiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AiError::NetworkError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

impl SessionFactory for GeminiSessionFactory {
    fn open(
        &self,
        credential: &str,
        system_instruction: &str,
        tools: &[ToolDefinition],
    ) -> Result<Box<dyn LlmSession>, AiError> {
        let client = GeminiClient {
            config: self.config.clone(),
            api_key: credential.to_string(),
            http: self.http.clone(),
        };
        Ok(Box::new(GeminiSession::new(client, system_instruction, tools)))
    }
}
