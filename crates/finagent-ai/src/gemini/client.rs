//! HTTP transport, request building, and response parsing.

use serde_json::Value;
use tracing::{debug, warn};

use super::config::GeminiConfig;
use crate::{AiError, TokenUsage, ToolCallRequest, TurnResponse};

/// Thin `generateContent` caller bound to one credential.
#[derive(Clone)]
pub(crate) struct GeminiClient {
    pub(crate) config: GeminiConfig,
    pub(crate) api_key: String,
    pub(crate) http: reqwest::Client,
}

impl GeminiClient {
    pub(crate) fn api_url(&self) -> String {
        format!(
            "{}/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            self.config.model
        )
    }

    pub(crate) async fn generate(&self, body: &Value) -> Result<Value, AiError> {
        debug!(model = %self.config.model, "Gemini API request");

        let response = self
            .http
            .post(self.api_url())
            .header("content-type", "application/json")
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AiError::RateLimited);
        }
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AiError::ApiError(format!("HTTP {status}: {text}")));
        }

        response
            .json()
            .await
            .map_err(|e| AiError::ParseError(e.to_string()))
    }
}

fn map_transport_error(e: reqwest::Error) -> AiError {
    if e.is_timeout() {
        AiError::Timeout
    } else {
        AiError::NetworkError(e.to_string())
    }
}

/// Build the JSON request body for one `generateContent` call.
pub(crate) fn build_request_body(
    config: &GeminiConfig,
    system_instruction: &str,
    contents: &[Value],
    tools: &[Value],
) -> Value {
    let mut body = serde_json::json!({
        "contents": contents,
        "generationConfig": {
            "maxOutputTokens": config.max_tokens,
            "temperature": config.temperature,
        }
    });

    if !system_instruction.is_empty() {
        body["systemInstruction"] = serde_json::json!({
            "parts": [{ "text": system_instruction }]
        });
    }

    if !tools.is_empty() {
        body["tools"] = serde_json::json!([{ "functionDeclarations": tools }]);
    }

    body
}

/// One parsed reply: the turn outcome, the candidate content to append to
/// the history, and the reported usage.
#[derive(Debug)]
pub(crate) struct ParsedReply {
    pub(crate) turn: TurnResponse,
    pub(crate) content: Option<Value>,
    pub(crate) usage: TokenUsage,
}

/// Parse a Gemini `generateContent` response.
pub(crate) fn parse_response(json: &Value) -> Result<ParsedReply, AiError> {
    if !json.is_object() {
        return Err(AiError::ParseError("response is not a JSON object".into()));
    }

    let usage = TokenUsage {
        input_tokens: json["usageMetadata"]["promptTokenCount"]
            .as_u64()
            .unwrap_or(0),
        output_tokens: json["usageMetadata"]["candidatesTokenCount"]
            .as_u64()
            .unwrap_or(0),
    };

    let Some(first) = json["candidates"].as_array().and_then(|c| c.first()) else {
        if let Some(reason) = json["promptFeedback"]["blockReason"].as_str() {
            warn!(reason, "prompt blocked by provider");
        }
        return Ok(ParsedReply {
            turn: TurnResponse::NoCandidate,
            content: None,
            usage,
        });
    };

    let parts = first["content"]["parts"]
        .as_array()
        .cloned()
        .unwrap_or_default();

    let mut text = String::new();
    let mut calls = Vec::new();
    for part in &parts {
        if part["thought"].as_bool() == Some(true) {
            continue;
        }
        if let Some(t) = part["text"].as_str() {
            text.push_str(t);
        }
        if let Some(fc) = part.get("functionCall") {
            calls.push(ToolCallRequest {
                name: fc["name"].as_str().unwrap_or("").to_string(),
                arguments: fc.get("args").cloned().unwrap_or(Value::Null),
            });
        }
    }

    let turn = if !text.is_empty() {
        TurnResponse::Text(text)
    } else if !calls.is_empty() {
        if calls.len() > 1 {
            warn!(
                requested = calls.len(),
                kept = %calls[0].name,
                "model requested several tool calls in one turn; only the first is dispatched"
            );
        }
        TurnResponse::ToolCall(calls.remove(0))
    } else {
        if let Some(reason) = first["finishReason"].as_str() {
            debug!(reason, "candidate carried no content");
        }
        TurnResponse::Empty
    };

    let dispatched_one = matches!(turn, TurnResponse::ToolCall(_));
    let content = first.get("content").filter(|c| c.is_object()).map(|c| {
        let mut c = c.clone();
        if c.get("role").is_none() {
            c["role"] = Value::from("model");
        }
        if dispatched_one {
            keep_first_function_call(&mut c);
        }
        c
    });

    Ok(ParsedReply {
        turn,
        content,
        usage,
    })
}

/// Drop every `functionCall` part after the first, so the history only
/// holds the call that gets a `functionResponse`.
fn keep_first_function_call(content: &mut Value) {
    let Some(parts) = content.get_mut("parts").and_then(Value::as_array_mut) else {
        return;
    };
    let mut seen_call = false;
    parts.retain(|part| {
        if part.get("functionCall").is_none() {
            return true;
        }
        let keep = !seen_call;
        seen_call = true;
        keep
    });
}

/// A user text message in Gemini `contents` form.
pub(crate) fn user_message(text: &str) -> Value {
    serde_json::json!({
        "role": "user",
        "parts": [{ "text": text }]
    })
}

/// A tool result in Gemini `functionResponse` form.
pub(crate) fn function_response(tool_name: &str, result: &str) -> Value {
    serde_json::json!({
        "role": "user",
        "parts": [{
            "functionResponse": {
                "name": tool_name,
                "response": { "result": result }
            }
        }]
    })
}
