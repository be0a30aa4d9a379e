//! OpenAI-compatible chat-completion client
//!
//! One POST per invocation, no retries, no timeout beyond the transport's.
//! The base URL from settings is used verbatim with the /chat/completions
//! path appended.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;

use super::{ApiConfig, CompletionClient};
use crate::error::SuggestError;

/// Fixed sampling temperature for suggestion generation
const TEMPERATURE: f64 = 0.8;

/// Models with visible reasoning wrap it in think tags; those segments are
/// diagnostics, never suggestions.
static THINK_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("valid regex"));

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Debug, Default)]
pub struct OpenAiClient {
    http: reqwest::Client,
}

impl OpenAiClient {
    pub fn new() -> Self {
        OpenAiClient {
            http: reqwest::Client::new(),
        }
    }

    /// Request body for the given model and prompt
    pub(crate) fn build_request_body(model: &str, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": TEMPERATURE,
        })
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, config: &ApiConfig, prompt: &str) -> Result<String, SuggestError> {
        let url = format!("{}/chat/completions", config.base_url);
        let body = Self::build_request_body(&config.model, prompt);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SuggestError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SuggestError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let payload = response
            .text()
            .await
            .map_err(|e| SuggestError::Network(e.to_string()))?;
        parse_content(&payload)
    }
}

/// Extract choices[0].message.content, drop think segments, trim.
pub(crate) fn parse_content(payload: &str) -> Result<String, SuggestError> {
    let response: ChatResponse =
        serde_json::from_str(payload).map_err(|e| SuggestError::MalformedResponse(e.to_string()))?;
    let content = response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| SuggestError::MalformedResponse("choices array is empty".to_string()))?;
    Ok(strip_think_segments(&content).trim().to_string())
}

/// Remove `<think>...</think>` segments, including multiline ones.
pub(crate) fn strip_think_segments(content: &str) -> String {
    THINK_SEGMENT.replace_all(content, "").into_owned()
}

#[cfg(test)]
#[path = "openai_tests.rs"]
mod openai_tests;
