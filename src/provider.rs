//! Chat-completion provider abstraction
//!
//! The pipeline talks to a [`CompletionClient`] trait object so tests (and
//! alternative backends) can stand in for the HTTP client.

use async_trait::async_trait;

use crate::error::SuggestError;

mod openai;

pub use openai::OpenAiClient;

/// Connection parameters for one completion call, taken verbatim from settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

/// A chat-completion backend
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Issue a single completion request and return the raw content string.
    ///
    /// At most one request per invocation; retries are the caller's choice
    /// (the pipeline makes none).
    async fn complete(&self, config: &ApiConfig, prompt: &str) -> Result<String, SuggestError>;
}
