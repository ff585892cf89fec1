/// LLM Client — the single point of entry for all hosted-model calls.
///
/// ARCHITECTURAL RULE: No other module may call a model provider directly.
/// Providers are adapters behind `TextGenerator`; the pipeline only ever sees raw text.
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::warn;

use crate::config::{Config, LlmProvider};

pub mod gemini;
pub mod openai;
pub mod prompts;

pub use gemini::GeminiClient;
pub use openai::OpenAiClient;

const HTTP_TIMEOUT_SECS: u64 = 120;

/// Why a model call failed. Callers treat every variant the same way (fall back);
/// the variants exist for diagnostics only.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API credential is not configured")]
    MissingCredential,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Response blocked by provider: {0}")]
    Blocked(String),

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Per-call generation settings. Built once from `Config` and passed down explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

/// Capability interface over a hosted text-generation endpoint.
///
/// One attempt per call, no retries. Implementations must return
/// `LlmError::EmptyContent` rather than `Ok("")`.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        system: &str,
        config: &GenerationConfig,
    ) -> Result<String, LlmError>;

    /// Short provider label used in logs.
    fn provider(&self) -> &'static str;
}

/// Shared reqwest client for all adapters.
pub(crate) fn http_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()
        .expect("Failed to build HTTP client")
}

/// Rejects blank output so every adapter reports it the same way.
pub(crate) fn non_empty(text: String) -> Result<String, LlmError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(LlmError::EmptyContent)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Builds the adapter selected by `LLM_PROVIDER`.
pub fn build_generator(config: &Config) -> Arc<dyn TextGenerator> {
    let api_key = config.active_api_key().map(str::to_string);
    if api_key.is_none() {
        warn!(
            "No API key configured for {:?}; recommendations will use local fallback scoring",
            config.llm_provider
        );
    }

    match config.llm_provider {
        LlmProvider::OpenAi => Arc::new(OpenAiClient::new(api_key)),
        LlmProvider::Gemini => Arc::new(GeminiClient::new(api_key)),
    }
}
