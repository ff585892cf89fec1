use anyhow::{bail, Context, Result};

use crate::llm_client::GenerationConfig;
use crate::recommendation::pipeline::RecommendationConfig;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Which hosted model backs the recommendation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    OpenAi,
    Gemini,
}

impl LlmProvider {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(LlmProvider::OpenAi),
            "gemini" => Ok(LlmProvider::Gemini),
            other => bail!("LLM_PROVIDER must be 'openai' or 'gemini', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    pub llm_provider: LlmProvider,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub max_postings: usize,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let max_postings = optional_env("AI_MAX_INTERNSHIPS")
            .unwrap_or_else(|| "20".to_string())
            .parse::<usize>()
            .context("AI_MAX_INTERNSHIPS must be a positive integer")?;
        if max_postings == 0 {
            bail!("AI_MAX_INTERNSHIPS must be a positive integer");
        }

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: optional_env("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            llm_provider: LlmProvider::parse(
                &optional_env("LLM_PROVIDER").unwrap_or_else(|| "openai".to_string()),
            )?,
            openai_api_key: optional_env("OPENAI_API_KEY").or_else(|| optional_env("OPEN_AI_API")),
            openai_model: optional_env("OPENAI_MODEL")
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_model: optional_env("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            max_postings,
            temperature: optional_env("AI_TEMPERATURE")
                .unwrap_or_else(|| "0.25".to_string())
                .parse::<f32>()
                .context("AI_TEMPERATURE must be a number")?
                .clamp(0.0, 1.0),
            max_output_tokens: optional_env("AI_MAX_OUTPUT_TOKENS")
                .unwrap_or_else(|| "900".to_string())
                .parse::<u32>()
                .context("AI_MAX_OUTPUT_TOKENS must be a positive integer")?,
        })
    }

    /// Model id for whichever provider is active.
    pub fn active_model(&self) -> &str {
        match self.llm_provider {
            LlmProvider::OpenAi => &self.openai_model,
            LlmProvider::Gemini => &self.gemini_model,
        }
    }

    /// Credential for whichever provider is active.
    pub fn active_api_key(&self) -> Option<&str> {
        match self.llm_provider {
            LlmProvider::OpenAi => self.openai_api_key.as_deref(),
            LlmProvider::Gemini => self.gemini_api_key.as_deref(),
        }
    }

    pub fn recommendation_config(&self) -> RecommendationConfig {
        RecommendationConfig {
            max_postings: self.max_postings,
            generation: GenerationConfig {
                model: self.active_model().to_string(),
                temperature: self.temperature,
                max_output_tokens: self.max_output_tokens,
            },
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    optional_env(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Reads a variable, trimming whitespace and treating blank values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config(provider: LlmProvider) -> Config {
        Config {
            database_url: "postgres://localhost/internships".to_string(),
            port: 8080,
            rust_log: "info".to_string(),
            llm_provider: provider,
            openai_api_key: Some("sk-test".to_string()),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            max_postings: 20,
            temperature: 0.25,
            max_output_tokens: 900,
        }
    }

    #[test]
    fn test_provider_parse_is_case_insensitive() {
        assert_eq!(LlmProvider::parse("OpenAI").unwrap(), LlmProvider::OpenAi);
        assert_eq!(LlmProvider::parse(" gemini ").unwrap(), LlmProvider::Gemini);
    }

    #[test]
    fn test_provider_parse_rejects_unknown() {
        assert!(LlmProvider::parse("llama").is_err());
    }

    #[test]
    fn test_active_provider_selects_model_and_key() {
        let openai = sample_config(LlmProvider::OpenAi);
        assert_eq!(openai.active_model(), "gpt-4o-mini");
        assert_eq!(openai.active_api_key(), Some("sk-test"));

        let gemini = sample_config(LlmProvider::Gemini);
        assert_eq!(gemini.active_model(), "gemini-1.5-flash");
        assert_eq!(gemini.active_api_key(), None);
    }

    #[test]
    fn test_recommendation_config_carries_generation_settings() {
        let config = sample_config(LlmProvider::OpenAi).recommendation_config();
        assert_eq!(config.max_postings, 20);
        assert_eq!(config.generation.model, "gpt-4o-mini");
        assert_eq!(config.generation.max_output_tokens, 900);
    }
}
