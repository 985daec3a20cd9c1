use std::str::FromStr;

use anyhow::{bail, Context, Result};

const DEFAULT_RECENT_LIMIT: usize = 10;

/// Which completion provider backs content generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Gemini,
    OpenAi,
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(ProviderKind::Gemini),
            "openai" => Ok(ProviderKind::OpenAi),
            other => bail!("LLM_PROVIDER must be 'gemini' or 'openai', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Startup fails if the selected provider's API key is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub llm_provider: ProviderKind,
    pub llm_api_key: String,
    pub llm_model: Option<String>,
    /// When unset, generations are kept in memory.
    pub database_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
    pub recent_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let llm_provider: ProviderKind = optional_env("LLM_PROVIDER")
            .unwrap_or_else(|| "gemini".to_string())
            .parse()?;
        let llm_api_key = match llm_provider {
            ProviderKind::Gemini => require_env("GEMINI_API_KEY")?,
            ProviderKind::OpenAi => require_env("OPENAI_API_KEY")?,
        };

        Ok(Config {
            llm_provider,
            llm_api_key,
            llm_model: optional_env("LLM_MODEL"),
            database_url: optional_env("DATABASE_URL"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            recent_limit: optional_env("RECENT_GENERATIONS_LIMIT")
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("RECENT_GENERATIONS_LIMIT must be a positive integer")?
                .unwrap_or(DEFAULT_RECENT_LIMIT),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_parses_case_insensitively() {
        assert_eq!("Gemini".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
        assert_eq!(" openai ".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
    }

    #[test]
    fn test_unknown_provider_is_rejected() {
        let err = "claude".parse::<ProviderKind>().unwrap_err();
        assert!(err.to_string().contains("claude"));
    }
}
