/// LLM Client: the completion capability used for content generation.
///
/// Every provider sits behind `CompletionProvider`. Adapters are constructed once in
/// `main` and handed to the app through `AppState`; nothing here holds global state.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;

pub mod gemini;
pub mod openai;
pub mod prompts;

pub use gemini::GeminiClient;
pub use openai::OpenAiClient;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Sampling constants shared by every content request.
pub const TEMPERATURE: f32 = 0.7;
pub const TOP_P: f32 = 0.95;
pub const TOP_K: u32 = 40;
pub const MAX_OUTPUT_TOKENS: u32 = 2048;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited: {message}")]
    RateLimited { message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

impl LlmError {
    /// Maps a non-success provider response onto a typed error.
    /// 429s and anything mentioning a quota count as rate limiting.
    pub fn from_status(status: u16, message: String) -> Self {
        if status == 429 || message.to_lowercase().contains("quota") {
            LlmError::RateLimited { message }
        } else {
            LlmError::Api { status, message }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
}

/// Only the threshold content generation uses is modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    BlockMediumAndAbove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

/// Sampling and safety configuration passed with every completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
    pub safety: Vec<SafetySetting>,
}

impl CompletionConfig {
    /// The fixed configuration used for marketing content.
    pub fn content_defaults() -> Self {
        let threshold = HarmBlockThreshold::BlockMediumAndAbove;
        Self {
            temperature: TEMPERATURE,
            top_p: TOP_P,
            top_k: TOP_K,
            max_output_tokens: MAX_OUTPUT_TOKENS,
            safety: [
                HarmCategory::Harassment,
                HarmCategory::HateSpeech,
                HarmCategory::SexuallyExplicit,
                HarmCategory::DangerousContent,
            ]
            .into_iter()
            .map(|category| SafetySetting {
                category,
                threshold,
            })
            .collect(),
        }
    }
}

/// A black-box text completion capability.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Turns a prompt into free-form text. No retries.
    async fn complete(&self, prompt: &str, config: &CompletionConfig) -> Result<String, LlmError>;

    fn name(&self) -> &str;
}

fn http_client() -> Result<Client, LlmError> {
    Ok(Client::builder().timeout(REQUEST_TIMEOUT).build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_429_is_rate_limited() {
        let err = LlmError::from_status(429, "Too many requests".to_string());
        assert!(matches!(err, LlmError::RateLimited { .. }));
    }

    #[test]
    fn test_quota_message_is_rate_limited() {
        let err = LlmError::from_status(403, "You exceeded your current Quota".to_string());
        assert!(matches!(err, LlmError::RateLimited { .. }));
    }

    #[test]
    fn test_other_status_is_api_error() {
        let err = LlmError::from_status(401, "invalid api key".to_string());
        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "invalid api key");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_content_defaults_block_four_categories() {
        let config = CompletionConfig::content_defaults();
        assert_eq!(config.safety.len(), 4);
        assert!(config
            .safety
            .iter()
            .all(|s| s.threshold == HarmBlockThreshold::BlockMediumAndAbove));
        assert!((config.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.top_k, 40);
    }

    #[test]
    fn test_safety_setting_wire_names() {
        let setting = SafetySetting {
            category: HarmCategory::HateSpeech,
            threshold: HarmBlockThreshold::BlockMediumAndAbove,
        };
        assert_eq!(
            serde_json::to_value(setting).unwrap(),
            serde_json::json!({
                "category": "HARM_CATEGORY_HATE_SPEECH",
                "threshold": "BLOCK_MEDIUM_AND_ABOVE"
            })
        );
    }
}
