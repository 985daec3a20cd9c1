//! Content Generation: orchestrates one generation.
//!
//! Flow: build_prompt → completion provider → parse_response.
//!
//! A failed provider call surfaces immediately; retries are the caller's concern.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::generation::parser::{parse_response, ContentResult};
use crate::generation::prompts::build_prompt;
use crate::generation::request::ContentRequest;
use crate::llm_client::{CompletionConfig, CompletionProvider, LlmError};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Rate limited by provider: {0}")]
    RateLimited(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

impl From<LlmError> for GenerationError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::RateLimited { message } => GenerationError::RateLimited(message),
            other => GenerationError::GenerationFailed(other.to_string()),
        }
    }
}

/// Turns requests into content using an injected completion provider.
#[derive(Clone)]
pub struct ContentGenerator {
    provider: Arc<dyn CompletionProvider>,
    config: CompletionConfig,
}

impl ContentGenerator {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider,
            config: CompletionConfig::content_defaults(),
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Runs the full pipeline for one request.
    ///
    /// The parser never fails, so the only errors are provider errors.
    pub async fn generate(&self, request: &ContentRequest) -> Result<ContentResult, GenerationError> {
        let prompt = build_prompt(request);
        info!(
            "Generating {} content via {} ({} char prompt)",
            request.content_type,
            self.provider.name(),
            prompt.len()
        );

        let raw = self
            .provider
            .complete(&prompt, &self.config)
            .await
            .map_err(|e| {
                warn!("Completion via {} failed: {e}", self.provider.name());
                GenerationError::from(e)
            })?;

        Ok(parse_response(&raw, request))
    }
}


#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::fakes::FakeProvider;
    use super::*;
    use crate::generation::request::sample_request;

    #[tokio::test]
    async fn test_generate_end_to_end_blog() {
        let provider = Arc::new(FakeProvider::replying(
            r#"{"title":"5 Tea Benefits","body":"Tea is great...\n\n**Health** matters."}"#,
        ));
        let generator = ContentGenerator::new(provider.clone());

        let result = generator.generate(&sample_request()).await.unwrap();

        assert_eq!(
            result,
            ContentResult::minimal("5 Tea Benefits", "Tea is great...\n\n**Health** matters.")
        );
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_generate_sends_built_prompt() {
        let provider = Arc::new(FakeProvider::replying("Title\nBody"));
        let generator = ContentGenerator::new(provider.clone());
        let request = sample_request();

        generator.generate(&request).await.unwrap();

        let prompts = provider.prompts.lock().unwrap();
        assert_eq!(prompts.as_slice(), &[build_prompt(&request)]);
    }

    #[tokio::test]
    async fn test_rate_limit_surfaces_distinctly_without_retry() {
        let provider = Arc::new(FakeProvider::rate_limited());
        let generator = ContentGenerator::new(provider.clone());

        let err = generator.generate(&sample_request()).await.unwrap_err();

        assert!(matches!(err, GenerationError::RateLimited(_)));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_other_provider_failures_carry_message() {
        let provider = Arc::new(FakeProvider::failing(401, "invalid api key"));
        let generator = ContentGenerator::new(provider);

        let err = generator.generate(&sample_request()).await.unwrap_err();

        match err {
            GenerationError::GenerationFailed(message) => {
                assert!(message.contains("invalid api key"), "{message}");
            }
            other => panic!("expected GenerationFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_content_is_generation_failure() {
        let err = GenerationError::from(LlmError::EmptyContent);
        assert!(matches!(err, GenerationError::GenerationFailed(_)));
    }

    #[test]
    fn test_provider_name_is_exposed() {
        let generator = ContentGenerator::new(Arc::new(FakeProvider::replying("x")));
        assert_eq!(generator.provider_name(), "fake");
    }
}
