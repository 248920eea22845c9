//! `GenerationService` adapters over chat providers.

use async_trait::async_trait;
use poltertext_core::config::{LlmConfig, OllamaConfig};
use poltertext_core::services::{GenerationService, ServiceError};
use tracing::debug;

use crate::provider::{LlmError, LlmProvider, Message};
use crate::providers::create_provider;

/// System message sent ahead of every rewrite prompt.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that writes like a human.";

/// Generation over any chat provider. Empty or whitespace-only completions are
/// reported as failures so callers fall back instead of emitting nothing.
pub struct ProviderGenerator {
    provider: Box<dyn LlmProvider>,
}

impl ProviderGenerator {
    pub fn new(provider: Box<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Build from config, creating the appropriate provider.
    pub fn from_config(
        llm_config: &LlmConfig,
        ollama_config: &OllamaConfig,
    ) -> Result<Self, LlmError> {
        Ok(Self::new(create_provider(llm_config, ollama_config)?))
    }
}

#[async_trait]
impl GenerationService for ProviderGenerator {
    async fn generate(
        &self,
        prompt: &str,
        model_hint: &str,
        temperature: f32,
        max_output_tokens: u32,
    ) -> Result<String, ServiceError> {
        let model = Some(model_hint.trim()).filter(|m| !m.is_empty());
        let messages = vec![Message::system(SYSTEM_PROMPT), Message::user(prompt)];

        let text = self
            .provider
            .complete(messages, model, temperature, max_output_tokens)
            .await
            .map_err(|e| {
                ServiceError::GenerationUnavailable(format!("{}: {e}", self.provider.name()))
            })?;

        if text.trim().is_empty() {
            return Err(ServiceError::GenerationUnavailable(format!(
                "{} returned an empty completion",
                self.provider.name()
            )));
        }

        debug!(provider = self.provider.name(), chars = text.len(), "generation complete");
        Ok(text)
    }
}

/// Stands in when no provider could be configured (e.g. missing API key).
/// Every call fails, which drives the pipeline onto its rule-based fallback.
pub struct UnconfiguredGenerator {
    reason: String,
}

impl UnconfiguredGenerator {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

#[async_trait]
impl GenerationService for UnconfiguredGenerator {
    async fn generate(&self, _: &str, _: &str, _: f32, _: u32) -> Result<String, ServiceError> {
        Err(ServiceError::GenerationUnavailable(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records the model override and echoes a canned reply.
    struct FakeProvider {
        reply: String,
        seen_model: Arc<Mutex<Option<String>>>,
    }

    fn generator(reply: &str) -> (ProviderGenerator, Arc<Mutex<Option<String>>>) {
        let seen = Arc::new(Mutex::new(None));
        let provider = FakeProvider {
            reply: reply.to_string(),
            seen_model: seen.clone(),
        };
        (ProviderGenerator::new(Box::new(provider)), seen)
    }

    #[async_trait]
    impl LlmProvider for FakeProvider {
        async fn complete(
            &self,
            messages: Vec<Message>,
            model: Option<&str>,
            _temperature: f32,
            _max_tokens: u32,
        ) -> Result<String, LlmError> {
            assert_eq!(messages.len(), 2);
            *self.seen_model.lock().unwrap() = model.map(str::to_string);
            Ok(self.reply.clone())
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    #[tokio::test]
    async fn empty_hint_uses_provider_default() {
        let (generator, seen) = generator("rewritten");
        let out = generator.generate("prompt", "  ", 0.7, 100).await.unwrap();
        assert_eq!(out, "rewritten");
        assert!(seen.lock().unwrap().is_none());
    }

    #[tokio::test]
    async fn model_hint_is_forwarded() {
        let (generator, seen) = generator("ok");
        generator.generate("prompt", "gpt-4o", 0.7, 100).await.unwrap();
        assert_eq!(seen.lock().unwrap().as_deref(), Some("gpt-4o"));
    }

    #[tokio::test]
    async fn blank_completion_is_a_failure() {
        let (generator, _) = generator("   ");
        let err = generator.generate("prompt", "", 0.7, 100).await.unwrap_err();
        assert!(matches!(err, ServiceError::GenerationUnavailable(_)));
    }

    #[tokio::test]
    async fn unconfigured_always_fails() {
        let generator = UnconfiguredGenerator::new("OPENAI_API_KEY not set");
        let err = generator.generate("p", "", 0.7, 10).await.unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }
}
