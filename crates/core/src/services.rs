//! Capabilities the humanizer consumes from the outside world.
//!
//! Both services are potentially slow network calls. Callers own timeouts and
//! cancellation; implementations only report failure.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("generation unavailable: {0}")]
    GenerationUnavailable(String),

    #[error("similarity unavailable: {0}")]
    SimilarityUnavailable(String),
}

/// Text generation backend (an LLM behind some API).
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Generate a completion for `prompt`. An empty `model_hint` selects the
    /// backend's default model.
    async fn generate(
        &self,
        prompt: &str,
        model_hint: &str,
        temperature: f32,
        max_output_tokens: u32,
    ) -> Result<String, ServiceError>;
}

/// Semantic similarity backend.
#[async_trait]
pub trait SimilarityService: Send + Sync {
    /// Similarity of `a` and `b` in `[0, 1]`.
    async fn similarity(&self, a: &str, b: &str) -> Result<f64, ServiceError>;
}
