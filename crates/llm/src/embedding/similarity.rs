//! Embedding-backed similarity scoring for the fidelity check.

use std::sync::Arc;

use async_trait::async_trait;
use poltertext_core::config::Config;
use poltertext_core::services::{ServiceError, SimilarityService};
use tokio::sync::Mutex;
use tracing::debug;

use super::cache::EmbeddingCache;
use super::ollama::OllamaEmbedder;
use super::openai::OpenAiEmbedder;
use super::traits::{Embedder, EmbeddingError};

/// Cosine similarity, clamped to `[0, 1]`. Zero vectors score 0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(0.0, 1.0)
}

/// Scores two texts by the cosine of their embeddings. Embeddings are cached
/// by text since the same original chunk is scored more than once.
pub struct EmbeddingSimilarity {
    embedder: Arc<dyn Embedder>,
    cache: Mutex<EmbeddingCache>,
}

impl EmbeddingSimilarity {
    pub fn new(embedder: Arc<dyn Embedder>, cache_size: usize) -> Self {
        Self {
            embedder,
            cache: Mutex::new(EmbeddingCache::new(cache_size)),
        }
    }

    /// Embed `texts`, serving repeats from the cache and sending only the
    /// misses to the backend in one batch.
    async fn embed_all(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut slots = self.cache.lock().await.lookup(texts);
        let missing: Vec<&str> = texts
            .iter()
            .zip(&slots)
            .filter(|(_, slot)| slot.is_none())
            .map(|(text, _)| *text)
            .collect();

        if !missing.is_empty() {
            let fresh = self.embedder.embed_batch(&missing).await?;
            if fresh.len() != missing.len() {
                return Err(EmbeddingError::CountMismatch {
                    expected: missing.len(),
                    actual: fresh.len(),
                });
            }

            let mut cache = self.cache.lock().await;
            let mut fresh = fresh.into_iter();
            for (text, slot) in texts.iter().zip(slots.iter_mut()) {
                if slot.is_none() {
                    if let Some(vector) = fresh.next() {
                        cache.insert(text, vector.clone());
                        *slot = Some(vector);
                    }
                }
            }
        }

        Ok(slots.into_iter().map(Option::unwrap_or_default).collect())
    }
}

#[async_trait]
impl SimilarityService for EmbeddingSimilarity {
    async fn similarity(&self, a: &str, b: &str) -> Result<f64, ServiceError> {
        let vectors = self
            .embed_all(&[a, b])
            .await
            .map_err(|e| ServiceError::SimilarityUnavailable(e.to_string()))?;
        let score = match vectors.as_slice() {
            [va, vb] => cosine_similarity(va, vb),
            _ => 0.0,
        };
        let stats = self.cache.lock().await.stats();
        debug!(score, cache_hits = stats.hits, cache_misses = stats.misses, "similarity scored");
        Ok(score)
    }
}

/// Build the configured similarity backend. `Ok(None)` means scoring is disabled.
pub fn create_similarity(
    config: &Config,
) -> Result<Option<Arc<dyn SimilarityService>>, EmbeddingError> {
    let emb = &config.embedding;
    if !emb.is_enabled() {
        return Ok(None);
    }

    let embedder: Arc<dyn Embedder> = match emb.provider.as_str() {
        "openai" => {
            let api_key = config
                .llm
                .openai_api_key
                .clone()
                .ok_or_else(|| EmbeddingError::NotConfigured("OPENAI_API_KEY not set".into()))?;
            Arc::new(OpenAiEmbedder::new(
                api_key,
                emb.model.clone(),
                config.llm.openai_base_url.clone(),
                emb.dimensions,
            ))
        }
        "ollama" => Arc::new(OllamaEmbedder::new(
            config.ollama.url.clone(),
            config.ollama.embedding_model.clone(),
            emb.dimensions,
        )),
        other => {
            return Err(EmbeddingError::NotConfigured(format!(
                "unknown embedding provider: '{other}'"
            )))
        }
    };

    Ok(Some(Arc::new(EmbeddingSimilarity::new(embedder, emb.cache_size))))
}
