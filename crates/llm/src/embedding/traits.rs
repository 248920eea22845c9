use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("expected {expected} embeddings, got {actual}")]
    CountMismatch { expected: usize, actual: usize },

    #[error("embedding backend not configured: {0}")]
    NotConfigured(String),
}

/// Embedding backend used for fidelity scoring.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// One vector per input text, in input order.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    fn dimensions(&self) -> usize;
}

/// Reject a backend reply with the wrong number of vectors or a vector of the
/// wrong width.
pub(crate) fn check_batch(
    vectors: Vec<Vec<f32>>,
    expected_count: usize,
    dimensions: usize,
) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    if vectors.len() != expected_count {
        return Err(EmbeddingError::CountMismatch {
            expected: expected_count,
            actual: vectors.len(),
        });
    }
    if let Some(bad) = vectors.iter().find(|v| v.len() != dimensions) {
        return Err(EmbeddingError::DimensionMismatch {
            expected: dimensions,
            actual: bad.len(),
        });
    }
    Ok(vectors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_checks() {
        assert!(check_batch(vec![vec![0.0; 3], vec![1.0; 3]], 2, 3).is_ok());
        assert!(matches!(
            check_batch(vec![vec![0.0; 3]], 2, 3),
            Err(EmbeddingError::CountMismatch { expected: 2, actual: 1 })
        ));
        assert!(matches!(
            check_batch(vec![vec![0.0; 3], vec![0.0; 4]], 2, 3),
            Err(EmbeddingError::DimensionMismatch { expected: 3, actual: 4 })
        ));
    }
}
