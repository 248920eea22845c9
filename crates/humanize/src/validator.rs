use std::sync::Arc;

use poltertext_core::services::SimilarityService;
use tracing::{debug, warn};

/// Scores how closely a candidate preserves the original's meaning.
///
/// Without a similarity backend, or when it fails, every candidate scores 1.0
/// and so passes any threshold.
#[derive(Clone, Default)]
pub struct FidelityValidator {
    similarity: Option<Arc<dyn SimilarityService>>,
}

impl FidelityValidator {
    pub fn new(similarity: Option<Arc<dyn SimilarityService>>) -> Self {
        Self { similarity }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self) -> bool {
        self.similarity.is_some()
    }

    pub async fn score(&self, original: &str, candidate: &str) -> f64 {
        let Some(similarity) = &self.similarity else {
            return 1.0;
        };
        match similarity.similarity(original, candidate).await {
            Ok(score) if score.is_finite() => {
                debug!(score, "fidelity scored");
                score.clamp(0.0, 1.0)
            }
            Ok(score) => {
                warn!(score, "similarity returned a non-finite score, treating as satisfied");
                1.0
            }
            Err(e) => {
                warn!(error = %e, "similarity unavailable, treating as satisfied");
                1.0
            }
        }
    }
}

impl std::fmt::Debug for FidelityValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FidelityValidator")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
