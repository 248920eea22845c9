//! Request orchestration.
//!
//! `Received → Chunked → PerChunk{Rewritten → Enhanced → Validated →
//! Accepted|FallenBack} → Reassembled`. The standard tier short-circuits to a
//! single rewrite followed by cleanup.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use poltertext_core::config::{GenerationSettings, HumanizerConfig};
use poltertext_core::document::{Document, Mode, PipelineConfig, QualityTier};
use poltertext_core::services::GenerationService;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::chunker::{chunk_text, ChunkConfig};
use crate::enhancer::{EnhancerSettings, SentenceEnhancer};
use crate::normalizer::{strip_boilerplate, Normalizer};
use crate::prompt::build_prompt;
use crate::sentences::split_sentences;
use crate::standard;
use crate::validator::FidelityValidator;

const GENERATION_WARNING: &str =
    "Generation service unavailable. Using rule-based humanization fallback.";

#[derive(Debug, Error)]
pub enum HumanizeError {
    #[error("input has {word_count} words; the {tier} tier accepts at most {limit}")]
    InputTooLarge {
        word_count: usize,
        limit: usize,
        tier: QualityTier,
    },
}

/// What happened to one chunk.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum ChunkOutcome {
    /// The enhanced candidate passed the fidelity gate.
    Accepted { fidelity: f64 },
    /// The enhanced candidate failed the gate; the plain rewrite was kept.
    FallenBack { fidelity: f64 },
    /// Rewritten without a fidelity gate (standard tier).
    Unscored,
    /// Generation failed; the original text was cleaned up instead.
    GenerationUnavailable,
}

/// An enhanced, normalized chunk and its fidelity against the original.
#[derive(Debug, Clone, PartialEq)]
pub struct EnhancementResult {
    pub text: String,
    pub fidelity: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct HumanizeOutput {
    #[serde(rename = "humanizedText")]
    pub result_text: String,
    #[serde(rename = "wordCount")]
    pub input_word_count: usize,
    /// Per-chunk outcomes in document order.
    pub chunks: Vec<ChunkOutcome>,
    /// Set when generation was unavailable for any chunk.
    pub warning: Option<String>,
}

/// Runs documents through the humanization pipeline.
///
/// Holds no per-request state; one instance can serve concurrent requests.
pub struct Humanizer {
    generator: Arc<dyn GenerationService>,
    validator: FidelityValidator,
    settings: HumanizerConfig,
    enhancer: SentenceEnhancer,
    normalizer: Normalizer,
}

impl Humanizer {
    pub fn new(
        generator: Arc<dyn GenerationService>,
        validator: FidelityValidator,
        settings: HumanizerConfig,
    ) -> Self {
        let normalizer = Normalizer::new(settings.contraction_rate);
        Self {
            generator,
            validator,
            settings,
            enhancer: SentenceEnhancer::default(),
            normalizer,
        }
    }

    pub fn with_enhancer(mut self, settings: EnhancerSettings) -> Self {
        self.enhancer = SentenceEnhancer::new(settings);
        self
    }

    /// Fix every random draw. Chunk `i` uses `seed + i`.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.settings.seed = Some(seed);
        self
    }

    /// Humanize `document`. Fails only when it exceeds the tier's word limit;
    /// every service failure is absorbed per chunk.
    #[instrument(
        skip_all,
        fields(request_id = %Uuid::new_v4(), tier = %config.quality_tier, mode = %config.mode)
    )]
    pub async fn process(
        &self,
        document: &str,
        config: &PipelineConfig,
    ) -> Result<HumanizeOutput, HumanizeError> {
        let start = Instant::now();
        let document = Document::new(document);
        let tier = config.quality_tier;
        let limit = self.settings.word_limit(tier);

        if document.word_count() > limit {
            warn!(word_count = document.word_count(), limit, "input too large");
            return Err(HumanizeError::InputTooLarge {
                word_count: document.word_count(),
                limit,
                tier,
            });
        }

        if document.is_empty() {
            debug!("empty document, nothing to do");
            return Ok(HumanizeOutput {
                result_text: String::new(),
                input_word_count: 0,
                chunks: Vec::new(),
                warning: None,
            });
        }

        let seed = self.settings.seed.unwrap_or_else(rand::random);
        debug!(seed, word_count = document.word_count(), "processing document");

        let results = match tier {
            QualityTier::Standard => vec![self.process_standard(&document, config, seed).await],
            QualityTier::King => self.process_king(&document, config, seed).await,
        };

        let chunks: Vec<ChunkOutcome> =
            results.iter().map(|(_, outcome)| outcome.clone()).collect();
        let result_text = results
            .into_iter()
            .map(|(text, _)| text)
            .collect::<Vec<_>>()
            .join(" ");
        let warning = chunks
            .iter()
            .any(|c| *c == ChunkOutcome::GenerationUnavailable)
            .then(|| GENERATION_WARNING.to_string());

        info!(
            chunks = chunks.len(),
            word_count = document.word_count(),
            output_words = result_text.split_whitespace().count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "humanization complete"
        );

        Ok(HumanizeOutput {
            result_text,
            input_word_count: document.word_count(),
            chunks,
            warning,
        })
    }

    async fn process_standard(
        &self,
        document: &Document,
        config: &PipelineConfig,
        seed: u64,
    ) -> (String, ChunkOutcome) {
        let mut rng = StdRng::seed_from_u64(seed);
        let prepared = standard::prepare(document.text());
        let prompt = build_prompt(&prepared, config);

        let generation = self.settings.generation(QualityTier::Standard);
        match self.rewrite(&prompt, generation).await {
            Some(rewritten) => (
                self.normalizer.normalize(&rewritten, &mut rng),
                ChunkOutcome::Unscored,
            ),
            None => (
                self.normalizer.normalize(&prepared, &mut rng),
                ChunkOutcome::GenerationUnavailable,
            ),
        }
    }

    async fn process_king(
        &self,
        document: &Document,
        config: &PipelineConfig,
        seed: u64,
    ) -> Vec<(String, ChunkOutcome)> {
        let chunks = if document.word_count() <= self.settings.single_chunk_words {
            vec![document.text().to_string()]
        } else {
            let chunk_config = ChunkConfig {
                max_words: self.settings.chunk_max_words,
                overlap_words: self.settings.chunk_overlap_words,
            };
            chunk_text(document.text(), &chunk_config)
        };
        info!(chunks = chunks.len(), "document chunked");

        // Chunks run concurrently; join_all keeps them in input order.
        let futures: Vec<_> = chunks
            .iter()
            .enumerate()
            .map(|(index, chunk)| {
                let rng = StdRng::seed_from_u64(seed.wrapping_add(index as u64));
                self.process_chunk(index, chunk, config, rng)
            })
            .collect();

        join_all(futures).await
    }

    async fn process_chunk(
        &self,
        index: usize,
        chunk: &str,
        config: &PipelineConfig,
        mut rng: StdRng,
    ) -> (String, ChunkOutcome) {
        let prefiltered = strip_boilerplate(chunk);
        let prompt = build_prompt(&prefiltered, config);

        let generation = self.settings.generation(QualityTier::King);
        let Some(rewritten) = self.rewrite(&prompt, generation).await else {
            warn!(chunk = index, "keeping original chunk text");
            return (
                self.normalizer.normalize(chunk, &mut rng),
                ChunkOutcome::GenerationUnavailable,
            );
        };

        let enhanced = self.enhance(chunk, &rewritten, config.mode, &mut rng).await;
        let threshold = self.threshold(config.mode);

        if enhanced.fidelity < threshold {
            warn!(
                chunk = index,
                fidelity = enhanced.fidelity,
                threshold,
                "low fidelity, falling back to plain rewrite"
            );
            let fallback = self.normalizer.normalize(&rewritten, &mut rng);
            return (fallback, ChunkOutcome::FallenBack { fidelity: enhanced.fidelity });
        }

        debug!(chunk = index, fidelity = enhanced.fidelity, "chunk accepted");
        (enhanced.text, ChunkOutcome::Accepted { fidelity: enhanced.fidelity })
    }

    /// Split, enhance, rejoin and normalize `rewritten`, then score it against
    /// the original chunk.
    pub async fn enhance<R: Rng + ?Sized>(
        &self,
        original: &str,
        rewritten: &str,
        mode: Mode,
        rng: &mut R,
    ) -> EnhancementResult {
        let sentences = split_sentences(rewritten);
        let enhanced = self.enhancer.enhance(sentences, mode, rng).join(" ");
        let text = self.normalizer.normalize(&enhanced, rng);
        let fidelity = self.validator.score(original, &text).await;
        EnhancementResult { text, fidelity }
    }

    fn threshold(&self, mode: Mode) -> f64 {
        match mode {
            Mode::Rewrite => self.settings.rewrite_fidelity_threshold,
            Mode::Paraphrase => self.settings.paraphrase_fidelity_threshold,
        }
    }

    /// One generation call. `None` on failure or an empty completion.
    async fn rewrite(&self, prompt: &str, settings: &GenerationSettings) -> Option<String> {
        let result = self
            .generator
            .generate(
                prompt,
                &settings.model_hint,
                settings.temperature,
                settings.max_output_tokens,
            )
            .await;
        match result {
            Ok(text) if !text.trim().is_empty() => Some(text),
            Ok(_) => {
                warn!("generation returned empty text");
                None
            }
            Err(e) => {
                warn!(error = %e, "generation unavailable");
                None
            }
        }
    }
}
