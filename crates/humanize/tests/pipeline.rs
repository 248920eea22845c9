//! End-to-end pipeline behaviour with stub generation and similarity services.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use poltertext_core::config::HumanizerConfig;
use poltertext_core::document::{Mode, PipelineConfig, QualityTier};
use poltertext_core::services::{GenerationService, ServiceError, SimilarityService};
use poltertext_humanize::normalizer::clean;
use poltertext_humanize::{
    chunk_text, ChunkConfig, ChunkOutcome, EnhancerSettings, FidelityValidator, HumanizeError,
    Humanizer, Normalizer,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

// ── Stubs ───────────────────────────────────────────────────────────

/// Echoes the text after the prompt's final `Text:` line.
#[derive(Default)]
struct EchoGenerator {
    calls: AtomicUsize,
}

#[async_trait]
impl GenerationService for EchoGenerator {
    async fn generate(
        &self,
        prompt: &str,
        _hint: &str,
        _t: f32,
        _max: u32,
    ) -> Result<String, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(prompt_text(prompt).to_string())
    }
}

/// Echoes, but makes the chunk holding `slow_marker` finish last.
struct SlowFirstGenerator {
    slow_marker: &'static str,
}

#[async_trait]
impl GenerationService for SlowFirstGenerator {
    async fn generate(
        &self,
        prompt: &str,
        _hint: &str,
        _t: f32,
        _max: u32,
    ) -> Result<String, ServiceError> {
        let text = prompt_text(prompt);
        let delay = if text.starts_with(self.slow_marker) { 500 } else { 10 };
        tokio::time::sleep(Duration::from_millis(delay)).await;
        Ok(text.to_string())
    }
}

struct FixedGenerator(&'static str);

#[async_trait]
impl GenerationService for FixedGenerator {
    async fn generate(
        &self,
        _prompt: &str,
        _hint: &str,
        _t: f32,
        _max: u32,
    ) -> Result<String, ServiceError> {
        Ok(self.0.to_string())
    }
}

#[derive(Default)]
struct FailingGenerator {
    calls: AtomicUsize,
}

#[async_trait]
impl GenerationService for FailingGenerator {
    async fn generate(
        &self,
        _prompt: &str,
        _hint: &str,
        _t: f32,
        _max: u32,
    ) -> Result<String, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ServiceError::GenerationUnavailable("connection refused".into()))
    }
}

struct FixedSimilarity(f64);

#[async_trait]
impl SimilarityService for FixedSimilarity {
    async fn similarity(&self, _a: &str, _b: &str) -> Result<f64, ServiceError> {
        Ok(self.0)
    }
}

fn prompt_text(prompt: &str) -> &str {
    prompt.rsplit("Text:\n").next().unwrap_or_default()
}

// ── Helpers ─────────────────────────────────────────────────────────

fn settings(contraction_rate: f64) -> HumanizerConfig {
    HumanizerConfig {
        contraction_rate,
        ..HumanizerConfig::default()
    }
}

fn king(mode: Mode) -> PipelineConfig {
    PipelineConfig {
        mode,
        quality_tier: QualityTier::King,
        ..PipelineConfig::default()
    }
}

fn para(tag: &str, n: usize) -> String {
    (0..n).map(|i| format!("{tag}{i}")).collect::<Vec<_>>().join(" ")
}

fn prose(sentences: usize) -> String {
    (0..sentences)
        .map(|i| match i % 4 {
            0 => format!("The team did not expect release {i} to land on time."),
            1 => "It rained.".to_string(),
            2 => format!(
                "After the review for item {i}, the engineers rewrote the parser, \
                 added tests for every branch they could find, moved the configuration \
                 into one place, and finally shipped a build that the support staff \
                 could install without calling anyone for help."
            ),
            _ => "We are still not sure that is the right call for the next quarter.".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ── Standard tier ───────────────────────────────────────────────────

#[tokio::test]
async fn standard_tier_strips_boilerplate() {
    let generator = Arc::new(EchoGenerator::default());
    let humanizer = Humanizer::new(
        generator.clone(),
        FidelityValidator::disabled(),
        settings(0.8),
    )
    .with_seed(5);

    let out = humanizer
        .process("In conclusion, this is important.", &PipelineConfig::default())
        .await
        .unwrap();

    assert!(!out.result_text.contains("In conclusion"));
    assert_eq!(out.result_text, "This is important.");
    assert_eq!(out.input_word_count, 5);
    assert_eq!(out.warning, None);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn standard_tier_without_generation_still_cleans_up() {
    let humanizer = Humanizer::new(
        Arc::new(FailingGenerator::default()),
        FidelityValidator::disabled(),
        settings(1.0),
    );

    let out = humanizer
        .process("Furthermore, we do not ship on Fridays.", &PipelineConfig::default())
        .await
        .unwrap();

    assert_eq!(out.result_text, "We don't ship on Fridays.");
    assert_eq!(out.chunks, vec![ChunkOutcome::GenerationUnavailable]);
    assert!(out.warning.is_some());
}

// ── Word gate ───────────────────────────────────────────────────────

#[tokio::test]
async fn word_gate_depends_on_tier() {
    let text = vec!["word"; 5_001].join(" ");
    let humanizer = Humanizer::new(
        Arc::new(EchoGenerator::default()),
        FidelityValidator::disabled(),
        settings(0.8),
    )
    .with_seed(9);

    let err = humanizer.process(&text, &PipelineConfig::default()).await.unwrap_err();
    let HumanizeError::InputTooLarge { word_count, limit, tier } = err;
    assert_eq!((word_count, limit, tier), (5_001, 5_000, QualityTier::Standard));

    let out = humanizer.process(&text, &king(Mode::Rewrite)).await.unwrap();
    assert_eq!(out.input_word_count, 5_001);
    assert!(!out.result_text.is_empty());
}

#[tokio::test]
async fn king_tier_has_its_own_ceiling() {
    let text = vec!["word"; 10_001].join(" ");
    let humanizer = Humanizer::new(
        Arc::new(EchoGenerator::default()),
        FidelityValidator::disabled(),
        settings(0.8),
    );
    let err = humanizer.process(&text, &king(Mode::Rewrite)).await.unwrap_err();
    assert!(matches!(err, HumanizeError::InputTooLarge { limit: 10_000, .. }));
}

// ── Fidelity gate ───────────────────────────────────────────────────

const REWRITTEN: &str = "We do not ship on Fridays. It is a rule that is older than the team \
                         itself, and nobody argues with it anymore.";
const REWRITTEN_CONTRACTED: &str = "We don't ship on Fridays. It's a rule that's older than the \
                                    team itself, and nobody argues with it anymore.";

#[tokio::test]
async fn low_fidelity_falls_back_to_plain_rewrite() {
    let humanizer = Humanizer::new(
        Arc::new(FixedGenerator(REWRITTEN)),
        FidelityValidator::new(Some(Arc::new(FixedSimilarity(0.5)))),
        settings(1.0),
    )
    .with_enhancer(EnhancerSettings {
        transition_probability: 1.0,
        hedge_probability: 1.0,
        ..EnhancerSettings::default()
    })
    .with_seed(21);

    let out = humanizer
        .process("Original text about the Friday rule.", &king(Mode::Rewrite))
        .await
        .unwrap();

    let expected = Normalizer::new(1.0).normalize(REWRITTEN, &mut StdRng::seed_from_u64(0));
    assert_eq!(out.result_text, expected);
    assert_eq!(out.result_text, REWRITTEN_CONTRACTED);
    assert_eq!(out.chunks, vec![ChunkOutcome::FallenBack { fidelity: 0.5 }]);
}

#[tokio::test]
async fn high_fidelity_keeps_the_enhanced_candidate() {
    let humanizer = Humanizer::new(
        Arc::new(FixedGenerator(REWRITTEN)),
        FidelityValidator::new(Some(Arc::new(FixedSimilarity(0.95)))),
        settings(1.0),
    )
    .with_enhancer(EnhancerSettings {
        hedge_probability: 1.0,
        ..EnhancerSettings::disabled()
    })
    .with_seed(21);

    let out = humanizer
        .process("Original text about the Friday rule.", &king(Mode::Rewrite))
        .await
        .unwrap();

    assert_eq!(out.chunks, vec![ChunkOutcome::Accepted { fidelity: 0.95 }]);
    // The hedge pass touched the second sentence, so this is not the plain rewrite.
    assert!(out.result_text.contains("It's a rule that's older than the team itself, "));
    assert_ne!(out.result_text, REWRITTEN_CONTRACTED);
}

#[tokio::test]
async fn paraphrase_threshold_is_looser() {
    let build = || {
        Humanizer::new(
            Arc::new(FixedGenerator(REWRITTEN)),
            FidelityValidator::new(Some(Arc::new(FixedSimilarity(0.78)))),
            settings(1.0),
        )
        .with_seed(4)
    };

    let rewrite = build().process("Original.", &king(Mode::Rewrite)).await.unwrap();
    let paraphrase = build().process("Original.", &king(Mode::Paraphrase)).await.unwrap();

    assert_eq!(rewrite.chunks, vec![ChunkOutcome::FallenBack { fidelity: 0.78 }]);
    assert_eq!(paraphrase.chunks, vec![ChunkOutcome::Accepted { fidelity: 0.78 }]);
}

#[tokio::test]
async fn missing_similarity_accepts_everything() {
    let humanizer = Humanizer::new(
        Arc::new(FixedGenerator(REWRITTEN)),
        FidelityValidator::disabled(),
        settings(1.0),
    );
    let out = humanizer.process("Original.", &king(Mode::Rewrite)).await.unwrap();
    assert_eq!(out.chunks, vec![ChunkOutcome::Accepted { fidelity: 1.0 }]);
}

#[tokio::test]
async fn king_tier_keeps_numbers_with_thousands_separators() {
    let text = "We mailed 2,500 letters to households in the northern district over the \
                course of the spring campaign and then waited patiently for the replies to \
                arrive from every single town along the coast before deciding anything at all. \
                The survey reached 1,000 households across the region last spring, and most \
                of them answered within a week.";
    let humanizer = Humanizer::new(
        Arc::new(EchoGenerator::default()),
        FidelityValidator::disabled(),
        settings(0.0),
    )
    .with_enhancer(EnhancerSettings {
        hedge_probability: 1.0,
        ..EnhancerSettings::disabled()
    })
    .with_seed(8);

    let out = humanizer.process(text, &king(Mode::Rewrite)).await.unwrap();

    assert!(out.result_text.contains("We mailed 2,500 letters to households"));
    assert!(out.result_text.contains("The survey reached 1,000 households across the region"));
    assert!(!out.result_text.contains("2."));
    assert!(!out.result_text.contains("1, "));
}

// ── Generation failure ──────────────────────────────────────────────

#[tokio::test]
async fn generation_failure_returns_normalized_original() {
    let original = "It is late and we do not have the numbers yet.  The report is not ready.";
    let generator = Arc::new(FailingGenerator::default());
    let humanizer = Humanizer::new(
        generator.clone(),
        FidelityValidator::disabled(),
        settings(1.0),
    )
    .with_seed(2);

    let out = humanizer.process(original, &king(Mode::Rewrite)).await.unwrap();

    let expected = Normalizer::new(1.0).normalize(original, &mut StdRng::seed_from_u64(0));
    assert!(!out.result_text.is_empty());
    assert_eq!(out.result_text, expected);
    assert_eq!(out.chunks, vec![ChunkOutcome::GenerationUnavailable]);
    assert!(out.warning.is_some());
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn blank_completion_counts_as_failure() {
    let humanizer = Humanizer::new(
        Arc::new(FixedGenerator("   ")),
        FidelityValidator::disabled(),
        settings(1.0),
    );
    let out = humanizer.process("Keep this text.", &king(Mode::Rewrite)).await.unwrap();
    assert_eq!(out.result_text, "Keep this text.");
    assert_eq!(out.chunks, vec![ChunkOutcome::GenerationUnavailable]);
}

// ── Chunking and reassembly ─────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn chunks_reassemble_in_document_order() {
    let text = [para("a", 600), para("b", 600), para("c", 600)].join("\n\n");
    let humanizer = Humanizer::new(
        Arc::new(SlowFirstGenerator { slow_marker: "a0 " }),
        FidelityValidator::disabled(),
        settings(0.0),
    )
    .with_enhancer(EnhancerSettings::disabled());

    let out = humanizer.process(&text, &king(Mode::Rewrite)).await.unwrap();

    let chunks = chunk_text(
        &text,
        &ChunkConfig {
            max_words: 800,
            overlap_words: 100,
        },
    );
    assert_eq!(chunks.len(), 3);
    let expected = chunks.iter().map(|c| clean(c)).collect::<Vec<_>>().join(" ");
    assert_eq!(out.result_text, expected);
    assert_eq!(out.chunks.len(), 3);
    assert!(out.chunks.iter().all(|c| *c == ChunkOutcome::Accepted { fidelity: 1.0 }));
}

#[tokio::test]
async fn one_generation_call_per_chunk() {
    let text = [para("a", 600), para("b", 600), para("c", 600)].join("\n\n");
    let generator = Arc::new(EchoGenerator::default());
    let humanizer = Humanizer::new(generator.clone(), FidelityValidator::disabled(), settings(0.8));

    humanizer.process(&text, &king(Mode::Rewrite)).await.unwrap();
    assert_eq!(generator.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn short_documents_are_a_single_chunk() {
    let text = [para("a", 300), para("b", 300)].join("\n\n");
    let generator = Arc::new(EchoGenerator::default());
    let humanizer = Humanizer::new(generator.clone(), FidelityValidator::disabled(), settings(0.8));

    let out = humanizer.process(&text, &king(Mode::Rewrite)).await.unwrap();
    assert_eq!(out.chunks.len(), 1);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
}

// ── Determinism ─────────────────────────────────────────────────────

#[tokio::test]
async fn same_seed_same_output() {
    let text = prose(24);
    let run = |seed| {
        let humanizer = Humanizer::new(
            Arc::new(EchoGenerator::default()),
            FidelityValidator::disabled(),
            settings(0.8),
        )
        .with_seed(seed);
        let text = text.clone();
        async move { humanizer.process(&text, &king(Mode::Rewrite)).await.unwrap().result_text }
    };

    let first = run(77).await;
    let second = run(77).await;
    assert_eq!(first, second);
    assert!(!first.is_empty());
}

#[tokio::test]
async fn enhancement_preserves_every_source_word_in_paraphrase_mode() {
    let text = "Short one. Another short one. A third short sentence here.";
    let humanizer = Humanizer::new(
        Arc::new(EchoGenerator::default()),
        FidelityValidator::disabled(),
        settings(0.0),
    )
    .with_enhancer(EnhancerSettings {
        transition_probability: 0.0,
        ..EnhancerSettings::default()
    })
    .with_seed(13);

    let out = humanizer.process(text, &king(Mode::Paraphrase)).await.unwrap();
    assert_eq!(out.result_text.split_whitespace().count(), 10);
}
