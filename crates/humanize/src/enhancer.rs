//! Stochastic sentence-level enhancement.
//!
//! Four passes run in a fixed order: rhythm variation, transition injection,
//! hedging injection and emphasis injection. Paraphrase mode stops after the
//! transition pass. Every injection is a Bernoulli trial gated by a minimum
//! sentence length, and each pass draws from its own generator seeded from the
//! caller's, so a fixed seed reproduces the output exactly.

use poltertext_core::document::Mode;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::patterns::{CLARIFICATIONS, EMPHASIS, HEDGES, TRANSITIONS};
use crate::sentences::{capitalize_first, clause_comma, lower_first, split_terminal, word_count};

/// Probabilities and length guards for the enhancement passes.
#[derive(Debug, Clone, PartialEq)]
pub struct EnhancerSettings {
    /// Chance that a short sentence opens a merge buffer.
    pub merge_short_probability: f64,
    /// Chance that a buffer grown by another short sentence is emitted.
    pub flush_merged_probability: f64,
    /// Sentences under this many words are merge candidates.
    pub short_sentence_words: usize,
    /// Sentences over this many words (with a comma) are split.
    pub long_sentence_words: usize,
    pub transition_probability: f64,
    pub transition_min_words: usize,
    pub hedge_probability: f64,
    pub hedge_min_words: usize,
    pub emphasis_probability: f64,
    pub emphasis_min_words: usize,
}

impl Default for EnhancerSettings {
    fn default() -> Self {
        Self {
            merge_short_probability: 0.35,
            flush_merged_probability: 0.6,
            short_sentence_words: 10,
            long_sentence_words: 35,
            transition_probability: 0.15,
            transition_min_words: 6,
            hedge_probability: 0.12,
            hedge_min_words: 8,
            emphasis_probability: 0.08,
            emphasis_min_words: 12,
        }
    }
}

impl EnhancerSettings {
    /// Every probability zeroed. Long sentences are still split.
    pub fn disabled() -> Self {
        Self {
            merge_short_probability: 0.0,
            flush_merged_probability: 0.0,
            transition_probability: 0.0,
            hedge_probability: 0.0,
            emphasis_probability: 0.0,
            ..Self::default()
        }
    }
}

/// NaN and infinities count as zero.
fn chance<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    let p = if p.is_finite() { p.clamp(0.0, 1.0) } else { 0.0 };
    rng.gen_bool(p)
}

fn pick<R: Rng + ?Sized>(rng: &mut R, phrases: &'static [&'static str]) -> &'static str {
    phrases.choose(rng).copied().unwrap_or_default()
}

/// True when the sentence already opens with an injected lead-in.
fn has_lead_in(sentence: &str) -> bool {
    TRANSITIONS
        .iter()
        .chain(EMPHASIS)
        .any(|p| sentence.starts_with(p))
}

/// Join two sentences into one. A full stop becomes a semicolon; any other
/// ending is kept and the sentences are simply juxtaposed.
fn merge(buffer: &str, next: &str) -> String {
    let (body, terminal) = split_terminal(buffer);
    if terminal == "." {
        format!("{}; {}", body, lower_first(next))
    } else {
        format!("{} {}", buffer, next)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SentenceEnhancer {
    settings: EnhancerSettings,
}

impl SentenceEnhancer {
    pub fn new(settings: EnhancerSettings) -> Self {
        Self { settings }
    }

    /// Run every pass that applies to `mode`.
    pub fn enhance<R: Rng + ?Sized>(
        &self,
        sentences: Vec<String>,
        mode: Mode,
        rng: &mut R,
    ) -> Vec<String> {
        // Seeds are drawn up front so each pass is reproducible on its own.
        let mut rhythm_rng = StdRng::seed_from_u64(rng.gen());
        let mut transition_rng = StdRng::seed_from_u64(rng.gen());
        let mut hedge_rng = StdRng::seed_from_u64(rng.gen());
        let mut emphasis_rng = StdRng::seed_from_u64(rng.gen());

        let input = sentences.len();
        let sentences = self.vary_rhythm(sentences, &mut rhythm_rng);
        let sentences = self.inject_transitions(sentences, &mut transition_rng);
        let sentences = match mode {
            Mode::Rewrite => {
                let sentences = self.inject_hedges(sentences, &mut hedge_rng);
                self.inject_emphasis(sentences, &mut emphasis_rng)
            }
            Mode::Paraphrase => sentences,
        };

        trace!(input, output = sentences.len(), %mode, "sentences enhanced");
        sentences
    }

    /// Regroup sentence boundaries: merge some short sentences, split long
    /// comma-bearing ones after their lead clause. Never drops words.
    pub fn vary_rhythm<R: Rng + ?Sized>(&self, sentences: Vec<String>, rng: &mut R) -> Vec<String> {
        let s = &self.settings;
        let mut out = Vec::with_capacity(sentences.len());
        let mut pending: Option<String> = None;

        for sentence in sentences {
            let words = word_count(&sentence);

            if words < s.short_sentence_words {
                match pending.take() {
                    Some(buffer) => {
                        let merged = merge(&buffer, &sentence);
                        if chance(rng, s.flush_merged_probability) {
                            out.push(merged);
                        } else {
                            pending = Some(merged);
                        }
                    }
                    None if chance(rng, s.merge_short_probability) => pending = Some(sentence),
                    None => out.push(sentence),
                }
                continue;
            }

            if let Some(buffer) = pending.take() {
                out.push(buffer);
            }

            if words > s.long_sentence_words {
                if let Some((lead, rest)) = clause_comma(&sentence) {
                    let (lead, rest) = (lead.trim(), rest.trim());
                    if !lead.is_empty() && !rest.is_empty() {
                        out.push(format!("{}.", split_terminal(lead).0));
                        pending = Some(capitalize_first(rest));
                        continue;
                    }
                }
            }

            out.push(sentence);
        }

        if let Some(buffer) = pending {
            out.push(buffer);
        }
        out
    }

    /// Prefix a transition to some sentences after the first.
    pub fn inject_transitions<R: Rng + ?Sized>(
        &self,
        sentences: Vec<String>,
        rng: &mut R,
    ) -> Vec<String> {
        let s = &self.settings;
        sentences
            .into_iter()
            .enumerate()
            .map(|(i, sentence)| {
                if i == 0
                    || word_count(&sentence) < s.transition_min_words
                    || has_lead_in(&sentence)
                {
                    return sentence;
                }
                if !chance(rng, s.transition_probability) {
                    return sentence;
                }
                format!("{} {}", pick(rng, TRANSITIONS), lower_first(&sentence))
            })
            .collect()
    }

    /// Splice a hedge after the first comma, or append an em-dash clause.
    pub fn inject_hedges<R: Rng + ?Sized>(
        &self,
        sentences: Vec<String>,
        rng: &mut R,
    ) -> Vec<String> {
        let s = &self.settings;
        sentences
            .into_iter()
            .map(|sentence| {
                if word_count(&sentence) < s.hedge_min_words || !chance(rng, s.hedge_probability) {
                    return sentence;
                }
                match clause_comma(&sentence) {
                    Some((head, tail)) if !tail.trim().is_empty() => {
                        format!("{}, {},{}", head, pick(rng, HEDGES), tail)
                    }
                    _ => {
                        let (body, terminal) = split_terminal(&sentence);
                        let terminal = if terminal.is_empty() { "." } else { terminal };
                        format!("{} — {}{}", body, pick(rng, CLARIFICATIONS), terminal)
                    }
                }
            })
            .collect()
    }

    /// Prefix an emphasis phrase to some longer sentences after the first.
    pub fn inject_emphasis<R: Rng + ?Sized>(
        &self,
        sentences: Vec<String>,
        rng: &mut R,
    ) -> Vec<String> {
        let s = &self.settings;
        sentences
            .into_iter()
            .enumerate()
            .map(|(i, sentence)| {
                if i == 0
                    || word_count(&sentence) < s.emphasis_min_words
                    || has_lead_in(&sentence)
                {
                    return sentence;
                }
                if !chance(rng, s.emphasis_probability) {
                    return sentence;
                }
                format!("{} {}", pick(rng, EMPHASIS), lower_first(&sentence))
            })
            .collect()
    }
}
