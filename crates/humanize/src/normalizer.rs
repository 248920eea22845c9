//! Cleanup pass: contractions, residual boilerplate, whitespace and
//! punctuation spacing.
//!
//! Contraction substitution is the only random step and runs first, exactly
//! once per text. Everything after it ([`clean`]) is idempotent.

use once_cell::sync::Lazy;
use rand::Rng;
use regex::{Captures, Regex};
use tracing::trace;

use crate::patterns::{BOILERPLATE_RULES, CONTRACTIONS};
use crate::sentences::capitalize_first;

struct CompiledRule {
    re: Regex,
    replacement: &'static str,
}

static BOILERPLATE: Lazy<Vec<CompiledRule>> = Lazy::new(|| {
    BOILERPLATE_RULES
        .iter()
        .map(|rule| {
            // Stripped lead-ins take their trailing punctuation with them.
            let tail = if rule.replacement.is_empty() { r"[ \t]*[,;:]?[ \t]*" } else { "" };
            let re = Regex::new(&format!(r"(?i)\b{}\b{}", rule.pattern, tail))
                .expect("boilerplate rule is a valid regex");
            CompiledRule {
                re,
                replacement: rule.replacement,
            }
        })
        .collect()
});

static CONTRACTION_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    CONTRACTIONS
        .iter()
        .map(|(expanded, contracted)| {
            let pattern = expanded.split(' ').map(regex::escape).collect::<Vec<_>>().join(r"\s+");
            let re = Regex::new(&format!(r"(?i)\b{pattern}\b"))
                .expect("contraction is a valid regex");
            (re, *contracted)
        })
        .collect()
});

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));
static SPACE_BEFORE_PUNCT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+([,.;:!?])").expect("valid regex"));
static DANGLING_PUNCT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,;:]+([.!?])").expect("valid regex"));
static MISSING_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([.!?])([A-Z][a-z])").expect("valid regex"));

/// Give `replacement` the leading capital of `matched`.
fn match_case(matched: &str, replacement: &str) -> String {
    if matched.chars().next().is_some_and(char::is_uppercase) {
        capitalize_first(replacement)
    } else {
        replacement.to_string()
    }
}

/// Upper-case the first non-whitespace character.
fn capitalize_leading(segment: &str) -> String {
    let start = segment.len() - segment.trim_start().len();
    format!("{}{}", &segment[..start], capitalize_first(&segment[start..]))
}

fn at_sentence_start(before: &str) -> bool {
    let before = before.trim_end();
    before.is_empty() || before.ends_with(['.', '!', '?'])
}

/// Apply one boilerplate rule. When a stripped phrase opened a sentence, the
/// next word is capitalised in its place.
fn apply_rule(text: &str, rule: &CompiledRule) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    let mut capitalize_next = false;

    for m in rule.re.find_iter(text) {
        let segment = &text[last..m.start()];
        if capitalize_next && !segment.trim().is_empty() {
            out.push_str(&capitalize_leading(segment));
            capitalize_next = false;
        } else {
            out.push_str(segment);
        }

        let sentence_start = at_sentence_start(&out);
        if rule.replacement.is_empty() {
            capitalize_next |= sentence_start;
        } else if sentence_start {
            out.push_str(&capitalize_first(rule.replacement));
        } else {
            out.push_str(&match_case(m.as_str(), rule.replacement));
        }
        last = m.end();
    }

    let rest = &text[last..];
    if capitalize_next {
        out.push_str(&capitalize_leading(rest));
    } else {
        out.push_str(rest);
    }
    out
}

/// Remove every boilerplate phrase. Used both as the pre-generation filter
/// and inside [`clean`].
pub fn strip_boilerplate(text: &str) -> String {
    BOILERPLATE
        .iter()
        .fold(text.to_string(), |acc, rule| apply_rule(&acc, rule))
}

/// The idempotent cleanup steps.
pub fn clean(text: &str) -> String {
    let stripped = strip_boilerplate(text);
    let collapsed = WHITESPACE.replace_all(&stripped, " ");
    let tightened = SPACE_BEFORE_PUNCT.replace_all(collapsed.trim(), "$1");
    let tightened = DANGLING_PUNCT.replace_all(&tightened, "$1");
    MISSING_SPACE.replace_all(&tightened, "$1 $2").into_owned()
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    contraction_rate: f64,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(0.8)
    }
}

impl Normalizer {
    /// `contraction_rate` is the chance each expanded form is contracted.
    /// A non-finite rate disables contraction.
    pub fn new(contraction_rate: f64) -> Self {
        let contraction_rate = if contraction_rate.is_finite() {
            contraction_rate.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self { contraction_rate }
    }

    /// Contract once, then clean.
    pub fn normalize<R: Rng + ?Sized>(&self, text: &str, rng: &mut R) -> String {
        clean(&self.contract(text, rng))
    }

    /// One draw per expanded form; a hit replaces every occurrence of it.
    pub fn contract<R: Rng + ?Sized>(&self, text: &str, rng: &mut R) -> String {
        let mut out = text.to_string();
        let mut applied = 0usize;
        for (re, contracted) in CONTRACTION_RULES.iter() {
            if !rng.gen_bool(self.contraction_rate) {
                continue;
            }
            if let std::borrow::Cow::Owned(replaced) =
                re.replace_all(&out, |caps: &Captures| match_case(&caps[0], contracted))
            {
                out = replaced;
                applied += 1;
            }
        }
        trace!(applied, "contractions applied");
        out
    }
}
