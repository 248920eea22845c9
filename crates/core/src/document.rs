use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PolterError;

/// Count whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Split text into paragraphs on blank lines (lines that are empty or whitespace-only).
/// Returned paragraphs are trimmed and never empty.
pub fn paragraphs(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                out.push(current.join("\n").trim().to_string());
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        out.push(current.join("\n").trim().to_string());
    }
    out
}

/// A submitted document. Never mutated; every transform produces a new string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    text: String,
    word_count: usize,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let word_count = word_count(&text);
        Self { text, word_count }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn word_count(&self) -> usize {
        self.word_count
    }

    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }
}

// ── Request options ───────────────────────────────────────────

/// Operation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Style rewrite: same content, human-sounding surface.
    #[default]
    Rewrite,
    /// Meaning-preserving paraphrase with heavier restructuring.
    Paraphrase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptStyle {
    #[default]
    Default,
    Quick,
    Polish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    #[default]
    Standard,
    /// The advanced multi-stage pipeline.
    King,
}

impl FromStr for Mode {
    type Err = PolterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rewrite" | "humanize" => Ok(Mode::Rewrite),
            "paraphrase" => Ok(Mode::Paraphrase),
            other => Err(PolterError::UnknownVariant { kind: "mode", value: other.to_string() }),
        }
    }
}

impl FromStr for PromptStyle {
    type Err = PolterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "default" => Ok(PromptStyle::Default),
            "quick" => Ok(PromptStyle::Quick),
            "polish" => Ok(PromptStyle::Polish),
            other => Err(PolterError::UnknownVariant {
                kind: "prompt style",
                value: other.to_string(),
            }),
        }
    }
}

impl FromStr for QualityTier {
    type Err = PolterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(QualityTier::Standard),
            "king" | "advanced" => Ok(QualityTier::King),
            other => Err(PolterError::UnknownVariant {
                kind: "quality tier",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Rewrite => "rewrite",
            Mode::Paraphrase => "paraphrase",
        })
    }
}

impl fmt::Display for PromptStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PromptStyle::Default => "default",
            PromptStyle::Quick => "quick",
            PromptStyle::Polish => "polish",
        })
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QualityTier::Standard => "standard",
            QualityTier::King => "king",
        })
    }
}

/// Per-request pipeline configuration, fixed for the whole request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineConfig {
    pub tone: String,
    pub readability: String,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub prompt_style: PromptStyle,
    #[serde(default)]
    pub quality_tier: QualityTier,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            tone: "professional".to_string(),
            readability: "natural".to_string(),
            mode: Mode::default(),
            prompt_style: PromptStyle::default(),
            quality_tier: QualityTier::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_words_across_whitespace() {
        assert_eq!(word_count("In conclusion, this is important."), 5);
        assert_eq!(word_count("  a\tb\n\nc  "), 3);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn splits_paragraphs_on_blank_lines() {
        let text = "first line\nstill first\n\n  \nsecond\n\n\nthird";
        let paras = paragraphs(text);
        assert_eq!(paras, vec!["first line\nstill first", "second", "third"]);
    }

    #[test]
    fn empty_text_has_no_paragraphs() {
        assert!(paragraphs("   \n\n ").is_empty());
        assert!(Document::new("  ").is_empty());
    }

    #[test]
    fn parses_request_options() {
        assert_eq!("Paraphrase".parse::<Mode>().unwrap(), Mode::Paraphrase);
        assert_eq!("advanced".parse::<QualityTier>().unwrap(), QualityTier::King);
        assert_eq!("polish".parse::<PromptStyle>().unwrap(), PromptStyle::Polish);
        assert!("loud".parse::<PromptStyle>().is_err());
    }

    #[test]
    fn pipeline_config_deserializes_with_defaults() {
        let cfg: PipelineConfig =
            serde_json::from_str(r#"{"tone":"casual","readability":"simple","qualityTier":"king"}"#).unwrap();
        assert_eq!(cfg.quality_tier, QualityTier::King);
        assert_eq!(cfg.mode, Mode::Rewrite);
        assert_eq!(cfg.prompt_style, PromptStyle::Default);
    }
}
