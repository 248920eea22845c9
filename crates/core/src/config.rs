use std::env;

use serde::{Deserialize, Serialize};

use crate::document::QualityTier;
use crate::error::PolterError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_usize(profile: &str, key: &str, default: usize) -> usize {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_u32(profile: &str, key: &str, default: u32) -> u32 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_f32(profile: &str, key: &str, default: f32) -> f32 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_env_f64(profile: &str, key: &str, default: f64) -> f64 {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub llm: LlmConfig,
    pub ollama: OllamaConfig,
    pub embedding: EmbeddingConfig,
    pub humanizer: HumanizerConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `POLTER_PROFILE`. When set (e.g. `PROD`), every key
    /// is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("POLTER_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            llm: LlmConfig::from_env_profiled(p),
            ollama: OllamaConfig::from_env_profiled(p),
            embedding: EmbeddingConfig::from_env_profiled(p),
            humanizer: HumanizerConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<(), PolterError> {
        self.humanizer.validate()
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  llm:         provider={}, configured={}",
            self.llm.provider,
            self.llm.is_configured()
        );
        tracing::info!("  ollama:      url={}", self.ollama.url);
        tracing::info!(
            "  embedding:   provider={}, dimensions={}",
            self.embedding.provider,
            self.embedding.dimensions
        );
        tracing::info!(
            "  humanizer:   limits={}/{}, chunk={}+{}",
            self.humanizer.standard_word_limit,
            self.humanizer.king_word_limit,
            self.humanizer.chunk_max_words,
            self.humanizer.chunk_overlap_words
        );
    }

    /// Return a redacted view safe for printing (no secrets).
    pub fn redacted_summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "llm": {
                "provider": self.llm.provider,
                "configured": self.llm.is_configured(),
            },
            "ollama": { "url": self.ollama.url, "model": self.ollama.model },
            "embedding": {
                "provider": self.embedding.provider,
                "dimensions": self.embedding.dimensions,
                "enabled": self.embedding.is_enabled(),
            },
            "humanizer": {
                "standard_word_limit": self.humanizer.standard_word_limit,
                "king_word_limit": self.humanizer.king_word_limit,
                "chunk_max_words": self.humanizer.chunk_max_words,
                "chunk_overlap_words": self.humanizer.chunk_overlap_words,
                "rewrite_fidelity_threshold": self.humanizer.rewrite_fidelity_threshold,
                "paraphrase_fidelity_threshold": self.humanizer.paraphrase_fidelity_threshold,
            },
        })
    }
}

// ── LLM (OpenAI / Anthropic / Ollama) ─────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "openai", "anthropic", "ollama"
    pub provider: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
}

impl LlmConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            provider: profiled_env_or(p, "LLM_PROVIDER", "openai"),
            openai_api_key: profiled_env_opt(p, "OPENAI_API_KEY"),
            openai_model: profiled_env_or(p, "OPENAI_MODEL", "gpt-4o"),
            openai_base_url: profiled_env_opt(p, "OPENAI_BASE_URL"),
            anthropic_api_key: profiled_env_opt(p, "ANTHROPIC_API_KEY"),
            anthropic_model: profiled_env_or(p, "ANTHROPIC_MODEL", "claude-sonnet-4-5-20250929"),
        }
    }

    pub fn is_configured(&self) -> bool {
        match self.provider.as_str() {
            "openai" => self.openai_api_key.is_some(),
            "anthropic" | "claude" => self.anthropic_api_key.is_some(),
            "ollama" => true,
            _ => false,
        }
    }
}

// ── Ollama (local models) ─────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    pub url: String,
    pub model: String,
    pub embedding_model: String,
}

impl OllamaConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            url: profiled_env_or(p, "OLLAMA_URL", "http://localhost:11434"),
            model: profiled_env_or(p, "OLLAMA_MODEL", "llama3.2"),
            embedding_model: profiled_env_or(p, "OLLAMA_EMBEDDING_MODEL", "nomic-embed-text"),
        }
    }
}

// ── Embedding (fidelity scoring) ──────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// "openai", "ollama", "none"
    pub provider: String,
    pub model: String,
    pub dimensions: usize,
    pub cache_size: usize,
}

impl EmbeddingConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            provider: profiled_env_or(p, "EMBEDDING_PROVIDER", "none"),
            model: profiled_env_or(p, "EMBEDDING_MODEL", "text-embedding-3-small"),
            dimensions: profiled_env_usize(p, "EMBEDDING_DIMENSIONS", 1536),
            cache_size: profiled_env_usize(p, "EMBEDDING_CACHE_SIZE", 256),
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self.provider.as_str(), "" | "none" | "off")
    }
}

// ── Humanizer pipeline ────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HumanizerConfig {
    pub standard_word_limit: usize,
    pub king_word_limit: usize,
    /// Documents at or below this size are processed as one chunk.
    pub single_chunk_words: usize,
    pub chunk_max_words: usize,
    pub chunk_overlap_words: usize,
    pub rewrite_fidelity_threshold: f64,
    pub paraphrase_fidelity_threshold: f64,
    /// Probability that each expanded form is contracted during cleanup.
    pub contraction_rate: f64,
    pub standard: GenerationSettings,
    pub king: GenerationSettings,
    /// Fixed seed for every random draw; `None` seeds from entropy.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Empty means "provider default".
    pub model_hint: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for HumanizerConfig {
    fn default() -> Self {
        Self {
            standard_word_limit: 5_000,
            king_word_limit: 10_000,
            single_chunk_words: 800,
            chunk_max_words: 800,
            chunk_overlap_words: 100,
            rewrite_fidelity_threshold: 0.80,
            paraphrase_fidelity_threshold: 0.75,
            contraction_rate: 0.8,
            standard: GenerationSettings {
                model_hint: String::new(),
                temperature: 0.7,
                max_output_tokens: 2000,
            },
            king: GenerationSettings {
                model_hint: String::new(),
                temperature: 0.8,
                max_output_tokens: 4000,
            },
            seed: None,
        }
    }
}

impl HumanizerConfig {
    fn from_env_profiled(p: &str) -> Self {
        let d = Self::default();
        Self {
            standard_word_limit: profiled_env_usize(
                p,
                "STANDARD_WORD_LIMIT",
                d.standard_word_limit,
            ),
            king_word_limit: profiled_env_usize(p, "KING_WORD_LIMIT", d.king_word_limit),
            single_chunk_words: profiled_env_usize(p, "SINGLE_CHUNK_WORDS", d.single_chunk_words),
            chunk_max_words: profiled_env_usize(p, "CHUNK_MAX_WORDS", d.chunk_max_words),
            chunk_overlap_words: profiled_env_usize(
                p,
                "CHUNK_OVERLAP_WORDS",
                d.chunk_overlap_words,
            ),
            rewrite_fidelity_threshold: profiled_env_f64(
                p,
                "REWRITE_FIDELITY_THRESHOLD",
                d.rewrite_fidelity_threshold,
            ),
            paraphrase_fidelity_threshold: profiled_env_f64(
                p,
                "PARAPHRASE_FIDELITY_THRESHOLD",
                d.paraphrase_fidelity_threshold,
            ),
            contraction_rate: profiled_env_f64(p, "CONTRACTION_RATE", d.contraction_rate),
            standard: GenerationSettings {
                model_hint: profiled_env_or(p, "STANDARD_MODEL", ""),
                temperature: profiled_env_f32(p, "STANDARD_TEMPERATURE", d.standard.temperature),
                max_output_tokens: profiled_env_u32(
                    p,
                    "STANDARD_MAX_TOKENS",
                    d.standard.max_output_tokens,
                ),
            },
            king: GenerationSettings {
                model_hint: profiled_env_or(p, "KING_MODEL", ""),
                temperature: profiled_env_f32(p, "KING_TEMPERATURE", d.king.temperature),
                max_output_tokens: profiled_env_u32(p, "KING_MAX_TOKENS", d.king.max_output_tokens),
            },
            seed: profiled_env_opt(p, "HUMANIZER_SEED").and_then(|v| v.parse().ok()),
        }
    }

    /// Word ceiling for a quality tier.
    pub fn word_limit(&self, tier: QualityTier) -> usize {
        match tier {
            QualityTier::Standard => self.standard_word_limit,
            QualityTier::King => self.king_word_limit,
        }
    }

    pub fn generation(&self, tier: QualityTier) -> &GenerationSettings {
        match tier {
            QualityTier::Standard => &self.standard,
            QualityTier::King => &self.king,
        }
    }

    pub fn validate(&self) -> Result<(), PolterError> {
        if self.chunk_max_words == 0 {
            return Err(PolterError::Config("CHUNK_MAX_WORDS must be positive".into()));
        }
        if self.chunk_overlap_words >= self.chunk_max_words {
            return Err(PolterError::Config(format!(
                "CHUNK_OVERLAP_WORDS ({}) must be smaller than CHUNK_MAX_WORDS ({})",
                self.chunk_overlap_words, self.chunk_max_words
            )));
        }
        for (name, value) in [
            ("REWRITE_FIDELITY_THRESHOLD", self.rewrite_fidelity_threshold),
            ("PARAPHRASE_FIDELITY_THRESHOLD", self.paraphrase_fidelity_threshold),
            ("CONTRACTION_RATE", self.contraction_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(PolterError::Config(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}
