use std::path::PathBuf;

use clap::Parser;
use poltertext_core::document::{Mode, PipelineConfig, PromptStyle, QualityTier};

/// Rewrite text so it reads as if a person wrote it.
///
/// Reads the document from `--input` or stdin and prints the result. Provider
/// and embedding settings come from the environment (see `.env`).
#[derive(Parser, Debug)]
#[command(name = "poltertext", about = "Rewrite text so it reads as if a person wrote it")]
pub struct CliArgs {
    /// File to read (stdin when omitted)
    #[arg(long, short)]
    pub input: Option<PathBuf>,

    /// rewrite or paraphrase
    #[arg(long, default_value = "rewrite")]
    pub mode: Mode,

    /// standard or king
    #[arg(long, env = "POLTER_TIER", default_value = "standard")]
    pub tier: QualityTier,

    /// Prompt style: default, quick or polish
    #[arg(long, default_value = "default")]
    pub style: PromptStyle,

    #[arg(long, default_value = "professional")]
    pub tone: String,

    #[arg(long, default_value = "natural")]
    pub readability: String,

    /// Fix the random seed (overrides HUMANIZER_SEED)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Skip fidelity scoring even when an embedding provider is configured
    #[arg(long)]
    pub no_similarity: bool,

    /// Print a JSON object instead of plain text
    #[arg(long)]
    pub json: bool,
}

impl CliArgs {
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            tone: self.tone.clone(),
            readability: self.readability.clone(),
            mode: self.mode,
            prompt_style: self.style,
            quality_tier: self.tier,
        }
    }
}
