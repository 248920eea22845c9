mod cli;

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};

use poltertext_core::config::{load_dotenv, Config};
use poltertext_core::services::GenerationService;
use poltertext_humanize::{FidelityValidator, Humanizer};
use poltertext_llm::embedding::create_similarity;
use poltertext_llm::{ProviderGenerator, UnconfiguredGenerator};

use crate::cli::CliArgs;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    load_dotenv();
    let mut config = Config::from_env();
    if let Some(seed) = args.seed {
        config.humanizer.seed = Some(seed);
    }
    config.validate().context("invalid configuration")?;
    config.log_summary();
    debug!(config = %config.redacted_summary(), "effective configuration");

    let generator = build_generator(&config);
    let similarity = if args.no_similarity {
        None
    } else {
        create_similarity(&config).context("failed to set up similarity scoring")?
    };
    info!(fidelity_scoring = similarity.is_some(), "services ready");

    let humanizer = Humanizer::new(
        generator,
        FidelityValidator::new(similarity),
        config.humanizer.clone(),
    );

    let text = read_input(args.input.as_deref())?;
    let output = humanizer
        .process(&text, &args.pipeline_config())
        .await
        .context("humanization rejected")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        if let Some(warning) = &output.warning {
            eprintln!("warning: {warning}");
        }
        println!("{}", output.result_text);
    }
    Ok(())
}

/// The configured provider, or a generator that always fails so every chunk
/// takes the rule-based path.
fn build_generator(config: &Config) -> Arc<dyn GenerationService> {
    if !config.llm.is_configured() {
        warn!(
            provider = %config.llm.provider,
            "LLM provider not configured, using rule-based fallback"
        );
        return Arc::new(UnconfiguredGenerator::new(format!(
            "{} provider is not configured",
            config.llm.provider
        )));
    }
    match ProviderGenerator::from_config(&config.llm, &config.ollama) {
        Ok(generator) => Arc::new(generator),
        Err(e) => {
            warn!(error = %e, "failed to create LLM provider, using rule-based fallback");
            Arc::new(UnconfiguredGenerator::new(e.to_string()))
        }
    }
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read '{}'", path.display())),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("failed to read stdin")?;
            Ok(text)
        }
    }
}
