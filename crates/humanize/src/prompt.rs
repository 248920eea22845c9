//! Generation prompt construction.

use std::fmt::Write;

use poltertext_core::document::{Mode, PipelineConfig, PromptStyle, QualityTier};

use crate::patterns::banned_phrases;

fn role(style: PromptStyle) -> &'static str {
    match style {
        PromptStyle::Default | PromptStyle::Quick => "professional writing assistant",
        PromptStyle::Polish => "writing polish assistant",
    }
}

fn task(config: &PipelineConfig) -> &'static str {
    match (config.prompt_style, config.mode) {
        (PromptStyle::Polish, _) => {
            "Polish the following text so it reads naturally. Fix grammar, flow and word choice, \
             but keep its structure and wording wherever they already work."
        }
        (_, Mode::Paraphrase) => {
            "Rewrite the following text aggressively to paraphrase it while sounding naturally human-written."
        }
        (_, Mode::Rewrite) => "Rewrite the following text so it sounds naturally human-written.",
    }
}

fn requirements(config: &PipelineConfig) -> Vec<String> {
    let mut rules = Vec::new();
    match (config.prompt_style, config.mode) {
        (PromptStyle::Polish, _) => {
            rules.push("Make the smallest edits that fix the problem.".to_string());
        }
        (_, Mode::Paraphrase) => {
            rules.push("Completely restructure sentences and use synonyms.".to_string());
        }
        (_, Mode::Rewrite) => {
            rules.push("Use active voice whenever possible.".to_string());
        }
    }
    if config.prompt_style != PromptStyle::Quick {
        rules.push("Vary sentence length and rhythm.".to_string());
    }
    rules.push("Preserve the exact meaning; do not summarize or add new information.".to_string());
    if config.quality_tier == QualityTier::King {
        rules.push("Output must be 5–10% longer than the input.".to_string());
    }

    let banned = banned_phrases()
        .iter()
        .map(|p| format!("\"{p}\""))
        .collect::<Vec<_>>()
        .join(", ");
    rules.push(format!("Never use these phrases: {banned}."));
    rules.push(format!("Apply the tone: {}.", config.tone));
    rules.push(format!("Apply readability level: {}.", config.readability));
    rules
}

/// The user message sent to the generation service. The text to rewrite
/// always comes last, after a `Text:` line.
pub fn build_prompt(text: &str, config: &PipelineConfig) -> String {
    let mut prompt = format!(
        "You are a {}. {}\n\nRequirements:\n",
        role(config.prompt_style),
        task(config)
    );
    for rule in requirements(config) {
        let _ = writeln!(prompt, "- {rule}");
    }
    let _ = write!(prompt, "\nText:\n{text}");
    prompt
}
