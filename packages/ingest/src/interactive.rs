#![allow(clippy::module_name_repetitions)]

//! Interactive mode for the transcript metrics extractor.
//!
//! Prompts for the input directory and report path using `dialoguer`, so a
//! batch can be run without remembering CLI flags.

use std::path::PathBuf;

use dialoguer::{Confirm, Input};
use transcript_metrics_cli_utils::{IndicatifProgress, MultiProgress};
use transcript_metrics_ingest_models::BatchConfig;
use transcript_metrics_pdf::TranscriptExtractor;
use transcript_metrics_pdf::text::PdfTextExtractor;

use crate::reporter::LogReporter;

/// Prompts for batch settings, starting from `config`, then runs the batch.
///
/// # Errors
///
/// Returns an error if a prompt fails, the extraction rules are invalid, or
/// the batch aborts.
pub fn run(config: BatchConfig, multi: &MultiProgress) -> Result<(), Box<dyn std::error::Error>> {
    let input_dir = prompt_path("Transcript directory", &config.input_dir)?;
    let output_path = prompt_path("Report file", &config.output_path)?;
    let config = config.with_overrides(Some(input_dir), Some(output_path), None);

    let proceed = Confirm::new()
        .with_prompt(format!(
            "Process PDFs in {} and write {}?",
            config.input_dir.display(),
            config.output_path.display()
        ))
        .default(true)
        .interact()?;

    if !proceed {
        println!("Cancelled.");
        return Ok(());
    }

    let extractor = TranscriptExtractor::standard()?;
    let today = chrono::Local::now().date_naive();
    let progress = IndicatifProgress::documents_bar(multi, "Scanning transcripts");

    let summary = crate::run_batch(
        &config,
        &PdfTextExtractor,
        &extractor,
        today,
        &LogReporter,
        Some(progress),
    )?;

    println!(
        "{} of {} transcripts written to {}",
        summary.processed,
        summary.discovered,
        summary.output_path.display()
    );

    Ok(())
}

fn prompt_path(prompt: &str, default: &std::path::Path) -> Result<PathBuf, dialoguer::Error> {
    let value: String = Input::new()
        .with_prompt(prompt)
        .default(default.display().to_string())
        .interact_text()?;
    Ok(PathBuf::from(value.trim()))
}
