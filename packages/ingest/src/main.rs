#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the transcript metrics extractor.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use transcript_metrics_cli_utils::IndicatifProgress;
use transcript_metrics_ingest::report::Report;
use transcript_metrics_ingest::reporter::LogReporter;
use transcript_metrics_ingest::{process_document, run_batch};
use transcript_metrics_ingest_models::BatchConfig;
use transcript_metrics_pdf::TranscriptExtractor;
use transcript_metrics_pdf::text::PdfTextExtractor;

#[derive(Parser)]
#[command(
    name = "transcript_metrics_ingest",
    about = "Extract student fields and per-period metrics from transcript PDFs"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Append-only log file (overrides `TRANSCRIPT_LOG_FILE`)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every PDF in a directory and write the report
    Run {
        /// Directory containing transcript PDFs (overrides `TRANSCRIPT_INPUT_DIR`)
        #[arg(long)]
        input: Option<PathBuf>,
        /// Report file to write (overrides `TRANSCRIPT_OUTPUT`)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Process a single PDF and print its report row as JSON
    Inspect {
        /// Transcript PDF to process
        path: PathBuf,
    },
    /// Print the report column order
    Columns,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = BatchConfig::from_env().with_overrides(None, None, cli.log_file);

    let Some(command) = cli.command else {
        let multi = transcript_metrics_cli_utils::init_logger(Some(&config.log_path))?;
        return transcript_metrics_ingest::interactive::run(config, &multi);
    };

    match command {
        Commands::Columns => {
            for name in Report::header() {
                println!("{name}");
            }
        }
        Commands::Inspect { path } => {
            transcript_metrics_cli_utils::init_logger(None)?;
            let extractor = TranscriptExtractor::standard()?;
            let today = chrono::Local::now().date_naive();

            let document =
                process_document(&path, &PdfTextExtractor, &extractor, today, &LogReporter)?;
            log::info!(
                "{} course rows matched, {} discarded",
                document.rows_matched,
                document.rows_discarded
            );
            println!("{}", serde_json::to_string_pretty(&document.record)?);
        }
        Commands::Run { input, output } => {
            let config = config.with_overrides(input, output, None);
            let multi = transcript_metrics_cli_utils::init_logger(Some(&config.log_path))?;
            let extractor = TranscriptExtractor::standard()?;
            let today = chrono::Local::now().date_naive();
            let progress = IndicatifProgress::documents_bar(&multi, "Scanning transcripts");

            let summary = run_batch(
                &config,
                &PdfTextExtractor,
                &extractor,
                today,
                &LogReporter,
                Some(progress),
            )?;

            log::info!(
                "Batch complete: {}/{} transcripts, {} failed, {} rows discarded in {:.1}s",
                summary.processed,
                summary.discovered,
                summary.failed,
                summary.rows_discarded,
                summary.duration.as_secs_f64()
            );
        }
    }

    Ok(())
}
