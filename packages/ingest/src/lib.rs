#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Library for turning a directory of transcript PDFs into a metrics
//! report.
//!
//! [`process_document`] handles one transcript: text extraction, header
//! fields, derived age, course rows and recency metrics. [`run_batch`]
//! walks a directory, collects one [`OutputRecord`] per readable
//! transcript and writes the [`report::Report`]. Everything that would
//! otherwise be logged from inside the pipeline goes through a
//! [`reporter::BatchReporter`] passed in by the caller.

pub mod interactive;
pub mod report;
pub mod reporter;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDate;
use transcript_metrics_analytics::aggregate::PeriodBuckets;
use transcript_metrics_analytics::{age, disambiguate};
use transcript_metrics_ingest_models::progress::{ProgressCallback, null_progress};
use transcript_metrics_ingest_models::{BatchConfig, BatchSummary};
use transcript_metrics_pdf::text::TextExtractor;
use transcript_metrics_pdf::{PdfError, TranscriptExtractor};
use transcript_metrics_transcript_models::{Cell, Column, Field, OutputRecord};

use crate::report::{Report, ReportError};
use crate::reporter::BatchReporter;

/// File extension of the documents a batch picks up.
pub const DOCUMENT_EXTENSION: &str = "pdf";

/// Errors that cause a single document to be skipped.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The document could not be read or rendered to text.
    #[error(transparent)]
    Text(#[from] PdfError),

    /// The document rendered to nothing, not even a page break.
    #[error("document has no pages")]
    EmptyText,
}

/// Errors that abort a whole batch.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// The input directory does not exist.
    #[error("input directory not found: {}", .0.display())]
    InputDirMissing(PathBuf),

    /// The input directory holds no `*.pdf` files.
    #[error("no PDF files found in {}", .0.display())]
    NoDocuments(PathBuf),

    /// Every document failed, so there is nothing to report.
    #[error("processing finished but no data was extracted")]
    NothingExtracted,

    /// Listing the input directory failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Writing the report failed.
    #[error("failed to write report: {0}")]
    Report(#[from] ReportError),
}

/// Outcome of processing one transcript.
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    /// The report row for this transcript.
    pub record: OutputRecord,
    /// Course rows matched by the row pattern.
    pub rows_matched: usize,
    /// Course rows dropped as ambiguous or malformed.
    pub rows_discarded: usize,
}

/// Returns the file name of `path` for logs and the source-file column.
#[must_use]
pub fn document_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}

/// Extracts one transcript into a report row.
///
/// Missing fields, an unparseable birth date and unclassifiable course
/// rows all degrade to sentinels or zeros, and so does a page with no
/// text on it. Only a document whose text cannot be extracted, or that
/// has no pages at all, is an error.
///
/// # Errors
///
/// Returns [`DocumentError`] if the document's text cannot be extracted or
/// the document has no pages.
pub fn process_document(
    path: &Path,
    text_extractor: &dyn TextExtractor,
    extractor: &TranscriptExtractor,
    today: NaiveDate,
    reporter: &dyn BatchReporter,
) -> Result<ProcessedDocument, DocumentError> {
    let name = document_name(path);

    let text = text_extractor.extract_text(path)?;
    if text.is_empty() {
        return Err(DocumentError::EmptyText);
    }

    let fields = extractor.fields(&text);
    let mut record = OutputRecord::from_fields(&fields);
    record.set(Column::Age, age::age_cell(fields.get(Field::BirthDate), today));

    let raw_rows = extractor.rows(&text);
    let rows_matched = raw_rows.len();
    let mut rows_discarded = 0;
    let mut buckets = PeriodBuckets::default();

    for raw in &raw_rows {
        match disambiguate::classify_row(raw) {
            Ok(row) => buckets.insert(row),
            Err(issue) => {
                rows_discarded += 1;
                reporter.row_discarded(&name, &issue);
            }
        }
    }

    log::debug!(
        "[{name}] {rows_matched} course rows matched, {rows_discarded} discarded, {} periods",
        buckets.len()
    );

    for (rank, metrics) in buckets.recent_metrics() {
        record.set_period(rank, &metrics);
    }
    record.set(Column::SourceFile, Cell::Text(name));

    Ok(ProcessedDocument {
        record,
        rows_matched,
        rows_discarded,
    })
}

/// Lists the `*.pdf` files directly inside `dir`, sorted by file name.
///
/// Hidden files and subdirectories are skipped.
///
/// # Errors
///
/// Returns an I/O error if the directory cannot be read.
pub fn discover_documents(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut documents = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) == Some(DOCUMENT_EXTENSION) {
            documents.push(path);
        }
    }

    documents.sort();
    Ok(documents)
}

/// Processes every transcript in `config.input_dir` and writes the report
/// to `config.output_path`.
///
/// Documents that fail are reported and left out; the batch only stops
/// early when there is nothing to process or the report cannot be written.
/// The report is written in one go after all documents are processed.
///
/// # Errors
///
/// Returns [`BatchError`] if the input directory is missing, cannot be
/// listed or holds no PDFs, no document could be processed, or the report
/// could not be written.
pub fn run_batch(
    config: &BatchConfig,
    text_extractor: &dyn TextExtractor,
    extractor: &TranscriptExtractor,
    today: NaiveDate,
    reporter: &dyn BatchReporter,
    progress: Option<Arc<dyn ProgressCallback>>,
) -> Result<BatchSummary, BatchError> {
    let start = Instant::now();
    let progress = progress.unwrap_or_else(null_progress);

    let documents = match discover_documents(&config.input_dir) {
        Ok(documents) => documents,
        Err(e) => {
            let error = if e.kind() == std::io::ErrorKind::NotFound {
                BatchError::InputDirMissing(config.input_dir.clone())
            } else {
                BatchError::Io(e)
            };
            reporter.batch_aborted(&error);
            return Err(error);
        }
    };
    if documents.is_empty() {
        let error = BatchError::NoDocuments(config.input_dir.clone());
        reporter.batch_aborted(&error);
        return Err(error);
    }

    reporter.batch_started(&config.input_dir);
    progress.set_total(documents.len() as u64);

    let mut report = Report::default();
    let mut failed = 0;
    let mut rows_discarded = 0;

    for path in &documents {
        let name = document_name(path);
        progress.set_message(name.clone());

        match process_document(path, text_extractor, extractor, today, reporter) {
            Ok(document) => {
                rows_discarded += document.rows_discarded;
                reporter.document_processed(&name, &document.record);
                report.push(document.record);
            }
            Err(e) => {
                failed += 1;
                reporter.document_failed(&name, &e);
            }
        }

        progress.inc(1);
    }

    progress.finish(format!(
        "{} of {} transcripts processed",
        report.len(),
        documents.len()
    ));

    let written = write_report(&report, &config.output_path, today, reporter);
    reporter.batch_finished();
    written?;

    Ok(BatchSummary {
        discovered: documents.len(),
        processed: report.len(),
        failed,
        rows_discarded,
        output_path: config.output_path.clone(),
        duration: start.elapsed(),
    })
}

fn write_report(
    report: &Report,
    path: &Path,
    today: NaiveDate,
    reporter: &dyn BatchReporter,
) -> Result<(), BatchError> {
    let result = if report.is_empty() {
        Err(BatchError::NothingExtracted)
    } else {
        report.write_to_path(path, today).map_err(BatchError::from)
    };

    match &result {
        Ok(()) => reporter.report_written(path, report.len()),
        Err(error) => reporter.batch_aborted(error),
    }

    result
}
