//! Batch event reporting.
//!
//! The pipeline never logs document-level outcomes directly; it calls a
//! [`BatchReporter`]. [`LogReporter`] forwards everything to the `log`
//! facade, which the binary routes to the terminal and the append-only
//! journal file.

use std::path::Path;

use transcript_metrics_analytics::RowIssue;
use transcript_metrics_transcript_models::{Column, NOT_FOUND, OutputRecord};

use crate::{BatchError, DocumentError};

/// Receives batch lifecycle events.
pub trait BatchReporter {
    /// The input directory was found and is about to be scanned.
    fn batch_started(&self, input_dir: &Path);

    /// A document produced a report row.
    fn document_processed(&self, document: &str, record: &OutputRecord);

    /// A document was skipped.
    fn document_failed(&self, document: &str, error: &DocumentError);

    /// A course row was dropped from a document's metrics.
    fn row_discarded(&self, document: &str, issue: &RowIssue);

    /// The report was written.
    fn report_written(&self, path: &Path, records: usize);

    /// The batch stopped without writing a report.
    fn batch_aborted(&self, error: &BatchError);

    /// The batch completed.
    fn batch_finished(&self);
}

/// [`BatchReporter`] backed by the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogReporter;

impl BatchReporter for LogReporter {
    fn batch_started(&self, input_dir: &Path) {
        log::info!("Starting transcript batch in {}", input_dir.display());
    }

    fn document_processed(&self, document: &str, record: &OutputRecord) {
        let enrollment = record
            .get(Column::EnrollmentNumber)
            .map_or_else(|| NOT_FOUND.to_owned(), ToString::to_string);
        log::info!("[{document}] processed (enrollment {enrollment})");
    }

    fn document_failed(&self, document: &str, error: &DocumentError) {
        log::error!("[{document}] failed: {error}");
        log::warn!("[{document}] skipped, no row written for this document");
    }

    fn row_discarded(&self, document: &str, issue: &RowIssue) {
        log::warn!("[{document}] discarding course row: {issue}");
    }

    fn report_written(&self, path: &Path, records: usize) {
        log::info!("Report with {records} rows written to {}", path.display());
    }

    fn batch_aborted(&self, error: &BatchError) {
        match error {
            BatchError::InputDirMissing(_) => log::error!("Aborting: {error}"),
            BatchError::NoDocuments(_) | BatchError::NothingExtracted => {
                log::warn!("{error}");
            }
            BatchError::Io(_) | BatchError::Report(_) => log::error!("{error}"),
        }
    }

    fn batch_finished(&self) {
        log::info!("Transcript batch finished");
    }
}
