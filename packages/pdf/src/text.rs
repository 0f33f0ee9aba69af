//! Plain-text rendering of transcript documents.
//!
//! [`TextExtractor`] is the seam between the pipeline and whatever turns a
//! document into text. [`PdfTextExtractor`] is the production
//! implementation. `pdf_extract` can panic on malformed input rather than
//! returning an error, so calls are wrapped in
//! [`std::panic::catch_unwind`].

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use crate::PdfError;

/// Turns one document into a single text blob.
pub trait TextExtractor {
    /// Extracts the text of the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError`] if the document cannot be read or rendered.
    fn extract_text(&self, path: &Path) -> Result<String, PdfError>;
}

/// Extracts PDF text with [`pdf_extract`], one newline-terminated block per
/// page.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract_text(&self, path: &Path) -> Result<String, PdfError> {
        let bytes = std::fs::read(path)?;

        log::debug!("Read {} bytes from {}", bytes.len(), path.display());

        let pages = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(&bytes)
        }))
        .map_err(|_| {
            PdfError::Extraction("PDF extraction panicked (malformed document)".to_owned())
        })?
        .map_err(|e| PdfError::Extraction(format!("failed to extract text from PDF: {e}")))?;

        let mut text = String::new();
        for page in &pages {
            text.push_str(page);
            text.push('\n');
        }

        log::debug!(
            "Extracted {} characters from {} page(s) of {}",
            text.len(),
            pages.len(),
            path.display()
        );

        Ok(text)
    }
}
