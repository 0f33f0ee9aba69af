#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Transcript text extraction and pattern-rule matching.
//!
//! Transcripts arrive as PDFs with a fixed layout. This crate turns one PDF
//! into plain text using pure-Rust text extraction ([`pdf_extract`]) and
//! then applies two kinds of regex rules to that text:
//!
//! - **Header fields** ([`fields`]): one pattern per [`Field`], first match
//!   wins, missing fields become the `N/A` sentinel.
//! - **Course rows** ([`regex_rows`]): every non-overlapping match of the
//!   row pattern, yielding the period, two unlabeled numbers and the
//!   outcome of each course line.
//!
//! Both rule sets live in an embedded TOML file ([`rules`]) and are
//! compiled once into a [`TranscriptExtractor`].
//!
//! [`Field`]: transcript_metrics_transcript_models::Field

pub mod fields;
pub mod regex_rows;
pub mod rules;
pub mod text;

use transcript_metrics_transcript_models::FieldRecord;

use crate::fields::FieldExtractor;
use crate::regex_rows::{RawRow, RowExtractor};
use crate::rules::RuleSet;

/// Errors specific to transcript text extraction.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    /// PDF text extraction failed.
    #[error("PDF extraction error: {0}")]
    Extraction(String),

    /// A configured regex pattern failed to compile.
    #[error("Invalid regex pattern: {0}")]
    Regex(#[from] regex::Error),

    /// The embedded rule table is malformed.
    #[error("Invalid extraction rules: {0}")]
    Rules(String),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Compiled header-field and course-row rules for the transcript layout.
#[derive(Debug)]
pub struct TranscriptExtractor {
    fields: FieldExtractor,
    rows: RowExtractor,
}

impl TranscriptExtractor {
    /// Compiles every rule in `rules`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::Regex`] if any pattern fails to compile, or
    /// [`PdfError::Rules`] if the row pattern has the wrong group count.
    pub fn from_rules(rules: &RuleSet) -> Result<Self, PdfError> {
        Ok(Self {
            fields: FieldExtractor::new(&rules.fields)?,
            rows: RowExtractor::new(&rules.rows.pattern)?,
        })
    }

    /// Compiles the rules embedded in this crate.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError`] if the embedded rule table fails to parse or
    /// compile.
    pub fn standard() -> Result<Self, PdfError> {
        Self::from_rules(&rules::standard_rules()?)
    }

    /// Extracts the header fields from `text`.
    #[must_use]
    pub fn fields(&self, text: &str) -> FieldRecord {
        self.fields.extract(text)
    }

    /// Extracts the raw course rows from `text`, in document order.
    #[must_use]
    pub fn rows(&self, text: &str) -> Vec<RawRow> {
        self.rows.extract(text)
    }
}
