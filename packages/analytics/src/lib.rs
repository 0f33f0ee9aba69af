#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Grade/attendance disambiguation and per-period transcript metrics.
//!
//! Course rows come out of the text with two unlabeled numbers. The
//! [`disambiguate`] module decides which one is the grade and which is the
//! attendance percentage; [`aggregate`] groups the resulting rows by period
//! and summarizes the three most recent periods. [`age`] derives the
//! student's age from the extracted birth date.

pub mod age;
pub mod aggregate;
pub mod disambiguate;

use thiserror::Error;

/// Why a matched course row was left out of the metrics.
///
/// None of these abort a document; the row is dropped and the issue is
/// reported as a warning.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowIssue {
    /// A numeric token could not be parsed.
    #[error("period {period}: could not parse '{token}' as a number")]
    Malformed {
        /// Period token of the row.
        period: String,
        /// The offending token, as printed.
        token: String,
    },

    /// No rule could tell the grade from the attendance.
    #[error("period {period}: cannot tell grade from attendance in ({first}, {second})")]
    Ambiguous {
        /// Period token of the row.
        period: String,
        /// First parsed number.
        first: f64,
        /// Second parsed number.
        second: f64,
    },

    /// The outcome keyword is not part of the outcome taxonomy.
    #[error("period {period}: unknown outcome '{outcome}'")]
    UnknownOutcome {
        /// Period token of the row.
        period: String,
        /// The outcome keyword, as printed.
        outcome: String,
    },
}
