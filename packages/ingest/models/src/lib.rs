#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Batch configuration, progress, and result types.

pub mod progress;

use std::path::PathBuf;
use std::time::Duration;

/// Environment variable naming the directory of transcripts to process.
pub const INPUT_DIR_ENV: &str = "TRANSCRIPT_INPUT_DIR";
/// Environment variable naming the report file to write.
pub const OUTPUT_PATH_ENV: &str = "TRANSCRIPT_OUTPUT";
/// Environment variable naming the append-only log file.
pub const LOG_PATH_ENV: &str = "TRANSCRIPT_LOG_FILE";

/// Default report file name.
pub const DEFAULT_OUTPUT_PATH: &str = "transcript_report.xlsx";
/// Default log file name.
pub const DEFAULT_LOG_PATH: &str = "transcript_extract.log";

/// Configuration for one batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchConfig {
    /// Directory scanned for `*.pdf` transcripts.
    pub input_dir: PathBuf,
    /// Report file written at the end of the run.
    pub output_path: PathBuf,
    /// Append-only log file.
    pub log_path: PathBuf,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            log_path: PathBuf::from(DEFAULT_LOG_PATH),
        }
    }
}

impl BatchConfig {
    /// Builds a config from the `TRANSCRIPT_*` environment variables,
    /// falling back to defaults for any that are unset.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let path = |key: &str, default: PathBuf| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .map_or(default, PathBuf::from)
        };
        Self {
            input_dir: path(INPUT_DIR_ENV, defaults.input_dir),
            output_path: path(OUTPUT_PATH_ENV, defaults.output_path),
            log_path: path(LOG_PATH_ENV, defaults.log_path),
        }
    }

    /// Replaces each setting for which an override is given.
    #[must_use]
    pub fn with_overrides(
        mut self,
        input_dir: Option<PathBuf>,
        output_path: Option<PathBuf>,
        log_path: Option<PathBuf>,
    ) -> Self {
        if let Some(input_dir) = input_dir {
            self.input_dir = input_dir;
        }
        if let Some(output_path) = output_path {
            self.output_path = output_path;
        }
        if let Some(log_path) = log_path {
            self.log_path = log_path;
        }
        self
    }
}

/// Result of a completed batch run.
#[derive(Debug, Clone)]
pub struct BatchSummary {
    /// Number of `*.pdf` files found.
    pub discovered: usize,
    /// Number of documents that produced a report row.
    pub processed: usize,
    /// Number of documents skipped because their text could not be read.
    pub failed: usize,
    /// Course rows dropped as ambiguous or malformed, across all documents.
    pub rows_discarded: usize,
    /// Where the report was written.
    pub output_path: PathBuf,
    /// How long the run took.
    pub duration: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_variables_fall_back_to_defaults() {
        let config = BatchConfig::from_lookup(|_| None);
        assert_eq!(config, BatchConfig::default());
    }

    #[test]
    fn variables_override_defaults() {
        let config = BatchConfig::from_lookup(|key| match key {
            INPUT_DIR_ENV => Some("/data/transcripts".to_owned()),
            LOG_PATH_ENV => Some("   ".to_owned()),
            _ => None,
        });

        assert_eq!(config.input_dir, PathBuf::from("/data/transcripts"));
        assert_eq!(config.output_path, PathBuf::from(DEFAULT_OUTPUT_PATH));
        assert_eq!(config.log_path, PathBuf::from(DEFAULT_LOG_PATH));
    }

    #[test]
    fn explicit_overrides_win() {
        let config = BatchConfig::default().with_overrides(
            Some(PathBuf::from("in")),
            None,
            Some(PathBuf::from("run.log")),
        );

        assert_eq!(config.input_dir, PathBuf::from("in"));
        assert_eq!(config.output_path, PathBuf::from(DEFAULT_OUTPUT_PATH));
        assert_eq!(config.log_path, PathBuf::from("run.log"));
    }
}
