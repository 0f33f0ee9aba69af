#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared CLI utilities for the transcript metrics toolchain.
//!
//! Provides an `indicatif`-backed progress bar behind the
//! [`ProgressCallback`] trait, plus [`init_logger`] which sets up
//! `indicatif-log-bridge` so that `log::info!` and friends are suspended
//! while progress bars redraw. Every record that reaches the terminal is
//! also appended to a plain-text journal file when one is given.

use std::fs::{File, OpenOptions};
use std::io::{self, Write as _};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use log::LevelFilter;
use transcript_metrics_ingest_models::progress::ProgressCallback;

pub use indicatif::MultiProgress;

/// Timestamp layout of journal lines, e.g. `2024-05-01 13:45:10,123`.
pub const JOURNAL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// An `indicatif` [`ProgressBar`] that implements [`ProgressCallback`].
pub struct IndicatifProgress {
    bar: ProgressBar,
    /// Style to switch to once `set_total()` provides a known length.
    bar_style: ProgressStyle,
}

impl IndicatifProgress {
    /// Creates a progress bar for per-document progress. Starts as a
    /// spinner while the input directory is scanned and becomes a full bar
    /// once [`ProgressCallback::set_total()`] is called.
    #[must_use]
    pub fn documents_bar(multi: &MultiProgress, message: &str) -> Arc<dyn ProgressCallback> {
        let bar = multi.add(ProgressBar::new_spinner());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());

        let bar_style = ProgressStyle::with_template(
            "  {msg} {wide_bar:.cyan/dim} {pos}/{len} {percent}% [{eta}]",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");

        Arc::new(Self { bar, bar_style })
    }
}

impl ProgressCallback for IndicatifProgress {
    fn set_total(&self, total: u64) {
        self.bar.set_length(total);
        self.bar.set_position(0);
        self.bar.set_style(self.bar_style.clone());
    }

    fn inc(&self, delta: u64) {
        self.bar.inc(delta);
    }

    fn set_message(&self, msg: String) {
        self.bar.set_message(msg);
    }

    fn finish(&self, msg: String) {
        self.bar.finish_with_message(msg);
    }
}

/// Formats one journal line: `<timestamp> - <LEVEL> - <message>`.
#[must_use]
pub fn journal_line(
    timestamp: chrono::DateTime<chrono::Local>,
    level: log::Level,
    message: &std::fmt::Arguments<'_>,
) -> String {
    format!(
        "{} - {} - {message}",
        timestamp.format(JOURNAL_TIMESTAMP_FORMAT),
        level_name(level)
    )
}

const fn level_name(level: log::Level) -> &'static str {
    match level {
        log::Level::Error => "ERROR",
        log::Level::Warn => "WARNING",
        log::Level::Info => "INFO",
        log::Level::Debug => "DEBUG",
        log::Level::Trace => "TRACE",
    }
}

/// Logger that forwards to `inner` and appends every enabled record to a
/// journal file.
pub struct JournalLogger<L: log::Log> {
    inner: L,
    journal: Option<Mutex<File>>,
}

impl<L: log::Log> JournalLogger<L> {
    /// Wraps `inner`, appending to the file at `journal` if given.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the journal file cannot be opened for
    /// appending.
    pub fn new(inner: L, journal: Option<&Path>) -> io::Result<Self> {
        let journal = journal
            .map(|path| OpenOptions::new().create(true).append(true).open(path))
            .transpose()?
            .map(Mutex::new);
        Ok(Self { inner, journal })
    }
}

impl<L: log::Log> log::Log for JournalLogger<L> {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        self.inner.enabled(metadata)
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.inner.enabled(record.metadata()) {
            return;
        }
        self.inner.log(record);

        let Some(journal) = &self.journal else {
            return;
        };
        if let Ok(mut file) = journal.lock() {
            let line = journal_line(chrono::Local::now(), record.level(), record.args());
            let _ = writeln!(file, "{line}");
        }
    }

    fn flush(&self) {
        self.inner.flush();
        if let Some(Ok(mut file)) = self.journal.as_ref().map(Mutex::lock) {
            let _ = file.flush();
        }
    }
}

/// Initializes the global logger wrapped in `indicatif-log-bridge` so that
/// `log::info!` and friends are suspended while progress bars redraw.
///
/// Logs at `info` unless `RUST_LOG` says otherwise. When `journal` is
/// given, every emitted record is also appended to that file.
///
/// Returns the [`MultiProgress`] that all progress bars must be added to.
///
/// # Errors
///
/// Returns an I/O error if the journal file cannot be opened.
pub fn init_logger(journal: Option<&Path>) -> io::Result<MultiProgress> {
    let multi = MultiProgress::new();

    // Build the pretty-env-logger logger manually so we can wrap it.
    let logger = pretty_env_logger::formatted_builder()
        .filter_level(LevelFilter::Info)
        .parse_env("RUST_LOG")
        .build();
    let level = logger.filter();
    let logger = JournalLogger::new(logger, journal)?;

    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok(); // Ignore error if logger was already set (e.g., in tests)

    log::set_max_level(level);

    Ok(multi)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;
    use log::Log as _;

    use super::*;

    struct AcceptUpTo(LevelFilter);

    impl log::Log for AcceptUpTo {
        fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
            metadata.level() <= self.0
        }
        fn log(&self, _record: &log::Record<'_>) {}
        fn flush(&self) {}
    }

    fn emit(logger: &impl log::Log, level: log::Level, message: &str) {
        logger.log(
            &log::Record::builder()
                .level(level)
                .args(format_args!("{message}"))
                .build(),
        );
    }

    #[test]
    fn journal_line_layout() {
        let timestamp = chrono::Local
            .with_ymd_and_hms(2024, 5, 1, 13, 45, 10)
            .unwrap();
        let line = journal_line(
            timestamp,
            log::Level::Warn,
            &format_args!("[a.pdf] discarding course row"),
        );

        assert_eq!(
            line,
            "2024-05-01 13:45:10,000 - WARNING - [a.pdf] discarding course row"
        );
    }

    #[test]
    fn journal_appends_enabled_records_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");
        std::fs::write(&path, "earlier run\n").unwrap();

        let logger = JournalLogger::new(AcceptUpTo(LevelFilter::Info), Some(&path)).unwrap();
        emit(&logger, log::Level::Info, "processed");
        emit(&logger, log::Level::Debug, "noise");
        emit(&logger, log::Level::Error, "failed");
        logger.flush();

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = written.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "earlier run");
        assert!(lines[1].ends_with(" - INFO - processed"));
        assert!(lines[2].ends_with(" - ERROR - failed"));
    }

    #[test]
    fn no_journal_only_forwards() {
        let logger = JournalLogger::new(AcceptUpTo(LevelFilter::Warn), None).unwrap();
        assert!(logger.enabled(&log::Metadata::builder().level(log::Level::Error).build()));
        assert!(!logger.enabled(&log::Metadata::builder().level(log::Level::Info).build()));
        emit(&logger, log::Level::Error, "ignored");
    }
}
