//! Per-run counters for skipped records and produced output
//!
//! The caller owns a [`RunReport`], lends it to the extraction and
//! parsing stages, and reads it back for the end-of-run summary.

use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::path::Path;

/// Kind of soft failure recorded in the report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// A message had no (or an empty) requested header
    EmptyHeader,
    /// A header string contained no email address
    NoEmail,
    /// Neither `From` nor `To` was requested
    NothingRequested,
}

/// Counters accumulated during one run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Messages read from the mailbox
    pub messages_read: u64,
    /// Raw header strings handed to the parser
    pub fields_extracted: u64,
    /// Message headers skipped because they were absent or empty
    pub headers_skipped: u64,
    /// Header strings dropped because no email was found in them
    pub fields_skipped: u64,
    /// Other warnings (e.g. every field kind omitted)
    pub other_warnings: u64,
    /// Contact records written to the outputs
    pub contacts_written: u64,
}

impl RunReport {
    /// Create an empty report
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Log a soft failure and count it
    pub fn warn(&mut self, skip: Skip, message: impl Display) {
        warn!("{message}");
        match skip {
            Skip::EmptyHeader => self.headers_skipped += 1,
            Skip::NoEmail => self.fields_skipped += 1,
            Skip::NothingRequested => self.other_warnings += 1,
        }
    }

    /// Total number of warnings logged through this report
    #[must_use]
    pub const fn warnings(&self) -> u64 {
        self.headers_skipped + self.fields_skipped + self.other_warnings
    }

    /// Summary line pointing at the log file, if anything was skipped
    #[must_use]
    pub fn summary(&self, log_path: &Path) -> Option<String> {
        let warnings = self.warnings();
        if warnings == 0 {
            return None;
        }

        let log_path = std::path::absolute(log_path).unwrap_or_else(|_| log_path.to_path_buf());
        Some(format!(
            "{warnings} warnings found! Please check the log file to avoid missing potential contacts: {}.",
            log_path.display()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_new() {
        let report = RunReport::new();
        assert_eq!(report.warnings(), 0);
        assert_eq!(report.contacts_written, 0);
    }

    #[test]
    fn test_warn_counts_by_kind() {
        let mut report = RunReport::new();
        report.warn(Skip::NoEmail, "Skipping - No email(s) found in field: nobody");
        report.warn(Skip::NoEmail, "Skipping - No email(s) found in field: ???");
        report.warn(Skip::EmptyHeader, "skipping mbox message - empty 'To:'");

        assert_eq!(report.fields_skipped, 2);
        assert_eq!(report.headers_skipped, 1);
        assert_eq!(report.other_warnings, 0);
        assert_eq!(report.warnings(), 3);
    }

    #[test]
    fn test_summary() {
        let mut report = RunReport::new();
        assert_eq!(report.summary(Path::new("log.txt")), None);

        report.warn(Skip::NothingRequested, "nothing requested");
        let summary = report.summary(Path::new("log.txt")).unwrap();
        assert!(summary.starts_with("1 warnings found!"));
        assert!(summary.ends_with("log.txt."));
    }
}
