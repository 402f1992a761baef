//! Logging setup: a full log file plus a terse console stream
//!
//! Both sinks are `env_logger` loggers; [`RunLogger`] routes each record
//! to the file and, for INFO (and DEBUG in debug mode), to stdout.

use crate::error::Result;
use env_logger::{Builder, Logger, Target, WriteStyle};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Logger writing to the run's log file and to the console
pub struct RunLogger {
    file: Logger,
    console: Logger,
    debug_mode: bool,
}

impl RunLogger {
    /// Build both sinks. The log file is truncated.
    ///
    /// # Errors
    /// Returns an error if the log file cannot be created.
    pub fn new(log_path: &Path, debug_mode: bool) -> Result<Self> {
        if let Some(parent) = log_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let log_file = File::create(log_path)?;

        let file = Builder::new()
            .filter_level(LevelFilter::Debug)
            .target(Target::Pipe(Box::new(log_file)))
            .write_style(WriteStyle::Never)
            .format(|buf, record| {
                writeln!(
                    buf,
                    "{} | {} | {}",
                    buf.timestamp_millis(),
                    record.level(),
                    record.args()
                )
            })
            .build();

        let console = Builder::new()
            .filter_level(LevelFilter::Debug)
            .target(Target::Stdout)
            .format(|buf, record| writeln!(buf, "{}", record.args()))
            .build();

        Ok(Self {
            file,
            console,
            debug_mode,
        })
    }

    /// Install as the global logger
    ///
    /// # Errors
    /// Returns an error if a global logger is already set.
    pub fn install(self) -> Result<()> {
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(LevelFilter::Debug);
        Ok(())
    }
}

/// Whether a record of `level` is shown on the console
#[must_use]
pub const fn shows_on_console(level: Level, debug_mode: bool) -> bool {
    matches!(level, Level::Info) || (debug_mode && matches!(level, Level::Debug))
}

impl Log for RunLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.file.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        self.file.log(record);
        if shows_on_console(record.level(), self.debug_mode) {
            self.console.log(record);
        }
    }

    fn flush(&self) {
        self.file.flush();
        self.console.flush();
    }
}

/// Create the log file and install the run logger
///
/// # Errors
/// Returns an error if the log file cannot be created or a logger is already installed.
pub fn init(log_path: &Path, debug_mode: bool) -> Result<()> {
    RunLogger::new(log_path, debug_mode)?.install()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_console_levels() {
        assert!(shows_on_console(Level::Info, false));
        assert!(!shows_on_console(Level::Warn, false));
        assert!(!shows_on_console(Level::Error, false));
        assert!(!shows_on_console(Level::Debug, false));
        assert!(shows_on_console(Level::Debug, true));
        assert!(!shows_on_console(Level::Trace, true));
    }

    #[test]
    fn test_file_sink_receives_warnings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("log.txt");
        let logger = RunLogger::new(&path, false).unwrap();

        logger.log(
            &Record::builder()
                .level(Level::Warn)
                .args(format_args!("Skipping - No email(s) found in field: x"))
                .build(),
        );
        logger.flush();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("| WARN | Skipping - No email(s) found in field: x"));
    }
}
