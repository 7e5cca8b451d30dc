//! Console and file logger backed by `tracing`.
use std::path::{Path, PathBuf};

use super::types::Log;
use super::utils::log_file_path;

/// Implement the methods of [`Log`] by delegating to inherent methods of the
/// same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Structured logger with dry-run awareness.
///
/// All messages are always written to a persistent log file at
/// `$XDG_CACHE_HOME/dotfiles/<command>.log` (default `~/.cache/dotfiles/<command>.log`)
/// with timestamps and ANSI codes stripped, regardless of the verbose flag.
#[derive(Debug)]
pub struct Logger {
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger.
    ///
    /// Stores the log file path for display at the end of a run. The file
    /// itself is created by [`init_subscriber`](super::subscriber::init_subscriber);
    /// this constructor does not write to it.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self {
            log_file: log_file_path(command),
        }
    }

    /// Create a logger that reports `path` as its log file.
    #[cfg(test)]
    pub(crate) const fn with_log_file(path: PathBuf) -> Self {
        Self {
            log_file: Some(path),
        }
    }

    /// Return the log file path, if available.
    #[must_use]
    pub fn log_path(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    /// Print where the full log of this run can be found.
    pub fn print_log_location(&self) {
        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: "dotfiles::stage", "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose; always
    /// written to the log file via the [`FileLayer`](super::subscriber::FileLayer)).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: "dotfiles::dry_run", "{msg}");
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logging::isolated_logger;
    use std::fs;

    fn read_log(log: &Logger) -> String {
        fs::read_to_string(log.log_path().expect("log path")).expect("read log")
    }

    #[test]
    fn log_path_is_named_after_command() {
        let log = Logger::new("migrate");
        if let Some(path) = log.log_path() {
            assert!(path.ends_with("dotfiles/migrate.log"), "got {}", path.display());
        }
    }

    #[test]
    fn isolated_log_path() {
        let (log, _tmp, _guard) = isolated_logger();
        let path = log.log_path().expect("log path");
        assert!(path.ends_with("test.log"), "got {}", path.display());
    }

    #[test]
    fn stage_writes_arrow_prefix() {
        let (log, _tmp, _guard) = isolated_logger();
        log.stage("Migrating dotfiles");
        assert!(read_log(&log).contains("==> Migrating dotfiles"));
    }

    #[test]
    fn levels_are_tagged_in_file() {
        let (log, _tmp, _guard) = isolated_logger();
        log.warn("careful");
        log.error("broken");
        log.debug("details");
        log.dry_run("would migrate .vimrc");
        let content = read_log(&log);
        assert!(content.contains("[warn] careful"));
        assert!(content.contains("[error] broken"));
        assert!(content.contains("[debug] details"));
        assert!(content.contains("[dry run] would migrate .vimrc"));
    }

    #[test]
    fn ansi_codes_are_stripped_in_file() {
        let (log, _tmp, _guard) = isolated_logger();
        log.info("\x1b[32mgreen\x1b[0m");
        let content = read_log(&log);
        assert!(content.contains("green"));
        assert!(!content.contains("\x1b["));
    }

    #[test]
    fn log_location_is_written() {
        let (log, _tmp, _guard) = isolated_logger();
        log.print_log_location();
        assert!(read_log(&log).contains("log: "));
    }
}
