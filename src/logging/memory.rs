//! In-memory log capture.
use std::sync::Mutex;

use super::types::Log;

/// Severity of a captured entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// A stage header.
    Stage,
    /// An informational line.
    Info,
    /// A debug line.
    Debug,
    /// A warning.
    Warn,
    /// An error.
    Error,
    /// A dry-run action.
    DryRun,
}

/// A single captured log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Severity.
    pub level: Level,
    /// Message text as logged.
    pub message: String,
}

impl LogEntry {
    /// Replay this entry through `tracing`, exactly as [`Logger`](super::Logger)
    /// would have emitted it.
    pub fn replay(&self) {
        let msg = &self.message;
        match self.level {
            Level::Stage => tracing::info!(target: "dotfiles::stage", "{msg}"),
            Level::Info => tracing::info!("{msg}"),
            Level::Debug => tracing::debug!("{msg}"),
            Level::Warn => tracing::warn!("{msg}"),
            Level::Error => tracing::error!("{msg}"),
            Level::DryRun => tracing::info!(target: "dotfiles::dry_run", "{msg}"),
        }
    }
}

/// [`Log`] backend that keeps every message in memory.
///
/// Used wherever output has to be inspected after the fact instead of
/// going straight to the console.
#[derive(Debug, Default)]
pub struct MemoryLog {
    entries: Mutex<Vec<LogEntry>>,
}

macro_rules! capture_log_methods {
    ($($method:ident => $level:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.push(Level::$level, msg);
            }
        )+
    };
}

impl MemoryLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, level: Level, msg: &str) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.push(LogEntry {
                level,
                message: msg.to_string(),
            });
        }
    }

    /// Return a copy of every captured entry in order.
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Return the messages captured at `level`.
    #[must_use]
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|e| e.level == level)
            .map(|e| e.message)
            .collect()
    }

    /// Return `true` if any entry at `level` contains `needle`.
    #[must_use]
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.messages(level).iter().any(|m| m.contains(needle))
    }

    /// Replay every captured entry through `tracing`.
    pub fn replay(&self) {
        for entry in &self.entries() {
            entry.replay();
        }
    }
}

impl Log for MemoryLog {
    capture_log_methods!(
        stage => Stage,
        info => Info,
        debug => Debug,
        warn => Warn,
        error => Error,
        dry_run => DryRun,
    );
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn captures_in_order() {
        let log = MemoryLog::new();
        log.stage("Migrating");
        log.warn("careful");
        log.dry_run("would migrate");
        let entries = log.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].level, Level::Stage);
        assert_eq!(entries[1].message, "careful");
        assert_eq!(entries[2].level, Level::DryRun);
    }

    #[test]
    fn filters_by_level() {
        let log = MemoryLog::new();
        log.info("one");
        log.error("two");
        log.info("three");
        assert_eq!(log.messages(Level::Info), vec!["one", "three"]);
        assert!(log.contains(Level::Error, "tw"));
        assert!(!log.contains(Level::Warn, "two"));
    }

    #[test]
    fn replay_without_subscriber_is_harmless() {
        let log = MemoryLog::new();
        log.debug("quiet");
        log.replay();
        assert_eq!(log.entries().len(), 1);
    }
}
