//! Accumulated result of a migrate or sync run.
use std::path::{Path, PathBuf};

use super::Outcome;
use crate::error::RunError;

/// Per-run tally of outcomes.
///
/// Created fresh for each run, filled in while walking, and read once at
/// the end. Conflicts and failures never stop the walk; they are collected
/// here and turned into a single [`RunError`] by [`into_result`](Self::into_result).
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use dotfiles_store::tasks::{Outcome, RunReport};
///
/// let mut report = RunReport::new();
/// report.record(PathBuf::from("/home/u/.vimrc"), Outcome::Applied { backup: None });
/// report.record(PathBuf::from("/home/u/.zshrc"), Outcome::AlreadyDone);
///
/// assert_eq!(report.summary(false), "1 changed, 1 already ok");
/// assert_eq!(report.summary(true), "1 would change, 1 already ok");
/// ```
#[derive(Debug, Default)]
pub struct RunReport {
    /// Paths that were changed (or would be, in a dry run), in order.
    pub changed: Vec<PathBuf>,
    /// Paths already in the desired state.
    pub already_ok: usize,
    /// Paths skipped (ignored, missing, nothing to do).
    pub skipped: usize,
    /// Paths left for a later run because the per-run ceiling was reached.
    pub deferred: usize,
    /// Rendered conflicts and failures, in processing order.
    pub errors: Vec<String>,
}

impl RunReport {
    /// Create an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one outcome for `path` into the report.
    pub fn record(&mut self, path: PathBuf, outcome: Outcome) {
        match outcome {
            Outcome::Applied { .. } => self.changed.push(path),
            Outcome::AlreadyDone => self.already_ok += 1,
            Outcome::Skipped(_) => self.skipped += 1,
            Outcome::Deferred => self.deferred += 1,
            Outcome::Conflict(e) => self.errors.push(e.to_string()),
            Outcome::Failed(e) => self.errors.push(format!("{e:#}")),
        }
    }

    /// Record an error that is not tied to a single file outcome.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Whether `path` was changed in this run.
    #[must_use]
    pub fn changed_path(&self, path: &Path) -> bool {
        self.changed.iter().any(|p| p == path)
    }

    /// Whether the run recorded no errors.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Format the summary string (e.g. "3 changed, 10 already ok, 1 skipped").
    ///
    /// Zero skipped, deferred and error counts are left out.
    #[must_use]
    pub fn summary(&self, dry_run: bool) -> String {
        let verb = if dry_run { "would change" } else { "changed" };
        let mut out = format!("{} {verb}, {} already ok", self.changed.len(), self.already_ok);
        if self.skipped > 0 {
            out.push_str(&format!(", {} skipped", self.skipped));
        }
        if self.deferred > 0 {
            out.push_str(&format!(", {} deferred", self.deferred));
        }
        if !self.errors.is_empty() {
            out.push_str(&format!(", {} error(s)", self.errors.len()));
        }
        out
    }

    /// Succeed with the report, or fail with every recorded error.
    ///
    /// # Errors
    ///
    /// Returns [`RunError::Failed`] if any error was recorded.
    pub fn into_result(self, operation: &'static str) -> Result<Self, RunError> {
        if self.errors.is_empty() {
            Ok(self)
        } else {
            Err(RunError::Failed {
                operation,
                errors: self.errors,
            })
        }
    }
}
