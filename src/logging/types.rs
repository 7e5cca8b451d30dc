//! The [`Log`] trait shared by every logging backend.

/// Abstraction over logging backends.
///
/// Both [`Logger`](super::logger::Logger) (tracing output) and
/// [`MemoryLog`](super::memory::MemoryLog) (in-memory capture) implement
/// this trait, so migrate and sync report progress without printing
/// directly.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
}
