//! The two walks that move and link files: [`Migrator`] and [`Linker`].
//!
//! Both wrap every file in a [`Resource`](crate::resources::Resource), map
//! its state to an [`Outcome`], and fold outcomes into a [`RunReport`].
pub mod migrate;
pub mod report;
pub mod sync;

pub use migrate::{DRY_RUN_MAX_MIGRATIONS, MAX_MIGRATIONS, Migrator};
pub use report::RunReport;
pub use sync::{Linker, RESERVED_NAMES};

use std::path::PathBuf;

use crate::error::ConflictError;

/// What happened to a single file.
///
/// # Examples
///
/// ```
/// use dotfiles_store::tasks::Outcome;
///
/// let done = Outcome::AlreadyDone;
/// let skipped = Outcome::Skipped("does not exist".into());
///
/// assert!(matches!(done, Outcome::AlreadyDone));
/// assert!(matches!(skipped, Outcome::Skipped(_)));
/// ```
#[derive(Debug)]
pub enum Outcome {
    /// The file was moved or linked (in a dry run: would be).
    Applied {
        /// Backup written before the change, if any.
        backup: Option<PathBuf>,
    },
    /// The file was already migrated or linked.
    AlreadyDone,
    /// Nothing to do for this file.
    Skipped(String),
    /// Left for a later run because the per-run ceiling was reached.
    Deferred,
    /// Something is in the way; nothing was touched.
    Conflict(ConflictError),
    /// An I/O or safety failure.
    Failed(anyhow::Error),
}
