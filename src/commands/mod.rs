//! Subcommand handlers and the setup they share.
pub mod init;
pub mod migrate;
pub mod sync;
pub mod version;

use anyhow::Result;
use std::path::{Path, PathBuf};

use crate::cli::GlobalOpts;
use crate::config::ValidationWarning;
use crate::error::StoreError;
use crate::lock::StoreLock;
use crate::logging::Log;
use crate::store::Dotfiles;
use crate::tasks::RunReport;

/// Build the [`Dotfiles`] context from the global options.
///
/// `--home` (or `DOTFILES_HOME`) replaces the user's home directory.
///
/// # Errors
///
/// Returns [`StoreError::HomeNotFound`] if no override is given and the home
/// directory cannot be determined.
pub fn resolve_store(global: &GlobalOpts) -> Result<Dotfiles, StoreError> {
    let dotfiles = match &global.home {
        Some(home) => Dotfiles::with_home(absolute(home)),
        None => Dotfiles::new()?,
    };
    Ok(dotfiles.with_dry_run(global.dry_run))
}

/// Resolve the store and require that `init` has run.
///
/// # Errors
///
/// Returns [`StoreError::NotInitialised`] if the store has no `dotfiles.yaml`.
pub fn open_initialised(global: &GlobalOpts) -> Result<Dotfiles, StoreError> {
    let dotfiles = resolve_store(global)?;
    dotfiles.require_initialised()?;
    Ok(dotfiles)
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Print configuration warnings. Warnings never stop a run.
pub fn report_warnings(warnings: &[ValidationWarning], log: &dyn Log) {
    if warnings.is_empty() {
        return;
    }
    log.warn(&format!(
        "found {} configuration warning(s):",
        warnings.len()
    ));
    for warning in warnings {
        log.warn(&format!("  {warning}"));
    }
}

/// Ask a yes/no question on the terminal. Anything but an explicit yes,
/// including a missing TTY, is a no.
#[must_use]
pub fn confirm(prompt: &str) -> bool {
    dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .unwrap_or(false)
}

/// Whether a mutating run may go ahead: dry runs and `--yes` skip the prompt.
pub fn confirmed(dotfiles: &Dotfiles, yes: bool, prompt: &str, log: &dyn Log) -> bool {
    if dotfiles.dry_run() || yes {
        return true;
    }
    if confirm(prompt) {
        return true;
    }
    log.info("Aborted, nothing was changed.");
    false
}

/// Run a store walk under the store lock and turn its report into a result.
///
/// The lock is only taken for real runs; a dry run never writes to the store.
///
/// # Errors
///
/// Returns an error if the lock is held by another process, or if the walk
/// recorded any conflict or failure.
pub fn run_to_completion(
    dotfiles: &Dotfiles,
    operation: &'static str,
    walk: impl FnOnce() -> RunReport,
    log: &dyn Log,
) -> Result<RunReport> {
    let _lock = if dotfiles.dry_run() {
        None
    } else {
        Some(StoreLock::acquire(dotfiles.dir())?)
    };

    let report = walk();
    log.debug(&format!(
        "{operation}: {}",
        report.summary(dotfiles.dry_run())
    ));
    Ok(report.into_result(operation)?)
}
