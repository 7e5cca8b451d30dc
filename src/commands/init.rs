//! Init command implementation.
use anyhow::Result;
use std::path::Path;

use crate::cli::{GlobalOpts, InitOpts};
use crate::exec::SystemExecutor;
use crate::logging::Logger;
use crate::store::InitOutcome;

/// Run the init command.
///
/// # Errors
///
/// Returns an error if the store already exists, its path is unusable, or
/// any file cannot be created.
pub fn run(global: &GlobalOpts, _opts: &InitOpts, log: &Logger) -> Result<()> {
    let dotfiles = super::resolve_store(global)?;

    log.stage("Initializing dotfiles...");
    let outcome = dotfiles.init(&SystemExecutor, log)?;

    if dotfiles.dry_run() {
        return Ok(());
    }

    log.stage("Next steps:");
    for step in next_steps(dotfiles.dir(), outcome) {
        log.info(&step);
    }
    log.print_log_location();
    Ok(())
}

/// Steps printed after a successful init.
fn next_steps(dir: &Path, outcome: InitOutcome) -> Vec<String> {
    let commit = if outcome.git_initialised {
        "4. git add . && git commit -m 'Initial dotfiles'"
    } else {
        "4. git init && git add . && git commit -m 'Initial dotfiles'"
    };
    vec![
        format!("1. Edit {} with your files", dir.join(crate::config::MIGRATE_FILE).display()),
        "2. dotfiles migrate".to_string(),
        format!("3. cd {}", dir.display()),
        commit.to_string(),
    ]
}
