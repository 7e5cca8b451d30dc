//! Sync command implementation.
use anyhow::Result;

use crate::cli::{GlobalOpts, SyncOpts};
use crate::config::{ConfigValidator as _, DotfilesConfig};
use crate::logging::Logger;
use crate::tasks::Linker;

const PROMPT: &str = "This will SYNC your dotfiles (NOT a dry run). Continue?";

/// Run the sync command.
///
/// # Errors
///
/// Returns an error if the store is not initialised, `dotfiles.yaml` cannot
/// be loaded, the store is locked, or any file failed to link.
pub fn run(global: &GlobalOpts, opts: &SyncOpts, log: &Logger) -> Result<()> {
    let dotfiles = super::open_initialised(global)?;

    log.stage("Loading configuration");
    let config = DotfilesConfig::load(dotfiles.dir())?;
    super::report_warnings(&config.validate(), log);
    let linker = Linker::new(&dotfiles, &config, log)?;

    if !super::confirmed(&dotfiles, opts.yes, PROMPT, log) {
        return Ok(());
    }

    log.stage("Syncing dotfiles...");
    super::run_to_completion(&dotfiles, "sync", || linker.run(), log)?;

    if !dotfiles.dry_run() {
        log.info("Sync complete!");
    }
    log.print_log_location();
    Ok(())
}

#[cfg(test)]
#[cfg(unix)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::exec::test_helpers::MockExecutor;
    use crate::logging::{MemoryLog, isolated_logger};
    use crate::store::Dotfiles;
    use std::fs;
    use std::path::Path;

    fn init_home(home: &Path) {
        Dotfiles::with_home(home)
            .init(&MockExecutor::ok("").with_which(false), &MemoryLog::new())
            .unwrap();
    }

    fn global(home: &Path, dry_run: bool) -> GlobalOpts {
        GlobalOpts {
            dry_run,
            home: Some(home.to_path_buf()),
        }
    }

    #[test]
    fn links_store_files_into_home() {
        let (log, _logs, _guard) = isolated_logger();
        let tmp = tempfile::tempdir().unwrap();
        init_home(tmp.path());
        fs::write(tmp.path().join(".dotfiles/.vimrc"), "set nu").unwrap();

        run(&global(tmp.path(), false), &SyncOpts { yes: true }, &log).unwrap();

        assert_eq!(
            fs::read_link(tmp.path().join(".vimrc")).unwrap(),
            tmp.path().join(".dotfiles/.vimrc")
        );
        // scaffolding stays in the store
        assert!(tmp.path().join("dotfiles.yaml").symlink_metadata().is_err());
        assert!(tmp.path().join("README.md").symlink_metadata().is_err());
    }

    #[test]
    fn dry_run_links_nothing() {
        let (log, _logs, _guard) = isolated_logger();
        let tmp = tempfile::tempdir().unwrap();
        init_home(tmp.path());
        fs::write(tmp.path().join(".dotfiles/.vimrc"), "set nu").unwrap();

        run(&global(tmp.path(), true), &SyncOpts::default(), &log).unwrap();

        assert!(tmp.path().join(".vimrc").symlink_metadata().is_err());
    }

    #[test]
    fn existing_file_fails_the_command() {
        let (log, _logs, _guard) = isolated_logger();
        let tmp = tempfile::tempdir().unwrap();
        init_home(tmp.path());
        fs::write(tmp.path().join(".dotfiles/.vimrc"), "store").unwrap();
        fs::write(tmp.path().join(".vimrc"), "home").unwrap();

        let err = run(&global(tmp.path(), false), &SyncOpts { yes: true }, &log).unwrap_err();

        assert!(err.to_string().contains("file exists and is not a symlink"));
        assert_eq!(fs::read_to_string(tmp.path().join(".vimrc")).unwrap(), "home");
    }
}
