//! Migrate command implementation.
use anyhow::Result;

use crate::cli::{GlobalOpts, MigrateOpts};
use crate::config::{ConfigValidator as _, MigrateConfig};
use crate::logging::Logger;
use crate::tasks::Migrator;

const PROMPT: &str = "This will MIGRATE your dotfiles (NOT a dry run). Continue?";

/// Run the migrate command.
///
/// # Errors
///
/// Returns an error if the store is not initialised, `migrate.yaml` cannot be
/// loaded, the store is locked, or any file failed to migrate.
pub fn run(global: &GlobalOpts, opts: &MigrateOpts, log: &Logger) -> Result<()> {
    let dotfiles = super::open_initialised(global)?;

    log.stage("Loading configuration");
    let config = MigrateConfig::load(dotfiles.dir())?;
    log.debug(&format!(
        "{} paths, {} ignore patterns",
        config.paths.len(),
        config.ignore.len()
    ));
    super::report_warnings(&config.validate(), log);
    let migrator = Migrator::new(&dotfiles, config, log)?;

    if !super::confirmed(&dotfiles, opts.yes, PROMPT, log) {
        return Ok(());
    }

    log.stage("Migrating declared config files to ~/.dotfiles ...");
    super::run_to_completion(&dotfiles, "migration", || migrator.run(), log)?;

    if !dotfiles.dry_run() {
        log.info("Migration complete!");
    }
    log.print_log_location();
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::exec::test_helpers::MockExecutor;
    use crate::logging::{MemoryLog, isolated_logger};
    use crate::store::Dotfiles;
    use std::fs;
    use std::path::Path;

    fn init_home(home: &Path, paths: &[&str]) {
        let dotfiles = Dotfiles::with_home(home);
        dotfiles
            .init(&MockExecutor::ok("").with_which(false), &MemoryLog::new())
            .unwrap();
        let mut config = MigrateConfig::initial();
        config.paths = paths.iter().map(ToString::to_string).collect();
        config.save(dotfiles.dir()).unwrap();
    }

    fn global(home: &Path, dry_run: bool) -> GlobalOpts {
        GlobalOpts {
            dry_run,
            home: Some(home.to_path_buf()),
        }
    }

    #[test]
    fn migrates_with_yes() {
        let (log, _logs, _guard) = isolated_logger();
        let tmp = tempfile::tempdir().unwrap();
        init_home(tmp.path(), &["/.vimrc"]);
        fs::write(tmp.path().join(".vimrc"), "set nu").unwrap();

        run(&global(tmp.path(), false), &MigrateOpts { yes: true }, &log).unwrap();

        assert!(tmp.path().join(".dotfiles/.vimrc").is_file());
        assert!(!tmp.path().join(".vimrc").exists());
        let written = fs::read_to_string(log.log_path().unwrap()).unwrap();
        assert!(written.contains("Migration complete!"));
    }

    #[test]
    fn dry_run_needs_no_confirmation_and_moves_nothing() {
        let (log, _logs, _guard) = isolated_logger();
        let tmp = tempfile::tempdir().unwrap();
        init_home(tmp.path(), &["/.vimrc"]);
        fs::write(tmp.path().join(".vimrc"), "set nu").unwrap();

        run(&global(tmp.path(), true), &MigrateOpts::default(), &log).unwrap();

        assert!(tmp.path().join(".vimrc").is_file());
        assert!(!tmp.path().join(".dotfiles/.vimrc").exists());
    }

    #[test]
    fn uninitialised_store_is_an_error() {
        let (log, _logs, _guard) = isolated_logger();
        let tmp = tempfile::tempdir().unwrap();
        let err = run(&global(tmp.path(), true), &MigrateOpts::default(), &log).unwrap_err();
        assert!(err.to_string().contains("not initialised"));
    }

    #[test]
    fn conflict_fails_the_command() {
        let (log, _logs, _guard) = isolated_logger();
        let tmp = tempfile::tempdir().unwrap();
        init_home(tmp.path(), &["/.vimrc"]);
        fs::write(tmp.path().join(".vimrc"), "home").unwrap();
        fs::write(tmp.path().join(".dotfiles/.vimrc"), "store").unwrap();

        let err = run(&global(tmp.path(), false), &MigrateOpts { yes: true }, &log).unwrap_err();

        assert!(err.to_string().starts_with("migration finished with 1 error(s):"));
        assert_eq!(fs::read_to_string(tmp.path().join(".vimrc")).unwrap(), "home");
    }
}
