//! Move declared home paths into the store.
use std::io::ErrorKind;
use std::path::Path;

use walkdir::WalkDir;

use super::{Outcome, RunReport};
use crate::config::MigrateConfig;
use crate::error::{ConfigError, ConflictError, SafetyError};
use crate::ignore::IgnoreMatcher;
use crate::logging::Log;
use crate::resources::{RelocateResource, Resource, ResourceChange, ResourceState};
use crate::safety::{normalize_relative, to_slash};
use crate::store::Dotfiles;

/// Most files a real run moves. Running again moves the next batch.
pub const MAX_MIGRATIONS: usize = 100;

/// Most files a dry run reports, so a preview can show more than one batch.
pub const DRY_RUN_MAX_MIGRATIONS: usize = 1000;

/// Walks the paths declared in `migrate.yaml` and moves each file into the
/// store at the same home-relative path.
pub struct Migrator<'a> {
    dotfiles: &'a Dotfiles,
    config: MigrateConfig,
    ignore: IgnoreMatcher,
    log: &'a dyn Log,
}

impl std::fmt::Debug for Migrator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Migrator")
            .field("dotfiles", &self.dotfiles)
            .field("config", &self.config)
            .field("ignore", &self.ignore)
            .finish_non_exhaustive()
    }
}

impl<'a> Migrator<'a> {
    /// Build a migrator, compiling the ignore patterns up front.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] for a malformed ignore pattern.
    pub fn new(
        dotfiles: &'a Dotfiles,
        config: MigrateConfig,
        log: &'a dyn Log,
    ) -> Result<Self, ConfigError> {
        let ignore = IgnoreMatcher::new(&config.ignore)?;
        Ok(Self {
            dotfiles,
            config,
            ignore,
            log,
        })
    }

    /// Load `migrate.yaml` from the store and build a migrator.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or parsed, or an
    /// ignore pattern is malformed.
    pub fn load(dotfiles: &'a Dotfiles, log: &'a dyn Log) -> Result<Self, ConfigError> {
        let config = MigrateConfig::load(dotfiles.dir())?;
        Self::new(dotfiles, config, log)
    }

    /// The per-run ceiling in effect.
    #[must_use]
    pub const fn limit(&self) -> usize {
        if self.dotfiles.dry_run() {
            DRY_RUN_MAX_MIGRATIONS
        } else {
            MAX_MIGRATIONS
        }
    }

    /// Migrate every declared path and return the report.
    ///
    /// Per-file conflicts and failures are recorded, never raised; call
    /// [`RunReport::into_result`] to turn them into an error.
    #[must_use]
    pub fn run(&self) -> RunReport {
        let mut report = RunReport::new();
        self.log.info(&format!(
            "Attempting to migrate {} paths",
            self.config.paths.len()
        ));

        for spec in &self.config.paths {
            self.migrate_spec(spec, &mut report);
        }

        self.log_summary(&report);
        report
    }

    fn migrate_spec(&self, spec: &str, report: &mut RunReport) {
        let relative = match normalize_relative(spec) {
            Ok(rel) => rel,
            Err(e) => {
                report.fail(format!("failed to migrate '{spec}': {e}"));
                return;
            }
        };

        // A path listed in both `paths` and `ignore` is ignored.
        if self.ignore.is_ignored(&relative) {
            self.log
                .info(&format!("Skipping ignored file: {}", to_slash(&relative)));
            report.record(
                self.dotfiles.home_path(&relative),
                Outcome::Skipped("ignored".to_string()),
            );
            return;
        }

        let source = self.dotfiles.home_path(&relative);
        if self.dotfiles.contains(&source) {
            report.fail(format!(
                "failed to migrate '{spec}': {}",
                SafetyError::InsideStore { path: source }
            ));
            return;
        }

        match source.symlink_metadata() {
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.log
                    .info(&format!("Skipping {} (does not exist)", source.display()));
                report.record(source, Outcome::Skipped("does not exist".to_string()));
            }
            Err(e) => {
                let err = anyhow::Error::from(e)
                    .context(format!("failed to stat {}", source.display()));
                report.record(source, Outcome::Failed(err));
            }
            Ok(meta) if meta.is_dir() => self.migrate_dir(&source, report),
            Ok(_) => {
                let target = self.dotfiles.dot_path(&relative);
                self.migrate_candidate(&source, &target, report);
            }
        }
    }

    /// Walk a declared directory and migrate every file below it.
    fn migrate_dir(&self, root: &Path, report: &mut RunReport) {
        let home = self.dotfiles.home();
        let mut it = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        loop {
            let entry = match it.next() {
                None => break,
                Some(Ok(entry)) => entry,
                Some(Err(e)) => {
                    report.fail(format!("failed to walk dir {}: {e}", root.display()));
                    continue;
                }
            };
            let path = entry.path();
            let is_dir = entry.file_type().is_dir();

            if self.dotfiles.contains(path) {
                if is_dir {
                    it.skip_current_dir();
                }
                continue;
            }

            let Ok(relative) = path.strip_prefix(home) else {
                continue;
            };

            if self.ignore.is_ignored(relative) {
                self.log
                    .debug(&format!("Skipping ignored file: {}", to_slash(relative)));
                if is_dir {
                    it.skip_current_dir();
                }
                report.record(path.to_path_buf(), Outcome::Skipped("ignored".to_string()));
                continue;
            }

            if is_dir {
                continue;
            }

            let target = self.dotfiles.dot_path(relative);
            self.migrate_candidate(path, &target, report);
        }
    }

    /// Apply the ceiling, then migrate one file.
    fn migrate_candidate(&self, source: &Path, target: &Path, report: &mut RunReport) {
        let limit = self.limit();
        if report.changed.len() >= limit {
            if report.deferred == 0 {
                if self.dotfiles.dry_run() {
                    self.log
                        .info(&format!("Reached dry run migration limit of {limit} files."));
                } else {
                    self.log.info(&format!(
                        "Reached migration limit of {limit} files. Run again to migrate more."
                    ));
                }
            }
            report.record(source.to_path_buf(), Outcome::Deferred);
            return;
        }

        let outcome = self.migrate_file(source, target);
        report.record(source.to_path_buf(), outcome);
    }

    /// Move a single file from home into the store.
    ///
    /// Never overwrites: anything at `target`, a directory at `source`, or a
    /// foreign symlink at `source` is a conflict. A symlink from `source` to
    /// `target` means the file was already migrated.
    pub fn migrate_file(&self, source: &Path, target: &Path) -> Outcome {
        let resource = RelocateResource::new(source.to_path_buf(), target.to_path_buf());
        let critical = resource.is_critical();
        if critical {
            self.log.warn(&format!(
                "Migrating critical system file: {}",
                source.display()
            ));
        }

        let state = match resource.current_state() {
            Ok(state) => state,
            Err(e) => {
                return Outcome::Failed(
                    e.context(format!("failed to migrate {}", source.display())),
                );
            }
        };

        match state {
            ResourceState::Invalid { reason } => {
                self.log
                    .info(&format!("Skipping {} ({reason})", source.display()));
                Outcome::Skipped(reason)
            }
            ResourceState::Correct => {
                self.log.debug(&format!(
                    "Skipping existing dotfile symlink: {}",
                    resource.description()
                ));
                Outcome::AlreadyDone
            }
            ResourceState::Conflict { reason } => {
                let conflict = ConflictError::migrate(source, target, reason);
                self.log.debug(&conflict.headline());
                Outcome::Conflict(conflict)
            }
            ResourceState::Missing if self.dotfiles.dry_run() => {
                self.log.dry_run(&format!(
                    "Would migrate {} -> {}",
                    source.display(),
                    target.display()
                ));
                if critical {
                    self.log
                        .dry_run("This is a critical system file - ensure you have backups!");
                }
                Outcome::Applied { backup: None }
            }
            ResourceState::Missing => match resource.apply() {
                Ok(ResourceChange::Applied { backup }) => {
                    if let Some(path) = &backup {
                        self.log
                            .info(&format!("Created backup: {}", path.display()));
                    }
                    self.log.info(&format!(
                        "Migrated {} -> {}",
                        source.display(),
                        target.display()
                    ));
                    Outcome::Applied { backup }
                }
                Ok(ResourceChange::AlreadyCorrect) => Outcome::AlreadyDone,
                Err(e) => {
                    Outcome::Failed(e.context(format!("failed to migrate {}", source.display())))
                }
            },
        }
    }

    fn log_summary(&self, report: &RunReport) {
        let checked = report.changed.len();
        if self.dotfiles.dry_run() {
            self.log.stage("Dry run summary");
            self.log
                .info(&format!("Checked {checked} files for migration."));
            if checked > MAX_MIGRATIONS {
                self.log.info(&format!(
                    "NOTICE: On an actual migration, only the first {MAX_MIGRATIONS} files would be moved."
                ));
                self.log.info(&format!(
                    "You would need to run the command multiple times to migrate all {checked} files."
                ));
            } else {
                self.log.info(&format!(
                    "On an actual migration, {checked} files would be moved."
                ));
            }
        }

        self.log.info(&format!(
            "Migration complete: {checked} files migrated, {} files already migrated, {} file errors",
            report.already_ok,
            report.errors.len()
        ));
        if report.deferred > 0 {
            self.log.info(&format!(
                "{} files left for the next run",
                report.deferred
            ));
        }
    }
}
