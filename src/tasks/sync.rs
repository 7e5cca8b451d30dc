//! Link every store file back into home.
use std::ffi::OsStr;
use std::path::Path;

use walkdir::WalkDir;

use super::{Outcome, RunReport};
use crate::config::{CONFIG_FILE, DotfilesConfig, MIGRATE_FILE};
use crate::error::{ConfigError, ConflictError};
use crate::ignore::IgnoreMatcher;
use crate::lock::LOCK_FILE;
use crate::logging::Log;
use crate::resources::helpers::fs::link_destination;
use crate::resources::symlink::REASON_FOREIGN_LINK;
use crate::resources::{Resource, ResourceChange, ResourceState, SymlinkResource};
use crate::safety::{is_critical_file, to_slash};
use crate::store::{Dotfiles, GITIGNORE_FILE, README_FILE};

/// Top-level store entries that belong to the store itself and are never
/// linked into home.
pub const RESERVED_NAMES: &[&str] = &[
    ".git",
    GITIGNORE_FILE,
    CONFIG_FILE,
    MIGRATE_FILE,
    README_FILE,
    LOCK_FILE,
];

/// Walks the store and creates the matching symlinks in home.
pub struct Linker<'a> {
    dotfiles: &'a Dotfiles,
    ignore: IgnoreMatcher,
    log: &'a dyn Log,
}

impl std::fmt::Debug for Linker<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Linker")
            .field("dotfiles", &self.dotfiles)
            .field("ignore", &self.ignore)
            .finish_non_exhaustive()
    }
}

impl<'a> Linker<'a> {
    /// Build a linker from an already loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] for a malformed ignore pattern.
    pub fn new(
        dotfiles: &'a Dotfiles,
        config: &DotfilesConfig,
        log: &'a dyn Log,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            dotfiles,
            ignore: IgnoreMatcher::new(&config.ignore)?,
            log,
        })
    }

    /// Load `dotfiles.yaml` from the store and build a linker.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or parsed, or an
    /// ignore pattern is malformed.
    pub fn load(dotfiles: &'a Dotfiles, log: &'a dyn Log) -> Result<Self, ConfigError> {
        let config = DotfilesConfig::load(dotfiles.dir())?;
        Self::new(dotfiles, &config, log)
    }

    /// Link every eligible store file and return the report.
    #[must_use]
    pub fn run(&self) -> RunReport {
        let mut report = RunReport::new();
        let store = self.dotfiles.dir();
        let mut it = WalkDir::new(store)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        loop {
            let entry = match it.next() {
                None => break,
                Some(Ok(entry)) => entry,
                Some(Err(e)) => {
                    report.fail(format!("failed to walk dir {}: {e}", store.display()));
                    continue;
                }
            };
            let path = entry.path();
            let is_dir = entry.file_type().is_dir();
            let Ok(relative) = path.strip_prefix(store) else {
                continue;
            };

            if entry.depth() == 1 && is_reserved(entry.file_name()) {
                self.log
                    .debug(&format!("Skipping store file: {}", to_slash(relative)));
                if is_dir {
                    it.skip_current_dir();
                }
                continue;
            }

            if self.ignore.is_ignored(relative) {
                if is_dir {
                    it.skip_current_dir();
                } else {
                    self.log
                        .info(&format!("Skipping ignored file: {}", to_slash(relative)));
                }
                report.record(path.to_path_buf(), Outcome::Skipped("ignored".to_string()));
                continue;
            }

            if is_dir {
                continue;
            }

            let target = self.dotfiles.home_path(relative);
            let outcome = self.link_file(path, &target);
            report.record(target, outcome);
        }

        self.log
            .info(&format!("Sync complete: {}", report.summary(self.dotfiles.dry_run())));
        report
    }

    /// Create the symlink `target -> source`, never replacing anything.
    pub fn link_file(&self, source: &Path, target: &Path) -> Outcome {
        let resource = SymlinkResource::new(source.to_path_buf(), target.to_path_buf());
        let critical = is_critical_file(target);

        let state = match resource.current_state() {
            Ok(state) => state,
            Err(e) => {
                return Outcome::Failed(e.context(format!("failed to link {}", target.display())));
            }
        };

        match state {
            ResourceState::Invalid { reason } => Outcome::Skipped(reason),
            ResourceState::Correct => {
                self.log
                    .debug(&format!("Already linked: {}", resource.description()));
                Outcome::AlreadyDone
            }
            ResourceState::Conflict { reason } => {
                if reason == REASON_FOREIGN_LINK {
                    let existing = link_destination(target)
                        .map_or_else(|| "?".to_string(), |p| p.display().to_string());
                    self.log.warn(&format!(
                        "{} is an external symlink to {existing} (expected {})",
                        target.display(),
                        source.display()
                    ));
                    if self.dotfiles.dry_run() {
                        self.log.dry_run(&format!(
                            "Would request resolution to conflicting external symlink: {}",
                            target.display()
                        ));
                    }
                } else {
                    if critical {
                        self.log.warn(&format!(
                            "CRITICAL: {} exists and is not a symlink. This is a critical system file.",
                            target.display()
                        ));
                    }
                    if self.dotfiles.dry_run() {
                        self.log.dry_run(&format!(
                            "Would request resolution to conflicting existing file: {}",
                            target.display()
                        ));
                    }
                }
                Outcome::Conflict(ConflictError::link(source, target, reason))
            }
            ResourceState::Missing => {
                if critical {
                    self.log.warn(&format!(
                        "WARNING: {} is a critical system file. Proceed with caution.",
                        target.display()
                    ));
                }
                if self.dotfiles.dry_run() {
                    self.log.dry_run(&format!(
                        "Would create symlink: {} -> {}",
                        target.display(),
                        source.display()
                    ));
                    return Outcome::Applied { backup: None };
                }
                match resource.apply() {
                    Ok(ResourceChange::Applied { backup }) => {
                        self.log.info(&format!("Linked: {}", target.display()));
                        Outcome::Applied { backup }
                    }
                    Ok(ResourceChange::AlreadyCorrect) => Outcome::AlreadyDone,
                    Err(e) => {
                        Outcome::Failed(e.context(format!("failed to link {}", target.display())))
                    }
                }
            }
        }
    }
}

fn is_reserved(name: &OsStr) -> bool {
    RESERVED_NAMES.iter().any(|r| name == OsStr::new(r))
}
