//! The managed store: where it lives, whether it is initialised, and how to
//! scaffold a new one.
use anyhow::{Context as _, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::config::{CONFIG_FILE, DotfilesConfig, MIGRATE_FILE, MigrateConfig};
use crate::error::StoreError;
use crate::exec::Executor;
use crate::logging::Log;
use crate::safety::check_path_safety;

/// Name of the store directory inside home.
pub const STORE_DIR: &str = ".dotfiles";

/// Name of the generated `.gitignore`.
pub const GITIGNORE_FILE: &str = ".gitignore";

/// Name of the generated README.
pub const README_FILE: &str = "README.md";

const README_TEMPLATE: &str = include_str!("../templates/README.md");

const GITIGNORE_TEMPLATE: &str = "\
# dotfiles manager files
migrate.yaml
.dotfiles.lock

# OS files
.DS_Store
*.log
";

/// What `init` did, so the caller can tailor the next steps it prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitOutcome {
    /// `git` was found on `PATH`.
    pub git_available: bool,
    /// `git init` ran in the new store.
    pub git_initialised: bool,
}

/// Home directory, store directory and the dry-run flag for one invocation.
///
/// Immutable once built; every component reads `dry_run` from here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dotfiles {
    dir: PathBuf,
    home: PathBuf,
    dry_run: bool,
}

impl Dotfiles {
    /// Resolve the current user's home directory and use `~/.dotfiles`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::HomeNotFound`] if the home directory cannot be
    /// determined.
    pub fn new() -> Result<Self, StoreError> {
        dirs::home_dir()
            .map(Self::with_home)
            .ok_or(StoreError::HomeNotFound)
    }

    /// Use `home` as the home directory and `<home>/.dotfiles` as the store.
    #[must_use]
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        let home = home.into();
        Self {
            dir: home.join(STORE_DIR),
            home,
            dry_run: false,
        }
    }

    /// Set the dry-run flag.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// The store directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The home directory.
    #[must_use]
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Whether this invocation must not touch the filesystem.
    #[must_use]
    pub const fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// The store is initialised iff its marker config exists.
    #[must_use]
    pub fn is_initialised(&self) -> bool {
        self.dir.join(CONFIG_FILE).is_file()
    }

    /// Absolute path of `relative` under home.
    #[must_use]
    pub fn home_path(&self, relative: &Path) -> PathBuf {
        join_relative(&self.home, relative)
    }

    /// Absolute path of `relative` under the store.
    #[must_use]
    pub fn dot_path(&self, relative: &Path) -> PathBuf {
        join_relative(&self.dir, relative)
    }

    /// Whether `path` is the store itself or lies inside it.
    #[must_use]
    pub fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.dir)
    }

    /// Fail with a [`StoreError`] unless the store exists and is initialised.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotInitialised`].
    pub fn require_initialised(&self) -> Result<(), StoreError> {
        if self.is_initialised() {
            Ok(())
        } else {
            Err(StoreError::NotInitialised {
                dir: self.dir.clone(),
            })
        }
    }

    /// Refuse to scaffold over anything that already exists.
    fn check_init_preconditions(&self) -> Result<()> {
        if self.is_initialised() {
            return Err(StoreError::AlreadyInitialised {
                dir: self.dir.clone(),
            }
            .into());
        }

        check_path_safety(&self.dir)?;

        if let Ok(meta) = fs::metadata(&self.dir) {
            if !meta.is_dir() {
                return Err(StoreError::NotADirectory {
                    dir: self.dir.clone(),
                }
                .into());
            }
            let count = fs::read_dir(&self.dir)
                .with_context(|| format!("failed to read existing directory {}", self.dir.display()))?
                .count();
            if count > 0 {
                return Err(StoreError::NotEmpty {
                    dir: self.dir.clone(),
                    count,
                }
                .into());
            }
        }

        Ok(())
    }

    /// Create the store with default configuration, `.gitignore`, README and
    /// a git repository when `git` is available.
    ///
    /// In dry-run mode only reports what would be created.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is already initialised, if its path is
    /// unsafe, is a file or a non-empty directory, or if any file cannot be
    /// written or `git init` fails.
    pub fn init(&self, executor: &dyn Executor, log: &dyn Log) -> Result<InitOutcome> {
        self.check_init_preconditions()?;

        let git_available = executor.which("git");
        let files = [CONFIG_FILE, MIGRATE_FILE, GITIGNORE_FILE, README_FILE];

        if self.dry_run {
            log.dry_run(&format!("Would create directory: {}", self.dir.display()));
            for file in files {
                log.dry_run(&format!(
                    "Would create file: {}",
                    self.dir.join(file).display()
                ));
            }
            if git_available {
                log.dry_run("Would run: git init");
            }
            return Ok(InitOutcome {
                git_available,
                git_initialised: false,
            });
        }

        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create dotfiles dir {}", self.dir.display()))?;
        log.info(&format!("Created {}", self.dir.display()));

        DotfilesConfig::initial()
            .save(&self.dir)
            .context("failed to save default dotfiles.yaml")?;
        MigrateConfig::initial()
            .save(&self.dir)
            .context("failed to save default migrate.yaml")?;
        fs::write(self.dir.join(GITIGNORE_FILE), GITIGNORE_TEMPLATE)
            .context("failed to create .gitignore")?;
        fs::write(self.dir.join(README_FILE), README_TEMPLATE)
            .context("failed to create README.md")?;
        for file in files {
            log.info(&format!("Created {file}"));
        }

        let mut git_initialised = false;
        if git_available {
            executor
                .run_in(&self.dir, "git", &["init"])
                .context("failed to run git init")?;
            log.info("Initialized git repository");
            git_initialised = true;
        }

        Ok(InitOutcome {
            git_available,
            git_initialised,
        })
    }
}

/// Join `relative` onto `base` without letting a root or prefix component
/// replace `base`.
fn join_relative(base: &Path, relative: &Path) -> PathBuf {
    let mut out = base.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::ParentDir => out.push(".."),
            Component::Prefix(_) | Component::RootDir | Component::CurDir => {}
        }
    }
    out
}
