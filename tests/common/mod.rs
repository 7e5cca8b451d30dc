// Shared helpers for integration tests.
//
// Provides a temporary home directory with an initialised store and a fluent
// builder so each integration test can set up an isolated environment without
// repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use dotfiles_store::config::{DotfilesConfig, MigrateConfig};
use dotfiles_store::exec::{ExecResult, Executor};
use dotfiles_store::logging::MemoryLog;
use dotfiles_store::store::Dotfiles;
use dotfiles_store::tasks::{Linker, Migrator, RunReport};
use walkdir::WalkDir;

/// Executor that reports `git` as missing and never runs anything.
#[derive(Debug)]
pub struct NoGit;

impl Executor for NoGit {
    fn run_in(&self, _: &Path, program: &str, _: &[&str]) -> anyhow::Result<ExecResult> {
        anyhow::bail!("unexpected call to {program}")
    }

    fn which(&self, _: &str) -> bool {
        false
    }
}

/// An isolated home directory backed by a [`tempfile::TempDir`].
///
/// The store lives at `<home>/.dotfiles` and is initialised on creation.
pub struct TestHome {
    /// Temporary directory used as the home directory.
    pub root: tempfile::TempDir,
}

impl TestHome {
    /// Create a home with an initialised store and default configuration.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        Dotfiles::with_home(root.path())
            .init(&NoGit, &MemoryLog::new())
            .expect("init store");
        Self { root }
    }

    /// Path to the home directory.
    pub fn home(&self) -> &Path {
        self.root.path()
    }

    /// Path to the store directory.
    pub fn store(&self) -> PathBuf {
        self.home().join(".dotfiles")
    }

    /// Absolute path of `rel` under home.
    pub fn home_path(&self, rel: &str) -> PathBuf {
        self.home().join(rel)
    }

    /// Absolute path of `rel` under the store.
    pub fn store_path(&self, rel: &str) -> PathBuf {
        self.store().join(rel)
    }

    /// A [`Dotfiles`] context for this home.
    pub fn dotfiles(&self, dry_run: bool) -> Dotfiles {
        Dotfiles::with_home(self.home()).with_dry_run(dry_run)
    }

    /// Load `migrate.yaml` and run a migration.
    pub fn migrate(&self, dry_run: bool) -> (RunReport, MemoryLog) {
        let dotfiles = self.dotfiles(dry_run);
        let log = MemoryLog::new();
        let report = Migrator::load(&dotfiles, &log).expect("load migrator").run();
        (report, log)
    }

    /// Load `dotfiles.yaml` and run a sync.
    pub fn sync(&self, dry_run: bool) -> (RunReport, MemoryLog) {
        let dotfiles = self.dotfiles(dry_run);
        let log = MemoryLog::new();
        let report = Linker::load(&dotfiles, &log).expect("load linker").run();
        (report, log)
    }

    /// Every path under home with its kind, sorted. Used to prove a dry run
    /// leaves the tree untouched.
    pub fn tree(&self) -> Vec<String> {
        WalkDir::new(self.home())
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .map(|e| e.expect("walk home"))
            .map(|e| {
                let rel = e
                    .path()
                    .strip_prefix(self.home())
                    .expect("under home")
                    .display()
                    .to_string();
                let kind = if e.path_is_symlink() {
                    "link"
                } else if e.file_type().is_dir() {
                    "dir"
                } else {
                    "file"
                };
                format!("{kind} {rel}")
            })
            .collect()
    }
}

/// Fluent builder for [`TestHome`].
pub struct TestHomeBuilder {
    home: TestHome,
    migrate: MigrateConfig,
}

impl TestHomeBuilder {
    /// Begin building a new home with an initialised store.
    pub fn new() -> Self {
        Self {
            home: TestHome::new(),
            migrate: MigrateConfig::initial(),
        }
    }

    /// Write `content` to `rel` under home, creating parents.
    pub fn with_home_file(self, rel: &str, content: &str) -> Self {
        write_file(&self.home.home_path(rel), content);
        self
    }

    /// Write `content` to `rel` under the store, creating parents.
    pub fn with_store_file(self, rel: &str, content: &str) -> Self {
        write_file(&self.home.store_path(rel), content);
        self
    }

    /// Add a path spec to `migrate.yaml`.
    pub fn with_migrate_path(mut self, spec: &str) -> Self {
        self.migrate.paths.push(spec.to_string());
        self
    }

    /// Add an ignore pattern to `migrate.yaml`.
    pub fn with_migrate_ignore(mut self, pattern: &str) -> Self {
        self.migrate.ignore.push(pattern.to_string());
        self
    }

    /// Replace the sync ignore patterns in `dotfiles.yaml`.
    pub fn with_sync_ignore(self, patterns: &[&str]) -> Self {
        DotfilesConfig {
            ignore: patterns.iter().map(ToString::to_string).collect(),
        }
        .save(&self.home.store())
        .expect("write dotfiles.yaml");
        self
    }

    /// Finish building: writes `migrate.yaml` and returns the home.
    pub fn build(self) -> TestHome {
        self.migrate
            .save(&self.home.store())
            .expect("write migrate.yaml");
        self.home
    }
}

/// Write `content` to `path`, creating parent directories.
pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, content).expect("write file");
}
