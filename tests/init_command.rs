#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for store initialisation.

mod common;

use std::fs;

use common::NoGit;
use dotfiles_store::config::{DotfilesConfig, MigrateConfig};
use dotfiles_store::error::StoreError;
use dotfiles_store::logging::{Level, MemoryLog};
use dotfiles_store::store::Dotfiles;

#[test]
fn init_writes_default_configuration() {
    let tmp = tempfile::tempdir().unwrap();
    let dotfiles = Dotfiles::with_home(tmp.path());
    let log = MemoryLog::new();

    let outcome = dotfiles.init(&NoGit, &log).unwrap();

    assert!(!outcome.git_available);
    assert!(dotfiles.is_initialised());
    assert_eq!(
        DotfilesConfig::load(dotfiles.dir()).unwrap(),
        DotfilesConfig::initial()
    );
    assert_eq!(
        MigrateConfig::load(dotfiles.dir()).unwrap(),
        MigrateConfig::initial()
    );
    let gitignore = fs::read_to_string(dotfiles.dir().join(".gitignore")).unwrap();
    assert!(gitignore.contains("migrate.yaml"));
    assert!(dotfiles.dir().join("README.md").is_file());
}

#[test]
fn init_twice_is_refused() {
    let tmp = tempfile::tempdir().unwrap();
    let dotfiles = Dotfiles::with_home(tmp.path());
    dotfiles.init(&NoGit, &MemoryLog::new()).unwrap();

    let err = dotfiles.init(&NoGit, &MemoryLog::new()).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<StoreError>(),
        Some(StoreError::AlreadyInitialised { .. })
    ));
}

#[test]
fn init_refuses_a_non_empty_directory() {
    let tmp = tempfile::tempdir().unwrap();
    let dotfiles = Dotfiles::with_home(tmp.path());
    fs::create_dir_all(dotfiles.dir()).unwrap();
    fs::write(dotfiles.dir().join("keep.txt"), "mine").unwrap();

    let err = dotfiles.init(&NoGit, &MemoryLog::new()).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<StoreError>(),
        Some(StoreError::NotEmpty { count: 1, .. })
    ));
    assert_eq!(
        fs::read_to_string(dotfiles.dir().join("keep.txt")).unwrap(),
        "mine"
    );
}

#[test]
fn dry_run_init_only_reports() {
    let tmp = tempfile::tempdir().unwrap();
    let dotfiles = Dotfiles::with_home(tmp.path()).with_dry_run(true);
    let log = MemoryLog::new();

    dotfiles.init(&NoGit, &log).unwrap();

    assert!(!dotfiles.dir().exists());
    assert!(log.contains(Level::DryRun, "Would create directory: "));
    assert_eq!(log.messages(Level::DryRun).len(), 5);
}
