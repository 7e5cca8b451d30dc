#![cfg(unix)]
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for sync.
//!
//! These tests drive [`Linker`](dotfiles_store::tasks::Linker) against a real
//! temporary home, covering link creation, idempotence, conflicts with
//! existing files and the store's reserved entries.

mod common;

use std::fs;

use common::TestHomeBuilder;
use dotfiles_store::logging::Level;

#[test]
fn creates_a_link_for_every_store_file() {
    let home = TestHomeBuilder::new()
        .with_store_file(".vimrc", "set number\n")
        .with_store_file(".config/alacritty/alacritty.toml", "[font]\n")
        .build();

    let (report, _log) = home.sync(false);

    assert!(report.is_success());
    assert_eq!(report.changed.len(), 2);
    assert_eq!(
        fs::read_link(home.home_path(".vimrc")).unwrap(),
        home.store_path(".vimrc")
    );
    assert_eq!(
        fs::read_to_string(home.home_path(".config/alacritty/alacritty.toml")).unwrap(),
        "[font]\n"
    );
}

#[test]
fn sync_twice_changes_nothing_the_second_time() {
    let home = TestHomeBuilder::new()
        .with_store_file(".vimrc", "set number\n")
        .build();

    let (first, _log) = home.sync(false);
    assert_eq!(first.changed.len(), 1);
    let tree = home.tree();

    let (second, _log) = home.sync(false);

    assert!(second.is_success());
    assert!(second.changed.is_empty());
    assert_eq!(second.already_ok, 1);
    assert_eq!(home.tree(), tree);
}

#[test]
fn existing_file_is_a_conflict_and_kept() {
    let home = TestHomeBuilder::new()
        .with_store_file(".vimrc", "store copy")
        .with_home_file(".vimrc", "home copy")
        .build();

    let (report, _log) = home.sync(false);

    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].starts_with(&format!(
        "failed to link {} -> {}: file exists and is not a symlink",
        home.home_path(".vimrc").display(),
        home.store_path(".vimrc").display()
    )));
    assert_eq!(fs::read_to_string(home.home_path(".vimrc")).unwrap(), "home copy");
}

#[test]
fn store_scaffolding_is_never_linked() {
    let home = TestHomeBuilder::new().build();

    let (report, _log) = home.sync(false);

    assert!(report.is_success());
    assert!(report.changed.is_empty());
    for name in ["dotfiles.yaml", "migrate.yaml", ".gitignore", "README.md"] {
        assert!(
            home.home_path(name).symlink_metadata().is_err(),
            "{name} must stay in the store"
        );
    }
}

#[test]
fn sync_ignore_patterns_are_honoured() {
    let home = TestHomeBuilder::new()
        .with_store_file(".vimrc", "")
        .with_store_file("notes/todo.md", "")
        .with_store_file("trace.log", "")
        .with_sync_ignore(&["notes", "*.log"])
        .build();

    let (report, log) = home.sync(false);

    assert_eq!(report.changed, vec![home.home_path(".vimrc")]);
    assert!(log.contains(Level::Info, "Skipping ignored file: trace.log"));
    assert!(home.home_path("notes").symlink_metadata().is_err());
}

#[test]
fn dry_run_leaves_home_untouched() {
    let home = TestHomeBuilder::new()
        .with_store_file(".vimrc", "")
        .with_store_file(".config/fish/config.fish", "")
        .build();
    let before = home.tree();

    let (dry, log) = home.sync(true);

    assert_eq!(home.tree(), before);
    assert_eq!(dry.changed.len(), 2);
    assert_eq!(log.messages(Level::DryRun).len(), 2);

    let (real, _log) = home.sync(false);
    assert_eq!(dry.changed, real.changed);
}
