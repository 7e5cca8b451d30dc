#![allow(clippy::expect_used, clippy::unwrap_used)]
//! Snapshots of the rendered conflict messages users see at the end of a run.

use std::path::Path;

use dotfiles_store::error::ConflictError;

#[test]
fn migrate_target_exists() {
    let conflict = ConflictError::migrate(
        Path::new("/home/u/.vimrc"),
        Path::new("/home/u/.dotfiles/.vimrc"),
        "already exists in dotfiles",
    );
    insta::assert_snapshot!("migrate_target_exists", conflict.to_string());
}

#[test]
fn migrate_critical_file() {
    let conflict = ConflictError::migrate(
        Path::new("/home/u/.bashrc"),
        Path::new("/home/u/.dotfiles/.bashrc"),
        "already exists in dotfiles",
    );
    insta::assert_snapshot!("migrate_critical_file", conflict.to_string());
}

#[test]
fn link_over_regular_file() {
    let conflict = ConflictError::link(
        Path::new("/home/u/.dotfiles/.vimrc"),
        Path::new("/home/u/.vimrc"),
        "file exists and is not a symlink",
    );
    insta::assert_snapshot!("link_over_regular_file", conflict.to_string());
}

#[test]
fn link_over_critical_file() {
    let conflict = ConflictError::link(
        Path::new("/home/u/.dotfiles/.ssh/config"),
        Path::new("/home/u/.ssh/config"),
        "symlink exists to different location",
    );
    insta::assert_snapshot!("link_over_critical_file", conflict.to_string());
}
