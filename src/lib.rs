//! Dotfiles store.
//!
//! Moves the files a user lists in `~/.dotfiles/migrate.yaml` out of their
//! home directory into the store, and links every store file back to where it
//! came from. The store is meant to be a git repository the user commits.
//!
//! The public API is organised into four layers:
//!
//! - **[`config`]**: load and validate the store's YAML files
//! - **[`resources`]**: `check + apply` primitives for a single move or link
//! - **[`tasks`]**: the migrate and sync walks, folding outcomes into a report
//! - **[`commands`]**: subcommand orchestration (`init`, `migrate`, `sync`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod ignore;
pub mod lock;
pub mod logging;
pub mod resources;
pub mod safety;
pub mod store;
pub mod tasks;
