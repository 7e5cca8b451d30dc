//! Command-line definitions.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI entry point for the dotfiles store.
#[derive(Parser, Debug)]
#[command(
    name = "dotfiles",
    about = "Move dotfiles into ~/.dotfiles and link them back",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options every subcommand accepts.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Preview changes without applying
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Override the home directory (the store lives at <HOME>/.dotfiles)
    #[arg(long, global = true, env = "DOTFILES_HOME")]
    pub home: Option<PathBuf>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create ~/.dotfiles with default configuration
    Init(InitOpts),
    /// Move the paths listed in migrate.yaml into ~/.dotfiles
    Migrate(MigrateOpts),
    /// Symlink every file in ~/.dotfiles back into home
    Sync(SyncOpts),
    /// Print version information
    Version,
}

impl Command {
    /// Subcommand name, used for the log file name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Init(_) => "init",
            Self::Migrate(_) => "migrate",
            Self::Sync(_) => "sync",
            Self::Version => "version",
        }
    }
}

/// Options for the `init` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct InitOpts {}

/// Options for the `migrate` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct MigrateOpts {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Options for the `sync` subcommand.
#[derive(Parser, Debug, Clone, Default)]
pub struct SyncOpts {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}
