//! Command-line entry point for the `dotfiles` binary.

use anyhow::Result;
use clap::Parser;

use dotfiles_store::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();

    if let cli::Command::Version = args.command {
        commands::version::run();
        return Ok(());
    }

    let name = args.command.name();
    logging::init_subscriber(args.verbose, name);
    let log = logging::Logger::new(name);

    match &args.command {
        cli::Command::Init(opts) => commands::init::run(&args.global, opts, &log),
        cli::Command::Migrate(opts) => commands::migrate::run(&args.global, opts, &log),
        cli::Command::Sync(opts) => commands::sync::run(&args.global, opts, &log),
        cli::Command::Version => Ok(()),
    }
}
