//! CLI entry point for the `assets` binary.
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use assets_cli::{cli, commands, logging};

#[allow(clippy::print_stdout)]
fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    let log = Arc::new(logging::Logger::new(args.verbose));

    match args.command {
        cli::Command::Build(opts) => commands::build::run(&args.global, &opts, &log),
        cli::Command::Watch(opts) => commands::watch::run(&args.global, &opts, &log),
        cli::Command::Version => {
            let version = option_env!("ASSETS_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
            println!("assets {version}");
            Ok(())
        }
    }
}
