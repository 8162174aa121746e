//! Entry point for the sweeper command-line tool.

#![warn(clippy::all, rust_2018_idioms)]

mod cli;

use clap::Parser as _;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = cli::Cli::parse();

    // File logging is best-effort; a missing data directory should not stop
    // a conversion run.
    if let Err(e) = sweeper::logging::init() {
        eprintln!("warning: logging disabled: {e:#}");
    }

    cli::run_command(cli.command)?;
    Ok(())
}
