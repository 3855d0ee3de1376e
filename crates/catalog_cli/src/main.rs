//! Operator entry point for the catalog core.
//!
//! # Responsibility
//! - Load settings, start logging and open the catalog store.
//! - Print category listings for quick inspection of a live database.

use clap::Parser;

mod cli;
mod commands;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    commands::run_command(cli)
}
