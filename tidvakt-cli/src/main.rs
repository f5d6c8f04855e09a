//! ## tidvakt-cli
//! **Command line driver for the simulation core**
//!
//! `tidvakt run` executes a seeded synthetic workload on one event store
//! backend and prints a YAML report with the BLAKE3 digest of the
//! invocation trace. `tidvakt compare` runs the same workload on every
//! backend and fails if their traces differ.

use clap::Parser;

mod commands;
mod error;
mod workload;

use commands::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    commands::run_command(cli)?;
    Ok(())
}
