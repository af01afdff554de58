//! Dots - command-line driver for the dots-and-boxes rule engine.

#![warn(missing_docs)]

mod cli;
mod play;
mod replay;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command, LatticeArgs};
use dots_engine::{Lattice, LatticeConfig};
use tracing::{debug, instrument};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            lattice,
            strategy,
            seed,
            board,
        } => play::run(build_lattice(&lattice)?, strategy, seed, board),
        Command::Replay {
            file,
            lattice,
            board,
        } => replay::run(build_lattice(&lattice)?, &file, board),
    }
}

/// Builds the lattice from the config file (if any) and command-line overrides.
#[instrument]
fn build_lattice(args: &LatticeArgs) -> Result<Lattice> {
    let config = match &args.config {
        Some(path) => LatticeConfig::from_file(path)?,
        None => LatticeConfig::default(),
    }
    .with_overrides(args.rows, args.cols, args.players);
    debug!(?config, "Resolved lattice config");

    Lattice::from_config(&config).context("Invalid lattice configuration")
}
