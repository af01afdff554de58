//! Command-line interface for the dots driver.

use clap::{Args, Parser, Subcommand, ValueEnum};
use dots_engine::{BoardText, Lattice};
use std::path::PathBuf;

/// Dots - self-play and replay over the dots-and-boxes rule engine
#[derive(Parser, Debug)]
#[command(name = "dots")]
#[command(about = "Play or replay dots-and-boxes games", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Lattice shape, from a config file and/or explicit overrides.
#[derive(Args, Debug, Clone)]
pub struct LatticeArgs {
    /// TOML file with `nrow`, `ncol` and `nplayer`
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Number of square rows
    #[arg(long)]
    pub rows: Option<u32>,

    /// Number of square columns (defaults to rows)
    #[arg(long)]
    pub cols: Option<u32>,

    /// Number of players
    #[arg(long)]
    pub players: Option<u32>,
}

/// How boards are printed.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct BoardArgs {
    /// Print the board after every move
    #[arg(long)]
    pub show: bool,

    /// Text rows per vertical edge, counting one dot
    #[arg(long, default_value_t = 2)]
    pub cell_height: usize,

    /// Text columns per horizontal edge (defaults to twice the height)
    #[arg(long)]
    pub cell_width: Option<usize>,

    /// Leave completed squares blank instead of showing their owner
    #[arg(long)]
    pub hide_owners: bool,
}

impl BoardArgs {
    /// Text view of `lattice` with these options.
    pub fn view<'a>(&self, lattice: &'a Lattice) -> BoardText<'a> {
        let board = BoardText::new(lattice).with_vertical_chars(self.cell_height);
        match self.cell_width {
            Some(width) => board.with_horizontal_chars(width),
            None => board,
        }
        .with_owners(!self.hide_owners)
    }
}

/// How automated players choose their edge.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayStrategy {
    /// Any free edge, uniformly
    Random,
    /// Lowest free edge in row, column, orientation order
    Sequential,
    /// Take a square if possible, else avoid handing one over, else anything
    Safe,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Auto-play a full game and print the square tallies
    Play {
        #[command(flatten)]
        lattice: LatticeArgs,

        /// Move selection strategy
        #[arg(short, long, value_enum, default_value = "random")]
        strategy: PlayStrategy,

        /// RNG seed for reproducible games
        #[arg(long)]
        seed: Option<u64>,

        #[command(flatten)]
        board: BoardArgs,
    },

    /// Apply a recorded game (`player row col h|v` per line)
    Replay {
        /// Move file; `#` starts a comment
        file: PathBuf,

        #[command(flatten)]
        lattice: LatticeArgs,

        #[command(flatten)]
        board: BoardArgs,
    },
}
