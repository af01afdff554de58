//! Self-play games.

use crate::cli::{BoardArgs, PlayStrategy};
use anyhow::Result;
use dots_engine::{
    DEFAULT_SAFE_DISTANCE, Edge, Lattice, MoveSet, MoveStrategy, PlayerId, TurnOrder,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, instrument};

/// Chooses the next edge for `strategy`, or `None` when the board is full.
pub fn choose<R: Rng + ?Sized>(
    lattice: &Lattice,
    strategy: PlayStrategy,
    rng: &mut R,
) -> Option<Edge> {
    let free = MoveSet::free_edges(lattice);
    match strategy {
        PlayStrategy::Random => free.pick(MoveStrategy::Random, rng),
        PlayStrategy::Sequential => free.pick(MoveStrategy::Sequential, rng),
        PlayStrategy::Safe => {
            let completing = MoveSet::square_completing_moves(lattice, Some(&free));
            if !completing.is_empty() {
                return completing.pick_random(rng);
            }
            let safe = MoveSet::safe_moves(lattice, Some(&free), DEFAULT_SAFE_DISTANCE);
            if !safe.is_empty() {
                return safe.pick_random(rng);
            }
            free.pick_random(rng)
        }
    }
}

/// Squares held by each player, indexed from player 1.
pub fn tallies(lattice: &Lattice) -> Vec<(PlayerId, usize)> {
    (1..=lattice.nplayer())
        .filter_map(PlayerId::new)
        .map(|player| (player, lattice.ledger().squares_completed_by(player).len()))
        .collect()
}

/// Plays `lattice` to the end and prints the result.
#[instrument(skip(lattice), fields(nrow = lattice.nrow(), ncol = lattice.ncol()))]
pub fn run(mut lattice: Lattice, strategy: PlayStrategy, seed: Option<u64>, board: BoardArgs) -> Result<()> {
    let seed = seed.unwrap_or_else(rand::random);
    info!(seed, "Starting self-play game");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut turns = TurnOrder::for_lattice(&lattice);

    while let Some(edge) = choose(&lattice, strategy, &mut rng) {
        let record = lattice.make_move(edge, turns.current())?;
        debug!(record = %record, "Move played");
        turns.advance_after(&record);
        if board.show {
            println!("{}", board.view(&lattice));
        }
    }

    if !board.show {
        println!("{}", board.view(&lattice));
    }
    for (player, squares) in tallies(&lattice) {
        println!("Player {}: {} squares", player, squares);
    }
    info!(moves = lattice.ledger().len(), "Game over");
    Ok(())
}
