//! Square ownership: a square has an owner exactly when it is closed.

use super::Invariant;
use super::counter_consistent::drawn_sides;
use crate::lattice::Lattice;
use tracing::warn;

/// Invariant: a square is owned if and only if all four of its edges are
/// drawn, and every owner is a seated player.
pub struct SquareOwnershipInvariant;

impl Invariant<Lattice> for SquareOwnershipInvariant {
    fn holds(lattice: &Lattice) -> bool {
        lattice.squares().all(|(square, owner)| {
            let closed = drawn_sides(lattice, square) == 4;
            let valid = match owner {
                Some(player) => closed && player.number() <= lattice.nplayer(),
                None => !closed,
            };
            if !valid {
                warn!(square = %square, ?owner, closed, "Square ownership violated");
            }
            valid
        })
    }

    fn description() -> &'static str {
        "A square is owned exactly when its four edges are drawn"
    }
}
