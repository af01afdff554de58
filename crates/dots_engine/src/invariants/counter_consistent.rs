//! Counter consistency: every completion counter matches a recount.

use super::Invariant;
use crate::lattice::Lattice;
use crate::rules::completion_group;
use crate::types::{Side, Square};
use strum::IntoEnumIterator;
use tracing::warn;

/// Invariant: each real edge's Before/After counter equals the number of
/// drawn edges in that side's completion group, and sides with no square
/// read 0. The free-edge count matches the number of undrawn edges.
///
/// The recount is done from a flat table of drawn edges, independent of the
/// incremental bookkeeping being checked.
pub struct CounterConsistentInvariant;

impl CounterConsistentInvariant {
    fn drawn_table(lattice: &Lattice) -> Vec<bool> {
        let stride = lattice.ncol() as usize + 1;
        let mut drawn = vec![false; (lattice.nrow() as usize + 1) * stride * 2];
        for (edge, _) in lattice.set_edges() {
            let idx = ((edge.row as usize - 1) * stride + edge.col as usize - 1) * 2
                + usize::from(!edge.is_horizontal());
            drawn[idx] = true;
        }
        drawn
    }
}

impl Invariant<Lattice> for CounterConsistentInvariant {
    fn holds(lattice: &Lattice) -> bool {
        let drawn = Self::drawn_table(lattice);
        let stride = lattice.ncol() as usize + 1;
        let is_drawn = |row: u32, col: u32, horizontal: bool| {
            drawn[((row as usize - 1) * stride + col as usize - 1) * 2 + usize::from(!horizontal)]
        };

        let mut free = 0;
        for (edge, state) in lattice.playable_edges() {
            if state.is_free() {
                free += 1;
            }
            for side in Side::iter() {
                let expected = match completion_group(lattice.nrow(), lattice.ncol(), edge, side) {
                    Some(group) => group
                        .iter()
                        .filter(|e| is_drawn(e.row, e.col, e.is_horizontal()))
                        .count() as u8,
                    None => 0,
                };
                if state.count(side) != expected {
                    warn!(
                        edge = %edge,
                        ?side,
                        stored = state.count(side),
                        expected,
                        "Completion counter out of step"
                    );
                    return false;
                }
            }
        }

        if free != lattice.free_edge_count() {
            warn!(
                counted = free,
                tracked = lattice.free_edge_count(),
                "Free edge count out of step"
            );
            return false;
        }
        true
    }

    fn description() -> &'static str {
        "Completion counters match the drawn edges of each completion group"
    }
}

/// Number of drawn edges bounding `square`, by brute force.
pub(crate) fn drawn_sides(lattice: &Lattice, square: Square) -> usize {
    square
        .bounding_edges()
        .iter()
        .filter(|edge| matches!(lattice.owner_of_edge(**edge), Ok(owner) if owner.player().is_some()))
        .count()
}
