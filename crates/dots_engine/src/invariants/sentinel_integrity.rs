//! Sentinel integrity: padding positions are never touched.

use super::Invariant;
use crate::lattice::Lattice;
use crate::types::EdgeState;
use tracing::warn;

/// Invariant: every sentinel position is still unusable with zero counters.
pub struct SentinelIntegrityInvariant;

impl Invariant<Lattice> for SentinelIntegrityInvariant {
    fn holds(lattice: &Lattice) -> bool {
        lattice.sentinel_positions().all(|edge| {
            let stored = lattice.stored_state(edge);
            let intact = stored == Some(EdgeState::UNUSABLE);
            if !intact {
                warn!(edge = %edge, ?stored, "Sentinel position modified");
            }
            intact
        })
    }

    fn description() -> &'static str {
        "Sentinel positions stay unusable with zero counters"
    }
}
