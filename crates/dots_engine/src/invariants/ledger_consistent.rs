//! Ledger consistency: recorded moves agree with the lattice.

use super::Invariant;
use crate::lattice::Lattice;
use tracing::warn;

/// Invariant: moves are numbered `1..=n` without gaps, every recorded edge
/// is still drawn, and every recorded square is owned by the player who
/// completed it.
///
/// Edges drawn directly through [`Lattice::set_edge`] bypass the ledger, so
/// drawn edges without a record are allowed.
pub struct LedgerConsistentInvariant;

impl Invariant<Lattice> for LedgerConsistentInvariant {
    fn holds(lattice: &Lattice) -> bool {
        lattice
            .ledger()
            .all()
            .iter()
            .zip(1u32..)
            .all(|(record, expected_no)| {
                if record.move_no() != expected_no {
                    warn!(move_no = record.move_no(), expected_no, "Move numbering gap");
                    return false;
                }
                let drawn = matches!(lattice.owner_of_edge(record.edge()), Ok(owner) if owner.player().is_some());
                if !drawn {
                    warn!(move_no = record.move_no(), edge = %record.edge(), "Recorded edge is not drawn");
                    return false;
                }
                record.squares_completed().iter().all(|square| {
                    let owner = lattice.owner_of_square(*square);
                    let kept = owner == Ok(Some(record.player()));
                    if !kept {
                        warn!(move_no = record.move_no(), square = %square, ?owner, "Recorded square lost");
                    }
                    kept
                })
            })
    }

    fn description() -> &'static str {
        "Ledger moves are numbered in order and match drawn edges and owned squares"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Edge, EdgeOwner, PlayerId, Square};

    #[test]
    fn test_recorded_game_holds() {
        let mut lattice = Lattice::new(1, 1, 2).unwrap();
        let p1 = PlayerId::first();
        for edge in Square::new(1, 1).bounding_edges() {
            lattice.make_move(edge, p1).unwrap();
        }
        assert!(LedgerConsistentInvariant::holds(&lattice));
    }

    #[test]
    fn test_direct_set_edge_is_allowed() {
        let mut lattice = Lattice::new(2, 2, 2).unwrap();
        lattice.set_edge(Edge::horizontal(1, 1), PlayerId::first()).unwrap();
        assert!(LedgerConsistentInvariant::holds(&lattice));
    }

    #[test]
    fn test_undrawn_recorded_edge_violates() {
        let mut lattice = Lattice::new(2, 2, 2).unwrap();
        lattice.make_move(Edge::vertical(1, 1), PlayerId::first()).unwrap();
        lattice.stored_state_mut(Edge::vertical(1, 1)).owner = EdgeOwner::Free;
        assert!(!LedgerConsistentInvariant::holds(&lattice));
    }

    #[test]
    fn test_numbering_gap_violates() {
        let mut lattice = Lattice::new(2, 2, 2).unwrap();
        lattice.set_edge(Edge::vertical(1, 1), PlayerId::first()).unwrap();
        let ledger: crate::ledger::MoveLedger = serde_json::from_value(serde_json::json!({
            "records": [{
                "move_no": 2,
                "player": 1,
                "edge": { "row": 1, "col": 1, "orientation": "Vertical" },
                "squares_completed": []
            }]
        }))
        .unwrap();
        *lattice.ledger_mut() = ledger;
        assert!(!LedgerConsistentInvariant::holds(&lattice));
    }
}
