//! Preconditions and postconditions for lattice moves.
//!
//! A move is `{P} make_move {Q}`: preconditions are checked against the
//! lattice before anything is mutated, postconditions compare the lattice
//! before and after.

use crate::action::Move;
use crate::error::LatticeError;
use crate::invariants::{InvariantSet, LatticeInvariants};
use crate::lattice::Lattice;
use tracing::{instrument, warn};

// ─────────────────────────────────────────────────────────────
//  Contract Trait
// ─────────────────────────────────────────────────────────────

/// Preconditions and postconditions for a state transition.
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), LatticeError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), LatticeError>;
}

// ─────────────────────────────────────────────────────────────
//  Move Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: the edge is a real edge of the lattice.
pub struct EdgeInRange;

impl EdgeInRange {
    /// Rejects sentinel, out-of-range and malformed coordinates.
    #[instrument(skip(lattice))]
    pub fn check(mov: &Move, lattice: &Lattice) -> Result<(), LatticeError> {
        if lattice.is_playable(mov.edge)? {
            Ok(())
        } else {
            Err(LatticeError::CoordinateOutOfRange(mov.edge))
        }
    }
}

/// Precondition: the edge has not been drawn.
pub struct EdgeIsFree;

impl EdgeIsFree {
    /// Rejects drawn edges.
    #[instrument(skip(lattice))]
    pub fn check(mov: &Move, lattice: &Lattice) -> Result<(), LatticeError> {
        if lattice.is_free(mov.edge)? {
            Ok(())
        } else {
            Err(LatticeError::EdgeAlreadySet(mov.edge))
        }
    }
}

/// Precondition: the player is seated in this game.
pub struct PlayerIsSeated;

impl PlayerIsSeated {
    /// Rejects player numbers above the lattice's player count.
    #[instrument(skip(lattice))]
    pub fn check(mov: &Move, lattice: &Lattice) -> Result<(), LatticeError> {
        if mov.player.number() <= lattice.nplayer() {
            Ok(())
        } else {
            Err(LatticeError::InvalidPlayer(mov.player))
        }
    }
}

/// Composite precondition for a legal move.
pub struct LegalMove;

impl LegalMove {
    /// Validates all preconditions for a move.
    #[instrument(skip(lattice))]
    pub fn check(mov: &Move, lattice: &Lattice) -> Result<(), LatticeError> {
        EdgeInRange::check(mov, lattice)?;
        EdgeIsFree::check(mov, lattice)?;
        PlayerIsSeated::check(mov, lattice)?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────
//  Move Contract (Pre + Post)
// ─────────────────────────────────────────────────────────────

/// Contract for [`Lattice::make_move`].
///
/// Preconditions:
/// - Edge is real and free
/// - Player is seated
///
/// Postconditions:
/// - All lattice invariants hold
/// - Exactly one more edge is drawn and one more move recorded
/// - No square changed owner except those newly completed
pub struct MoveContract;

impl Contract<Lattice, Move> for MoveContract {
    fn pre(lattice: &Lattice, action: &Move) -> Result<(), LatticeError> {
        LegalMove::check(action, lattice)
    }

    fn post(before: &Lattice, after: &Lattice) -> Result<(), LatticeError> {
        LatticeInvariants::check_all(after).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            LatticeError::InvariantViolation(format!("Postcondition failed: {}", descriptions))
        })?;

        if after.free_edge_count() + 1 != before.free_edge_count() {
            warn!(
                before = before.free_edge_count(),
                after = after.free_edge_count(),
                "Free edge count did not drop by one"
            );
            return Err(LatticeError::InvariantViolation(
                "Postcondition failed: exactly one edge is drawn per move".to_string(),
            ));
        }

        if after.ledger().len() != before.ledger().len() + 1 {
            return Err(LatticeError::InvariantViolation(
                "Postcondition failed: exactly one move is recorded per move".to_string(),
            ));
        }

        let reassigned = before
            .squares()
            .zip(after.squares())
            .any(|((_, was), (_, now))| was.is_some() && was != now);
        if reassigned {
            return Err(LatticeError::InvariantViolation(
                "Postcondition failed: completed squares keep their owner".to_string(),
            ));
        }

        Ok(())
    }
}
