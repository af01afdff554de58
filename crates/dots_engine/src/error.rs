//! Error types for the lattice engine.

use crate::types::{Edge, PlayerId, Square};
use derive_more::{Display, Error};
use tracing::instrument;

/// Error raised by a rejected lattice operation.
///
/// Every mutating operation that returns one of these leaves the lattice
/// exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum LatticeError {
    /// Row/column/orientation does not name a real edge of the lattice.
    #[display("Edge {} is outside the lattice", _0)]
    CoordinateOutOfRange(Edge),

    /// Row/column does not name a square of the lattice.
    #[display("Square {} is outside the lattice", _0)]
    SquareOutOfRange(Square),

    /// The edge has already been drawn.
    #[display("Edge {} is already set", _0)]
    EdgeAlreadySet(Edge),

    /// The edge has not been drawn, so it cannot be cleared.
    #[display("Edge {} is not set", _0)]
    EdgeNotSet(Edge),

    /// The edge was drawn by a recorded move and can only be removed by
    /// undoing that move.
    #[display("Edge {} is recorded in the move ledger", _0)]
    EdgeRecorded(Edge),

    /// The player number exceeds the number of players in the game.
    #[display("Player {} is not playing", _0)]
    InvalidPlayer(PlayerId),

    /// Each dimension must be in `1..=Lattice::MAX_DIMENSION`.
    #[display("Invalid lattice dimensions {}x{}", nrow, ncol)]
    InvalidDimensions {
        /// Requested square rows.
        nrow: u32,
        /// Requested square columns.
        ncol: u32,
    },

    /// Player count must be in `1..=15`.
    #[display("Invalid player count {} (must be 1..=15)", _0)]
    InvalidPlayerCount(u32),

    /// The move ledger is empty.
    #[display("No move to undo")]
    NothingToUndo,

    /// An invariant was violated (postcondition failure).
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for LatticeError {}

/// Text parse error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Parse error: {} at {}:{}", message, file, line)]
pub struct ParseError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ParseError {
    /// Creates a new parse error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
