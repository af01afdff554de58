//! Rule engine for dots-and-boxes.
//!
//! Players take turns drawing edges between adjacent dots of an M×N lattice.
//! Drawing the fourth edge of a square completes it for the player who drew
//! it. This crate holds the board state and answers the rule queries a game
//! loop or automated player needs; it does no I/O beyond reading a config
//! file.
//!
//! # Architecture
//!
//! - **Lattice**: edge owners, per-edge completion counters and square
//!   owners, updated incrementally on every draw or clear
//! - **MoveSet**: free, square-completing and safe edges derived from a lattice
//! - **MoveLedger**: ordered record of accepted moves
//! - **Contracts / invariants**: checks run around every move in debug builds
//!
//! # Example
//!
//! ```
//! use dots_engine::{Edge, Lattice, MoveSet, PlayerId, TurnOrder};
//!
//! # fn main() -> Result<(), dots_engine::LatticeError> {
//! let mut lattice = Lattice::new(2, 2, 2)?;
//! let mut turns = TurnOrder::for_lattice(&lattice);
//!
//! let edge = MoveSet::free_edges(&lattice).pick_sequential().unwrap_or(Edge::horizontal(1, 1));
//! let record = lattice.make_move(edge, turns.current())?;
//! assert_eq!(record.move_no(), 1);
//! assert_eq!(record.player(), PlayerId::first());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod action;
mod config;
mod contracts;
mod error;
mod invariants;
mod lattice;
mod ledger;
mod move_set;
mod render;
mod rules;
mod turn;
mod types;

// Crate-level exports - Core types
pub use types::{Completion, Edge, EdgeOwner, EdgeState, Orientation, PlayerId, Side, Square};

// Crate-level exports - Errors
pub use error::{LatticeError, ParseError};

// Crate-level exports - Lattice
pub use lattice::{Lattice, SetMode};

// Crate-level exports - Moves
pub use action::Move;
pub use ledger::{MoveLedger, MoveRecord};
pub use move_set::{DEFAULT_SAFE_DISTANCE, MoveSet, MoveStrategy};
pub use turn::TurnOrder;

// Crate-level exports - Contracts and invariants
pub use contracts::{
    Contract, EdgeInRange, EdgeIsFree, LegalMove, MoveContract, PlayerIsSeated,
};
pub use invariants::{
    CounterConsistentInvariant, Invariant, InvariantSet, InvariantViolation,
    LatticeInvariants, LedgerConsistentInvariant, SentinelIntegrityInvariant,
    SquareOwnershipInvariant,
};

// Crate-level exports - Rendering and configuration
pub use config::{ConfigError, LatticeConfig};
pub use render::BoardText;
