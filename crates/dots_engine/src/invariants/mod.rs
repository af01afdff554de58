//! First-class lattice invariants.
//!
//! Invariants are properties of a [`crate::Lattice`] that every accepted
//! move preserves. They are checked after each move in debug builds and can
//! be tested independently.

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants checked together.
///
/// Implemented for tuples of up to four invariants.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

macro_rules! impl_invariant_set {
    ($($inv:ident),+) => {
        impl<S, $($inv),+> InvariantSet<S> for ($($inv,)+)
        where
            $($inv: Invariant<S>,)+
        {
            fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
                let mut violations = Vec::new();
                $(
                    if !$inv::holds(state) {
                        violations.push(InvariantViolation::new($inv::description()));
                    }
                )+
                if violations.is_empty() {
                    Ok(())
                } else {
                    Err(violations)
                }
            }
        }
    };
}

impl_invariant_set!(I1, I2);
impl_invariant_set!(I1, I2, I3);
impl_invariant_set!(I1, I2, I3, I4);

pub mod counter_consistent;
pub mod ledger_consistent;
pub mod sentinel_integrity;
pub mod square_ownership;

pub use counter_consistent::CounterConsistentInvariant;
pub use ledger_consistent::LedgerConsistentInvariant;
pub use sentinel_integrity::SentinelIntegrityInvariant;
pub use square_ownership::SquareOwnershipInvariant;

/// All lattice invariants as a composable set.
pub type LatticeInvariants = (
    CounterConsistentInvariant,
    SquareOwnershipInvariant,
    SentinelIntegrityInvariant,
    LedgerConsistentInvariant,
);
