//! Whose turn it is.

use crate::error::LatticeError;
use crate::lattice::Lattice;
use crate::ledger::MoveRecord;
use crate::types::{Completion, PlayerId};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Player rotation for a game loop.
///
/// Players move in order `1..=nplayer`. A player who completes a square
/// moves again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOrder {
    nplayer: u8,
    current: PlayerId,
}

impl TurnOrder {
    /// Rotation for `nplayer` players, starting with player 1.
    pub fn new(nplayer: u8) -> Result<Self, LatticeError> {
        if !(1..=PlayerId::MAX).contains(&nplayer) {
            return Err(LatticeError::InvalidPlayerCount(u32::from(nplayer)));
        }
        Ok(Self {
            nplayer,
            current: PlayerId::first(),
        })
    }

    /// Rotation for the players seated at `lattice`.
    pub fn for_lattice(lattice: &Lattice) -> Self {
        Self {
            nplayer: lattice.nplayer(),
            current: PlayerId::first(),
        }
    }

    /// Player to move.
    pub fn current(&self) -> PlayerId {
        self.current
    }

    /// Passes the turn after a move, returning the next player.
    #[instrument(skip(self, completion), fields(current = %self.current, completed = completion.count()))]
    pub fn advance(&mut self, completion: &Completion) -> PlayerId {
        self.pass(completion.any())
    }

    /// Passes the turn after a recorded move.
    #[instrument(skip(self, record), fields(current = %self.current, move_no = record.move_no()))]
    pub fn advance_after(&mut self, record: &MoveRecord) -> PlayerId {
        self.pass(!record.squares_completed().is_empty())
    }

    fn pass(&mut self, completed: bool) -> PlayerId {
        if completed {
            debug!(player = %self.current, "Bonus turn");
            return self.current;
        }
        let next = self.current.number() % self.nplayer + 1;
        // Always in 1..=nplayer, which is within 1..=MAX.
        self.current = PlayerId::new(next).unwrap_or(PlayerId::first());
        self.current
    }
}
