//! Append-only record of accepted moves.

use crate::types::{Edge, PlayerId, Square};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// One accepted move and the squares it completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    move_no: u32,
    player: PlayerId,
    edge: Edge,
    squares_completed: Vec<Square>,
}

impl MoveRecord {
    /// Move number, starting at 1.
    pub fn move_no(&self) -> u32 {
        self.move_no
    }

    /// Player who drew the edge.
    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// The edge drawn.
    pub fn edge(&self) -> Edge {
        self.edge
    }

    /// Squares completed by this move (0, 1 or 2).
    pub fn squares_completed(&self) -> &[Square] {
        &self.squares_completed
    }
}

impl std::fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Move:{} Player:{} row:{} col:{} {}",
            self.move_no, self.player, self.edge.row, self.edge.col, self.edge.orientation
        )?;
        if !self.squares_completed.is_empty() {
            write!(f, " squares:")?;
            for square in &self.squares_completed {
                write!(f, " {}", square)?;
            }
        }
        Ok(())
    }
}

/// Ordered history of a game's moves.
///
/// Scoring is left to the caller; the ledger only answers who completed what.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveLedger {
    records: Vec<MoveRecord>,
}

impl MoveLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a move, assigning the next move number.
    #[instrument(skip(self, squares_completed), fields(completed = squares_completed.len()))]
    pub fn record(
        &mut self,
        player: PlayerId,
        edge: Edge,
        squares_completed: Vec<Square>,
    ) -> &MoveRecord {
        let move_no = self.next_move_no();
        debug!(move_no, "Recording move");
        self.records.push(MoveRecord {
            move_no,
            player,
            edge,
            squares_completed,
        });
        &self.records[self.records.len() - 1]
    }

    /// Number the next recorded move will receive.
    pub fn next_move_no(&self) -> u32 {
        self.records.last().map_or(1, |r| r.move_no + 1)
    }

    /// Most recent move.
    pub fn last(&self) -> Option<&MoveRecord> {
        self.records.last()
    }

    /// All moves in play order.
    pub fn all(&self) -> &[MoveRecord] {
        &self.records
    }

    /// Number of recorded moves.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if no move has been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Squares completed by `player`, in the order they were taken.
    pub fn squares_completed_by(&self, player: PlayerId) -> Vec<Square> {
        self.moves_by(player)
            .flat_map(|r| r.squares_completed.iter().copied())
            .collect()
    }

    /// Moves made by `player`.
    pub fn moves_by(&self, player: PlayerId) -> impl Iterator<Item = &MoveRecord> {
        self.records.iter().filter(move |r| r.player == player)
    }

    /// Removes and returns the most recent move.
    #[instrument(skip(self))]
    pub fn pop(&mut self) -> Option<MoveRecord> {
        self.records.pop()
    }

    /// Discards all moves; numbering restarts at 1.
    #[instrument(skip(self), fields(discarded = self.records.len()))]
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(n: u8) -> PlayerId {
        PlayerId::new(n).unwrap()
    }

    #[test]
    fn test_move_numbers_start_at_one() {
        let mut ledger = MoveLedger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.record(player(1), Edge::horizontal(1, 1), vec![]).move_no(), 1);
        assert_eq!(ledger.record(player(2), Edge::vertical(1, 1), vec![]).move_no(), 2);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.last().unwrap().edge(), Edge::vertical(1, 1));
    }

    #[test]
    fn test_squares_completed_by_player() {
        let mut ledger = MoveLedger::new();
        ledger.record(player(1), Edge::horizontal(1, 1), vec![]);
        ledger.record(player(2), Edge::vertical(1, 2), vec![Square::new(1, 1)]);
        ledger.record(
            player(2),
            Edge::horizontal(2, 2),
            vec![Square::new(1, 2), Square::new(2, 2)],
        );
        assert!(ledger.squares_completed_by(player(1)).is_empty());
        assert_eq!(
            ledger.squares_completed_by(player(2)),
            vec![Square::new(1, 1), Square::new(1, 2), Square::new(2, 2)]
        );
        assert_eq!(ledger.moves_by(player(2)).count(), 2);
    }

    #[test]
    fn test_pop_and_clear_reset_numbering() {
        let mut ledger = MoveLedger::new();
        ledger.record(player(1), Edge::horizontal(1, 1), vec![]);
        ledger.record(player(1), Edge::horizontal(2, 1), vec![]);
        let popped = ledger.pop().unwrap();
        assert_eq!(popped.move_no(), 2);
        assert_eq!(ledger.next_move_no(), 2);
        ledger.clear();
        assert_eq!(ledger.next_move_no(), 1);
    }

    #[test]
    fn test_record_display() {
        let mut ledger = MoveLedger::new();
        let record = ledger.record(player(1), Edge::vertical(1, 2), vec![Square::new(1, 1)]);
        assert_eq!(
            record.to_string(),
            "Move:1 Player:1 row:1 col:2 V squares: [1,1]"
        );
    }
}
