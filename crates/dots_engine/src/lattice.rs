//! Edge and square state for an M×N lattice.
//!
//! The lattice allocates `(nrow + 1) × (ncol + 1)` positions for each
//! orientation. Positions that do not correspond to a real edge (horizontal
//! edges in column `ncol + 1`, vertical edges in row `nrow + 1`) are marked
//! [`EdgeOwner::Unusable`] at construction, so neighbour lookups never need
//! bounds checks beyond the allocated shape.
//!
//! Each real edge carries two completion counters, maintained incrementally
//! as edges are drawn and cleared. A square is completed by an edge exactly
//! when the counter on that side reads 3 at the time the edge is drawn.

use crate::action::Move;
use crate::config::LatticeConfig;
use crate::contracts::{Contract, MoveContract};
use crate::error::LatticeError;
use crate::ledger::{MoveLedger, MoveRecord};
use crate::rules::{self, adjacent_square, completion_group, side_of};
use crate::types::{Completion, Edge, EdgeOwner, EdgeState, Orientation, PlayerId, Side, Square};
use strum::IntoEnumIterator;
use tracing::{debug, instrument, trace};

/// Whether [`Lattice::set_edge_with`] may replace the owner of a drawn edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SetMode {
    /// Reject drawn edges with [`LatticeError::EdgeAlreadySet`].
    #[default]
    Fresh,
    /// Replace the owner of a drawn edge. Counters and squares are untouched.
    Overwrite,
}

/// Where an edge coordinate lands in the allocated array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Playable(usize),
    Sentinel,
    Absent,
}

/// The game lattice: the single source of truth for edge and square state.
///
/// Not safe for unsynchronised concurrent mutation. Parallel searches should
/// work on clones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lattice {
    nrow: u32,
    ncol: u32,
    nplayer: u8,
    edges: Vec<EdgeState>,
    squares: Vec<Option<PlayerId>>,
    free_count: usize,
    ledger: MoveLedger,
}

impl Lattice {
    /// Largest accepted number of square rows or columns.
    pub const MAX_DIMENSION: u32 = 1024;

    /// Creates an empty lattice of `nrow × ncol` squares for `nplayer` players.
    ///
    /// # Errors
    ///
    /// [`LatticeError::InvalidDimensions`] unless both dimensions are in
    /// `1..=MAX_DIMENSION`,
    /// [`LatticeError::InvalidPlayerCount`] unless `1 <= nplayer <= 15`.
    #[instrument]
    pub fn new(nrow: u32, ncol: u32, nplayer: u32) -> Result<Self, LatticeError> {
        let invalid = LatticeError::InvalidDimensions { nrow, ncol };
        let in_range = |n: u32| (1..=Self::MAX_DIMENSION).contains(&n);
        if !in_range(nrow) || !in_range(ncol) {
            return Err(invalid);
        }
        let nplayer = u8::try_from(nplayer)
            .ok()
            .filter(|n| (1..=PlayerId::MAX).contains(n))
            .ok_or(LatticeError::InvalidPlayerCount(nplayer))?;

        let (rows, cols) = (nrow as usize, ncol as usize);
        let positions = (rows + 1)
            .checked_mul(cols + 1)
            .and_then(|n| n.checked_mul(2))
            .ok_or_else(|| invalid.clone())?;
        let square_count = rows.checked_mul(cols).ok_or_else(|| invalid.clone())?;
        let free_count = square_count
            .checked_mul(2)
            .and_then(|n| n.checked_add(rows + cols))
            .ok_or(invalid)?;

        let mut lattice = Self {
            nrow,
            ncol,
            nplayer,
            edges: vec![EdgeState::default(); positions],
            squares: vec![None; square_count],
            free_count,
            ledger: MoveLedger::new(),
        };
        lattice.mark_sentinels();
        debug!(free = lattice.free_count, "Lattice created");
        Ok(lattice)
    }

    /// Creates a lattice from configuration.
    #[instrument(skip(config))]
    pub fn from_config(config: &LatticeConfig) -> Result<Self, LatticeError> {
        Self::new(*config.nrow(), config.ncol_or_default(), *config.nplayer())
    }

    fn mark_sentinels(&mut self) {
        for edge in self.sentinel_positions() {
            let idx = self.edge_index(edge);
            self.edges[idx] = EdgeState::UNUSABLE;
        }
    }

    /// Allocated positions that are not real edges: horizontal edges past the
    /// last dot column and vertical edges below the last dot row.
    pub(crate) fn sentinel_positions(&self) -> impl Iterator<Item = Edge> + use<> {
        let (nrow, ncol) = (self.nrow, self.ncol);
        (1..=nrow + 1)
            .map(move |row| Edge::horizontal(row, ncol + 1))
            .chain((1..=ncol + 1).map(move |col| Edge::vertical(nrow + 1, col)))
    }

    /// Returns the lattice to its freshly constructed state and empties the ledger.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.edges.fill(EdgeState::default());
        self.squares.fill(None);
        self.free_count = 2 * self.nrow as usize * self.ncol as usize
            + self.nrow as usize
            + self.ncol as usize;
        self.ledger.clear();
        self.mark_sentinels();
    }

    /// Number of square rows.
    pub fn nrow(&self) -> u32 {
        self.nrow
    }

    /// Number of square columns.
    pub fn ncol(&self) -> u32 {
        self.ncol
    }

    /// Number of players.
    pub fn nplayer(&self) -> u8 {
        self.nplayer
    }

    /// Moves accepted through [`Lattice::make_move`].
    pub fn ledger(&self) -> &MoveLedger {
        &self.ledger
    }

    // ─────────────────────────────────────────────────────────────
    //  Coordinates
    // ─────────────────────────────────────────────────────────────

    fn edge_index(&self, edge: Edge) -> usize {
        let row = (edge.row - 1) as usize;
        let col = (edge.col - 1) as usize;
        (row * (self.ncol as usize + 1) + col) * 2 + edge.orientation.index()
    }

    fn slot(&self, edge: Edge) -> Result<Slot, LatticeError> {
        if edge.row == 0 || edge.col == 0 {
            return Err(LatticeError::CoordinateOutOfRange(edge));
        }
        if edge.row > self.nrow + 1 || edge.col > self.ncol + 1 {
            return Ok(Slot::Absent);
        }
        let idx = self.edge_index(edge);
        if self.edges[idx].owner == EdgeOwner::Unusable {
            Ok(Slot::Sentinel)
        } else {
            Ok(Slot::Playable(idx))
        }
    }

    fn playable_index(&self, edge: Edge) -> Result<usize, LatticeError> {
        match self.slot(edge)? {
            Slot::Playable(idx) => Ok(idx),
            Slot::Sentinel | Slot::Absent => Err(LatticeError::CoordinateOutOfRange(edge)),
        }
    }

    /// Stored state at any allocated position, sentinels included.
    pub(crate) fn stored_state(&self, edge: Edge) -> Option<EdgeState> {
        if edge.row == 0 || edge.col == 0 || edge.row > self.nrow + 1 || edge.col > self.ncol + 1 {
            return None;
        }
        Some(self.edges[self.edge_index(edge)])
    }

    fn square_index(&self, square: Square) -> usize {
        (square.row - 1) as usize * self.ncol as usize + (square.col - 1) as usize
    }

    fn check_player(&self, player: PlayerId) -> Result<(), LatticeError> {
        if player.number() > self.nplayer {
            return Err(LatticeError::InvalidPlayer(player));
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────
    //  Queries
    // ─────────────────────────────────────────────────────────────

    /// True if `edge` is a real edge of the lattice (drawn or not).
    ///
    /// Sentinel and out-of-allocation positions report `false`. Row or column
    /// 0 is malformed and rejected.
    pub fn is_playable(&self, edge: Edge) -> Result<bool, LatticeError> {
        Ok(matches!(self.slot(edge)?, Slot::Playable(_)))
    }

    /// True if `edge` is a real edge that has not been drawn.
    pub fn is_free(&self, edge: Edge) -> Result<bool, LatticeError> {
        Ok(match self.slot(edge)? {
            Slot::Playable(idx) => self.edges[idx].is_free(),
            Slot::Sentinel | Slot::Absent => false,
        })
    }

    /// Owner of `edge`. Positions that are not real edges report
    /// [`EdgeOwner::Unusable`].
    pub fn owner_of_edge(&self, edge: Edge) -> Result<EdgeOwner, LatticeError> {
        Ok(match self.slot(edge)? {
            Slot::Playable(idx) => self.edges[idx].owner,
            Slot::Sentinel | Slot::Absent => EdgeOwner::Unusable,
        })
    }

    /// Owner and completion counters of `edge`.
    ///
    /// `None` for coordinates beyond the allocated lattice; sentinel positions
    /// report an unusable state with zero counts.
    pub fn edge_state(&self, edge: Edge) -> Result<Option<EdgeState>, LatticeError> {
        Ok(match self.slot(edge)? {
            Slot::Playable(idx) => Some(self.edges[idx]),
            Slot::Sentinel => Some(EdgeState::UNUSABLE),
            Slot::Absent => None,
        })
    }

    /// Player who completed `square`, if anyone has.
    ///
    /// Squares beyond the lattice report `None`; row or column 0 is rejected.
    pub fn owner_of_square(&self, square: Square) -> Result<Option<PlayerId>, LatticeError> {
        if square.row == 0 || square.col == 0 {
            return Err(LatticeError::SquareOutOfRange(square));
        }
        if square.row > self.nrow || square.col > self.ncol {
            return Ok(None);
        }
        Ok(self.squares[self.square_index(square)])
    }

    /// Before and after completion groups of `edge`.
    ///
    /// Either group is `None` when the edge has no square on that side or is
    /// not a real edge.
    pub fn completion_groups(&self, edge: Edge) -> Result<[Option<[Edge; 3]>; 2], LatticeError> {
        if !self.is_playable(edge)? {
            return Ok([None, None]);
        }
        Ok([
            completion_group(self.nrow, self.ncol, edge, Side::Before),
            completion_group(self.nrow, self.ncol, edge, Side::After),
        ])
    }

    /// Before and after squares adjacent to `edge`.
    pub fn adjacent_squares(&self, edge: Edge) -> Result<[Option<Square>; 2], LatticeError> {
        if !self.is_playable(edge)? {
            return Ok([None, None]);
        }
        Ok([
            adjacent_square(self.nrow, self.ncol, edge, Side::Before),
            adjacent_square(self.nrow, self.ncol, edge, Side::After),
        ])
    }

    /// Counters of the sides of `edge` that have a square.
    fn present_counts(&self, edge: Edge, state: EdgeState) -> impl Iterator<Item = u8> + use<> {
        rules::present_sides(self.nrow, self.ncol, edge).map(move |side| state.count(side))
    }

    /// True if drawing the free `edge` would complete at least one square.
    pub fn does_complete_square(&self, edge: Edge) -> Result<bool, LatticeError> {
        Ok(match self.slot(edge)? {
            Slot::Playable(idx) if self.edges[idx].is_free() => {
                self.present_counts(edge, self.edges[idx]).any(|c| c == 3)
            }
            _ => false,
        })
    }

    /// Fewest further edges needed, after `edge` is drawn, to finish one of
    /// its adjacent squares. `None` when `edge` is not a real edge.
    pub fn distance_to_completion(&self, edge: Edge) -> Result<Option<u8>, LatticeError> {
        Ok(match self.slot(edge)? {
            Slot::Playable(idx) => {
                rules::distance_from_counts(self.present_counts(edge, self.edges[idx]))
            }
            Slot::Sentinel | Slot::Absent => None,
        })
    }

    /// Largest counter over the present sides of a real edge.
    pub(crate) fn max_present_count(&self, edge: Edge, state: EdgeState) -> u8 {
        self.present_counts(edge, state).max().unwrap_or(0)
    }

    /// True if some present side of a real edge has exactly `count` set edges.
    pub(crate) fn has_present_count(&self, edge: Edge, state: EdgeState, count: u8) -> bool {
        self.present_counts(edge, state).any(|c| c == count)
    }

    /// Number of edges not yet drawn.
    pub fn free_edge_count(&self) -> usize {
        self.free_count
    }

    /// True once every edge has been drawn.
    pub fn is_full(&self) -> bool {
        self.free_count == 0
    }

    /// Every real edge with its state, in `(row, col, orientation)` order.
    pub fn playable_edges(&self) -> impl Iterator<Item = (Edge, EdgeState)> + '_ {
        (1..=self.nrow + 1)
            .flat_map(move |row| {
                (1..=self.ncol + 1).flat_map(move |col| {
                    Orientation::iter().map(move |orientation| Edge::new(row, col, orientation))
                })
            })
            .filter_map(move |edge| {
                let state = self.edges[self.edge_index(edge)];
                (state.owner != EdgeOwner::Unusable).then_some((edge, state))
            })
    }

    /// Undrawn edges with their state, in order.
    pub fn free_edges(&self) -> impl Iterator<Item = (Edge, EdgeState)> + '_ {
        self.playable_edges().filter(|(_, state)| state.is_free())
    }

    /// Drawn edges with their owner, in order.
    pub fn set_edges(&self) -> impl Iterator<Item = (Edge, PlayerId)> + '_ {
        self.playable_edges()
            .filter_map(|(edge, state)| state.owner.player().map(|p| (edge, p)))
    }

    /// Every square with its owner, row by row.
    pub fn squares(&self) -> impl Iterator<Item = (Square, Option<PlayerId>)> + '_ {
        (1..=self.nrow).flat_map(move |row| {
            (1..=self.ncol).map(move |col| {
                let square = Square::new(row, col);
                (square, self.squares[self.square_index(square)])
            })
        })
    }

    /// Number of completed squares.
    pub fn completed_square_count(&self) -> usize {
        self.squares.iter().filter(|s| s.is_some()).count()
    }

    // ─────────────────────────────────────────────────────────────
    //  Mutation
    // ─────────────────────────────────────────────────────────────

    /// Draws `edge` for `player`, returning the squares it completed.
    ///
    /// # Errors
    ///
    /// - [`LatticeError::CoordinateOutOfRange`] if `edge` is not a real edge
    /// - [`LatticeError::EdgeAlreadySet`] if `edge` has been drawn
    /// - [`LatticeError::InvalidPlayer`] if `player` is not in the game
    pub fn set_edge(&mut self, edge: Edge, player: PlayerId) -> Result<Completion, LatticeError> {
        self.set_edge_with(edge, player, SetMode::Fresh)
    }

    /// Draws `edge` for `player`, optionally replacing an existing owner.
    #[instrument(skip(self), fields(edge = %edge, player = %player))]
    pub fn set_edge_with(
        &mut self,
        edge: Edge,
        player: PlayerId,
        mode: SetMode,
    ) -> Result<Completion, LatticeError> {
        let idx = self.playable_index(edge)?;
        self.check_player(player)?;

        let state = self.edges[idx];
        if state.is_set() {
            return match mode {
                SetMode::Fresh => Err(LatticeError::EdgeAlreadySet(edge)),
                SetMode::Overwrite => {
                    debug!(previous = ?state.owner, "Overwriting edge owner");
                    self.edges[idx].owner = EdgeOwner::Player(player);
                    Ok(Completion::none())
                }
            };
        }

        let mut completion = Completion::none();
        for side in Side::iter() {
            if let Some(square) = adjacent_square(self.nrow, self.ncol, edge, side)
                && state.count(side) == 3
            {
                completion.push(square);
            }
        }

        self.edges[idx].owner = EdgeOwner::Player(player);
        self.free_count -= 1;
        self.adjust_neighbours(edge, Adjust::Up);
        for square in completion.squares() {
            let sq_idx = self.square_index(*square);
            self.squares[sq_idx] = Some(player);
        }

        debug!(completed = completion.count(), free = self.free_count, "Edge set");
        Ok(completion)
    }

    /// Clears a drawn edge (undo support).
    ///
    /// Neighbour counters are decremented and any square the edge bounded
    /// loses its owner, since it is no longer complete. Returns those squares.
    /// Edges drawn by [`Lattice::make_move`] must be removed with
    /// [`Lattice::undo_move`] instead.
    ///
    /// # Errors
    ///
    /// - [`LatticeError::CoordinateOutOfRange`] for non-edges
    /// - [`LatticeError::EdgeNotSet`] if `edge` has not been drawn
    /// - [`LatticeError::EdgeRecorded`] if `edge` appears in the ledger
    #[instrument(skip(self), fields(edge = %edge))]
    pub fn clear_edge(&mut self, edge: Edge) -> Result<Vec<Square>, LatticeError> {
        let idx = self.playable_index(edge)?;
        if !self.edges[idx].is_set() {
            return Err(LatticeError::EdgeNotSet(edge));
        }
        if self.ledger.all().iter().any(|record| record.edge() == edge) {
            return Err(LatticeError::EdgeRecorded(edge));
        }
        Ok(self.release_edge(idx, edge))
    }

    /// Frees the drawn edge at `idx` and disowns the squares it bounded.
    fn release_edge(&mut self, idx: usize, edge: Edge) -> Vec<Square> {
        self.edges[idx].owner = EdgeOwner::Free;
        self.free_count += 1;
        self.adjust_neighbours(edge, Adjust::Down);

        let mut released = Vec::new();
        for side in Side::iter() {
            if let Some(square) = adjacent_square(self.nrow, self.ncol, edge, side) {
                let sq_idx = self.square_index(square);
                if self.squares[sq_idx].take().is_some() {
                    released.push(square);
                }
            }
        }

        debug!(released = released.len(), free = self.free_count, "Edge cleared");
        released
    }

    /// Applies a move: draws the edge and records it in the ledger.
    ///
    /// Preconditions are checked before any mutation. In debug builds the
    /// lattice invariants are verified afterwards, and a failure restores the
    /// lattice to its state before the call.
    #[instrument(skip(self), fields(edge = %edge, player = %player))]
    pub fn make_move(&mut self, edge: Edge, player: PlayerId) -> Result<MoveRecord, LatticeError> {
        let action = Move::new(player, edge);
        MoveContract::pre(self, &action)?;

        #[cfg(debug_assertions)]
        let before = self.clone();

        let completion = self.set_edge(edge, player)?;
        let record = self
            .ledger
            .record(player, edge, completion.into_squares())
            .clone();

        #[cfg(debug_assertions)]
        if let Err(e) = MoveContract::post(&before, self) {
            *self = before;
            return Err(e);
        }

        debug!(move_no = record.move_no(), "Move accepted");
        Ok(record)
    }

    /// Reverts the most recent move, returning its record.
    ///
    /// # Errors
    ///
    /// [`LatticeError::NothingToUndo`] if the ledger is empty.
    #[instrument(skip(self))]
    pub fn undo_move(&mut self) -> Result<MoveRecord, LatticeError> {
        let edge = self
            .ledger
            .last()
            .map(MoveRecord::edge)
            .ok_or(LatticeError::NothingToUndo)?;
        let idx = self.playable_index(edge)?;
        if !self.edges[idx].is_set() {
            return Err(LatticeError::EdgeNotSet(edge));
        }
        self.release_edge(idx, edge);
        let record = self.ledger.pop().ok_or(LatticeError::NothingToUndo)?;
        debug!(move_no = record.move_no(), "Move undone");
        Ok(record)
    }

    /// Bumps the counters of every edge sharing a square with `edge`.
    fn adjust_neighbours(&mut self, edge: Edge, direction: Adjust) {
        for side in Side::iter() {
            let Some(square) = adjacent_square(self.nrow, self.ncol, edge, side) else {
                continue;
            };
            for other in square.bounding_edges() {
                if other == edge {
                    continue;
                }
                let idx = self.edge_index(other);
                let state = &mut self.edges[idx];
                if state.owner == EdgeOwner::Unusable {
                    continue;
                }
                let count = state.count_mut(side_of(other, square));
                *count = match direction {
                    Adjust::Up => (*count + 1).min(3),
                    Adjust::Down => count.saturating_sub(1),
                };
                trace!(neighbour = %other, count = *count, "Adjusted completion count");
            }
        }
    }
}

#[cfg(test)]
impl Lattice {
    pub(crate) fn stored_state_mut(&mut self, edge: Edge) -> &mut EdgeState {
        let idx = self.edge_index(edge);
        &mut self.edges[idx]
    }

    pub(crate) fn square_owner_mut(&mut self, square: Square) -> &mut Option<PlayerId> {
        let idx = self.square_index(square);
        &mut self.squares[idx]
    }

    pub(crate) fn ledger_mut(&mut self) -> &mut MoveLedger {
        &mut self.ledger
    }
}

#[derive(Debug, Clone, Copy)]
enum Adjust {
    Up,
    Down,
}

impl std::fmt::Display for Lattice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", crate::render::BoardText::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(n: u8) -> PlayerId {
        PlayerId::new(n).unwrap()
    }

    #[test]
    fn test_new_rejects_bad_dimensions() {
        assert!(matches!(
            Lattice::new(0, 3, 2),
            Err(LatticeError::InvalidDimensions { nrow: 0, ncol: 3 })
        ));
        assert!(matches!(
            Lattice::new(3, 3, 0),
            Err(LatticeError::InvalidPlayerCount(0))
        ));
        assert!(matches!(
            Lattice::new(3, 3, 16),
            Err(LatticeError::InvalidPlayerCount(16))
        ));
        assert!(Lattice::new(1, 1, 15).is_ok());
    }

    #[test]
    fn test_new_rejects_oversized_dimensions() {
        assert_eq!(
            Lattice::new(u32::MAX, u32::MAX, 2),
            Err(LatticeError::InvalidDimensions { nrow: u32::MAX, ncol: u32::MAX })
        );
        let too_tall = Lattice::MAX_DIMENSION + 1;
        assert_eq!(
            Lattice::new(too_tall, 1, 2),
            Err(LatticeError::InvalidDimensions { nrow: too_tall, ncol: 1 })
        );
        assert_eq!(
            Lattice::new(3, u32::MAX, 2),
            Err(LatticeError::InvalidDimensions { nrow: 3, ncol: u32::MAX })
        );
        let tall = Lattice::new(Lattice::MAX_DIMENSION, 1, 2).unwrap();
        assert_eq!(tall.free_edge_count(), 3 * 1024 + 1);
        assert_eq!(tall.edge_state(Edge::horizontal(u32::MAX, 1)), Ok(None));
    }

    #[test]
    fn test_new_lattice_edge_counts() {
        let lattice = Lattice::new(2, 3, 2).unwrap();
        // 3 rows of 3 horizontal edges + 2 rows of 4 vertical edges.
        assert_eq!(lattice.free_edge_count(), 17);
        assert_eq!(lattice.playable_edges().count(), 17);
        assert_eq!(lattice.free_edges().count(), 17);
        assert!(!lattice.is_full());
    }

    #[test]
    fn test_sentinels_are_not_free() {
        let lattice = Lattice::new(2, 2, 2).unwrap();
        let right_horizontal = Edge::horizontal(1, 3);
        let bottom_vertical = Edge::vertical(3, 1);
        assert_eq!(lattice.is_free(right_horizontal), Ok(false));
        assert_eq!(lattice.is_playable(bottom_vertical), Ok(false));
        assert_eq!(
            lattice.owner_of_edge(right_horizontal),
            Ok(EdgeOwner::Unusable)
        );
        assert_eq!(
            lattice.edge_state(bottom_vertical),
            Ok(Some(EdgeState::UNUSABLE))
        );
    }

    #[test]
    fn test_out_of_allocation_reads_are_absent() {
        let lattice = Lattice::new(2, 2, 2).unwrap();
        assert_eq!(lattice.edge_state(Edge::horizontal(9, 1)), Ok(None));
        assert_eq!(lattice.is_free(Edge::vertical(1, 9)), Ok(false));
        assert_eq!(lattice.owner_of_square(Square::new(3, 1)), Ok(None));
    }

    #[test]
    fn test_zero_coordinates_are_rejected() {
        let lattice = Lattice::new(2, 2, 2).unwrap();
        let edge = Edge::horizontal(0, 1);
        assert_eq!(
            lattice.is_free(edge),
            Err(LatticeError::CoordinateOutOfRange(edge))
        );
        assert_eq!(
            lattice.owner_of_square(Square::new(1, 0)),
            Err(LatticeError::SquareOutOfRange(Square::new(1, 0)))
        );
    }

    #[test]
    fn test_set_edge_updates_neighbour_counts() {
        let mut lattice = Lattice::new(2, 2, 2).unwrap();
        lattice.set_edge(Edge::horizontal(2, 1), p(1)).unwrap();

        // Square (1,1) above: top, left and right now see one set edge below them.
        let top = lattice.edge_state(Edge::horizontal(1, 1)).unwrap().unwrap();
        assert_eq!((top.before, top.after), (0, 1));
        let left = lattice.edge_state(Edge::vertical(1, 1)).unwrap().unwrap();
        assert_eq!((left.before, left.after), (0, 1));
        let right = lattice.edge_state(Edge::vertical(1, 2)).unwrap().unwrap();
        assert_eq!((right.before, right.after), (1, 0));

        // Square (2,1) below.
        let bottom = lattice.edge_state(Edge::horizontal(3, 1)).unwrap().unwrap();
        assert_eq!((bottom.before, bottom.after), (1, 0));
        let lower_left = lattice.edge_state(Edge::vertical(2, 1)).unwrap().unwrap();
        assert_eq!((lower_left.before, lower_left.after), (0, 1));
    }

    #[test]
    fn test_set_edge_completes_square() {
        let mut lattice = Lattice::new(1, 1, 2).unwrap();
        assert!(!lattice.set_edge(Edge::horizontal(1, 1), p(1)).unwrap().any());
        assert!(!lattice.set_edge(Edge::horizontal(2, 1), p(2)).unwrap().any());
        assert!(!lattice.set_edge(Edge::vertical(1, 1), p(1)).unwrap().any());
        assert_eq!(lattice.does_complete_square(Edge::vertical(1, 2)), Ok(true));

        let completion = lattice.set_edge(Edge::vertical(1, 2), p(2)).unwrap();
        assert_eq!(completion.squares(), &[Square::new(1, 1)]);
        assert_eq!(lattice.owner_of_square(Square::new(1, 1)), Ok(Some(p(2))));
        assert!(lattice.is_full());
    }

    #[test]
    fn test_set_edge_completes_two_squares() {
        let mut lattice = Lattice::new(1, 2, 2).unwrap();
        for edge in [
            Edge::horizontal(1, 1),
            Edge::horizontal(2, 1),
            Edge::vertical(1, 1),
            Edge::horizontal(1, 2),
            Edge::horizontal(2, 2),
            Edge::vertical(1, 3),
        ] {
            assert!(!lattice.set_edge(edge, p(1)).unwrap().any());
        }
        let completion = lattice.set_edge(Edge::vertical(1, 2), p(2)).unwrap();
        assert_eq!(completion.squares(), &[Square::new(1, 1), Square::new(1, 2)]);
    }

    #[test]
    fn test_set_edge_errors_leave_state_unchanged() {
        let mut lattice = Lattice::new(2, 2, 2).unwrap();
        lattice.set_edge(Edge::vertical(1, 2), p(1)).unwrap();
        let snapshot = lattice.clone();

        assert_eq!(
            lattice.set_edge(Edge::vertical(1, 2), p(2)),
            Err(LatticeError::EdgeAlreadySet(Edge::vertical(1, 2)))
        );
        assert_eq!(
            lattice.set_edge(Edge::horizontal(1, 3), p(1)),
            Err(LatticeError::CoordinateOutOfRange(Edge::horizontal(1, 3)))
        );
        assert_eq!(
            lattice.set_edge(Edge::horizontal(1, 1), p(3)),
            Err(LatticeError::InvalidPlayer(p(3)))
        );
        assert_eq!(lattice, snapshot);
    }

    #[test]
    fn test_overwrite_replaces_owner_only() {
        let mut lattice = Lattice::new(2, 2, 2).unwrap();
        lattice.set_edge(Edge::horizontal(2, 2), p(1)).unwrap();
        let counts_before: Vec<_> = lattice.playable_edges().map(|(_, s)| (s.before, s.after)).collect();

        let completion = lattice
            .set_edge_with(Edge::horizontal(2, 2), p(2), SetMode::Overwrite)
            .unwrap();
        assert!(!completion.any());
        assert_eq!(
            lattice.owner_of_edge(Edge::horizontal(2, 2)),
            Ok(EdgeOwner::Player(p(2)))
        );
        let counts_after: Vec<_> = lattice.playable_edges().map(|(_, s)| (s.before, s.after)).collect();
        assert_eq!(counts_before, counts_after);
        assert_eq!(lattice.free_edge_count(), 11);
    }

    #[test]
    fn test_clear_edge_reverses_set_edge() {
        let mut lattice = Lattice::new(2, 2, 2).unwrap();
        let fresh = lattice.clone();
        lattice.set_edge(Edge::vertical(2, 2), p(1)).unwrap();
        assert_eq!(lattice.clear_edge(Edge::vertical(2, 2)), Ok(vec![]));
        assert_eq!(lattice, fresh);
        assert_eq!(
            lattice.clear_edge(Edge::vertical(2, 2)),
            Err(LatticeError::EdgeNotSet(Edge::vertical(2, 2)))
        );
    }

    #[test]
    fn test_clear_edge_releases_completed_square() {
        let mut lattice = Lattice::new(1, 1, 1).unwrap();
        for edge in Square::new(1, 1).bounding_edges() {
            lattice.set_edge(edge, p(1)).unwrap();
        }
        assert_eq!(lattice.completed_square_count(), 1);
        assert_eq!(
            lattice.clear_edge(Edge::horizontal(1, 1)),
            Ok(vec![Square::new(1, 1)])
        );
        assert_eq!(lattice.owner_of_square(Square::new(1, 1)), Ok(None));
        assert_eq!(lattice.does_complete_square(Edge::horizontal(1, 1)), Ok(true));
    }

    #[test]
    fn test_make_move_and_undo() {
        let mut lattice = Lattice::new(1, 1, 2).unwrap();
        let edges = Square::new(1, 1).bounding_edges();
        for edge in &edges[..3] {
            lattice.make_move(*edge, p(1)).unwrap();
        }
        let record = lattice.make_move(edges[3], p(2)).unwrap();
        assert_eq!(record.move_no(), 4);
        assert_eq!(record.squares_completed(), &[Square::new(1, 1)]);

        let undone = lattice.undo_move().unwrap();
        assert_eq!(undone, record);
        assert_eq!(lattice.ledger().len(), 3);
        assert_eq!(lattice.owner_of_square(Square::new(1, 1)), Ok(None));
        assert_eq!(lattice.is_free(edges[3]), Ok(true));
    }

    #[test]
    fn test_clear_edge_refuses_recorded_move() {
        let mut lattice = Lattice::new(2, 3, 2).unwrap();
        lattice.make_move(Edge::horizontal(1, 1), p(1)).unwrap();
        let snapshot = lattice.clone();

        assert_eq!(
            lattice.clear_edge(Edge::horizontal(1, 1)),
            Err(LatticeError::EdgeRecorded(Edge::horizontal(1, 1)))
        );
        assert_eq!(lattice, snapshot);

        let record = lattice.make_move(Edge::vertical(2, 3), p(2)).unwrap();
        assert_eq!(record.move_no(), 2);
        assert_eq!(lattice.ledger().len(), 2);

        lattice.undo_move().unwrap();
        lattice.undo_move().unwrap();
        assert_eq!(lattice.is_free(Edge::horizontal(1, 1)), Ok(true));
    }

    #[cfg(debug_assertions)]
    #[test]
    fn test_failed_postcondition_restores_lattice() {
        let mut lattice = Lattice::new(2, 2, 2).unwrap();
        lattice.make_move(Edge::horizontal(1, 1), p(1)).unwrap();
        // A counter that disagrees with the drawn edges.
        lattice.stored_state_mut(Edge::horizontal(3, 2)).before = 2;
        let snapshot = lattice.clone();

        let result = lattice.make_move(Edge::vertical(2, 1), p(2));
        assert!(matches!(result, Err(LatticeError::InvariantViolation(_))));
        assert_eq!(lattice, snapshot);
        assert_eq!(lattice.ledger().len(), 1);
        assert_eq!(lattice.is_free(Edge::vertical(2, 1)), Ok(true));
    }

    #[test]
    fn test_undo_on_empty_ledger() {
        let mut lattice = Lattice::new(1, 1, 2).unwrap();
        assert_eq!(lattice.undo_move(), Err(LatticeError::NothingToUndo));
    }

    #[test]
    fn test_reset_restores_fresh_state() {
        let mut lattice = Lattice::new(2, 3, 2).unwrap();
        let fresh = lattice.clone();
        lattice.make_move(Edge::horizontal(1, 1), p(1)).unwrap();
        lattice.make_move(Edge::vertical(2, 4), p(2)).unwrap();
        lattice.reset();
        assert_eq!(lattice, fresh);
    }

    #[test]
    fn test_distance_to_completion() {
        let mut lattice = Lattice::new(2, 2, 2).unwrap();
        let edge = Edge::vertical(1, 2);
        assert_eq!(lattice.distance_to_completion(edge), Ok(Some(3)));
        lattice.set_edge(Edge::horizontal(1, 1), p(1)).unwrap();
        lattice.set_edge(Edge::horizontal(2, 1), p(1)).unwrap();
        assert_eq!(lattice.distance_to_completion(edge), Ok(Some(1)));
        lattice.set_edge(Edge::vertical(1, 1), p(1)).unwrap();
        assert_eq!(lattice.distance_to_completion(edge), Ok(Some(0)));
        assert_eq!(lattice.distance_to_completion(Edge::horizontal(1, 3)), Ok(None));
    }

    #[test]
    fn test_playable_edges_are_ordered() {
        let lattice = Lattice::new(3, 2, 2).unwrap();
        let edges: Vec<Edge> = lattice.playable_edges().map(|(e, _)| e).collect();
        let mut sorted = edges.clone();
        sorted.sort();
        assert_eq!(edges, sorted);
    }
}
