//! Legal-move collections derived from lattice state.
//!
//! A [`MoveSet`] never mutates the lattice. It is the type automated players
//! iterate over when looking for square-completing or safe moves.

use crate::error::ParseError;
use crate::lattice::Lattice;
use crate::rules::distance::distance;
use crate::types::Edge;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, instrument};

/// Minimum distance-to-completion [`MoveSet::safe_moves`] uses by default.
pub const DEFAULT_SAFE_DISTANCE: u8 = 2;

/// How to choose a single move from a set.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
pub enum MoveStrategy {
    /// Uniform choice using the caller's RNG.
    #[default]
    #[display("random")]
    Random,
    /// Lowest edge in `(row, col, orientation)` order.
    #[display("sequential")]
    Sequential,
}

impl FromStr for MoveStrategy {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(MoveStrategy::Random),
            "seq" | "sequential" => Ok(MoveStrategy::Sequential),
            other => Err(ParseError::new(format!("Unsupported move strategy: {}", other))),
        }
    }
}

/// Ordered collection of edges.
///
/// Edges are kept sorted by `(row, col, orientation)` and deduplicated, so
/// sequential selection is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveSet {
    edges: Vec<Edge>,
}

impl MoveSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// All undrawn edges. Sentinel positions are never included.
    #[instrument(skip(lattice))]
    pub fn free_edges(lattice: &Lattice) -> Self {
        let set = Self {
            edges: lattice.free_edges().map(|(edge, _)| edge).collect(),
        };
        debug!(count = set.len(), "Collected free edges");
        set
    }

    /// Free edges with a present side holding exactly `d` set edges.
    ///
    /// `d = 3` finds edges that complete a square, `d = 2` edges that would
    /// hand the next player a square, `d <= 1` safe edges.
    #[instrument(skip(lattice))]
    pub fn edges_at_distance(lattice: &Lattice, d: u8) -> Self {
        lattice
            .free_edges()
            .filter(|(edge, state)| lattice.has_present_count(*edge, *state, d))
            .map(|(edge, _)| edge)
            .collect()
    }

    /// Candidates whose play completes at least one square.
    ///
    /// `candidates` defaults to all free edges; drawn or non-existent
    /// candidates are dropped.
    #[instrument(skip(lattice, candidates))]
    pub fn square_completing_moves(lattice: &Lattice, candidates: Option<&MoveSet>) -> Self {
        Self::filter_candidates(lattice, candidates, |lattice, edge| {
            lattice.does_complete_square(edge).unwrap_or(false)
        })
    }

    /// Candidates that leave every adjacent square at least `min_distance`
    /// edges from completion once played.
    ///
    /// With [`DEFAULT_SAFE_DISTANCE`] this keeps edges that neither complete
    /// a square nor give the next player one.
    #[instrument(skip(lattice, candidates))]
    pub fn safe_moves(lattice: &Lattice, candidates: Option<&MoveSet>, min_distance: u8) -> Self {
        Self::filter_candidates(lattice, candidates, |lattice, edge| {
            match lattice.edge_state(edge) {
                Ok(Some(state)) => distance(lattice.max_present_count(edge, state)) >= min_distance,
                _ => false,
            }
        })
    }

    fn filter_candidates(
        lattice: &Lattice,
        candidates: Option<&MoveSet>,
        keep: impl Fn(&Lattice, Edge) -> bool,
    ) -> Self {
        let set: MoveSet = match candidates {
            Some(candidates) => candidates
                .iter()
                .filter(|edge| lattice.is_free(*edge).unwrap_or(false))
                .filter(|edge| keep(lattice, *edge))
                .collect(),
            None => lattice
                .free_edges()
                .map(|(edge, _)| edge)
                .filter(|edge| keep(lattice, *edge))
                .collect(),
        };
        debug!(count = set.len(), "Filtered candidates");
        set
    }

    /// Uniformly random edge, or `None` when the set is empty.
    pub fn pick_random<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Edge> {
        if self.edges.is_empty() {
            return None;
        }
        Some(self.edges[rng.random_range(0..self.edges.len())])
    }

    /// Lowest-ordered edge, or `None` when the set is empty.
    pub fn pick_sequential(&self) -> Option<Edge> {
        self.edges.first().copied()
    }

    /// Picks an edge using `strategy`.
    pub fn pick<R: Rng + ?Sized>(&self, strategy: MoveStrategy, rng: &mut R) -> Option<Edge> {
        match strategy {
            MoveStrategy::Random => self.pick_random(rng),
            MoveStrategy::Sequential => self.pick_sequential(),
        }
    }

    /// True if `edge` is in the set.
    pub fn contains(&self, edge: Edge) -> bool {
        self.edges.binary_search(&edge).is_ok()
    }

    /// Number of edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// True if the set holds no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Edges in order.
    pub fn iter(&self) -> impl Iterator<Item = Edge> + '_ {
        self.edges.iter().copied()
    }
}

impl FromIterator<Edge> for MoveSet {
    fn from_iter<I: IntoIterator<Item = Edge>>(iter: I) -> Self {
        let mut edges: Vec<Edge> = iter.into_iter().collect();
        edges.sort_unstable();
        edges.dedup();
        Self { edges }
    }
}

impl IntoIterator for MoveSet {
    type Item = Edge;
    type IntoIter = std::vec::IntoIter<Edge>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.into_iter()
    }
}

impl<'a> IntoIterator for &'a MoveSet {
    type Item = Edge;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, Edge>>;

    fn into_iter(self) -> Self::IntoIter {
        self.edges.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PlayerId, Square};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn p1() -> PlayerId {
        PlayerId::first()
    }

    #[test]
    fn test_free_edges_exclude_drawn_and_sentinels() {
        let mut lattice = Lattice::new(2, 2, 2).unwrap();
        assert_eq!(MoveSet::free_edges(&lattice).len(), 12);
        lattice.set_edge(Edge::horizontal(1, 1), p1()).unwrap();
        let free = MoveSet::free_edges(&lattice);
        assert_eq!(free.len(), 11);
        assert!(!free.contains(Edge::horizontal(1, 1)));
        assert!(!free.contains(Edge::horizontal(1, 3)));
        assert!(!free.contains(Edge::vertical(3, 1)));
    }

    #[test]
    fn test_edges_at_distance() {
        let mut lattice = Lattice::new(2, 2, 2).unwrap();
        lattice.set_edge(Edge::horizontal(1, 1), p1()).unwrap();
        lattice.set_edge(Edge::vertical(1, 1), p1()).unwrap();

        // Square (1,1) has two sides drawn: its two remaining sides are threats.
        let threats = MoveSet::edges_at_distance(&lattice, 2);
        assert_eq!(
            threats.iter().collect::<Vec<_>>(),
            vec![Edge::vertical(1, 2), Edge::horizontal(2, 1)]
        );
        assert!(MoveSet::edges_at_distance(&lattice, 3).is_empty());

        lattice.set_edge(Edge::vertical(1, 2), p1()).unwrap();
        let completing = MoveSet::edges_at_distance(&lattice, 3);
        assert_eq!(completing.iter().collect::<Vec<_>>(), vec![Edge::horizontal(2, 1)]);
    }

    #[test]
    fn test_square_completing_moves_with_candidates() {
        let mut lattice = Lattice::new(1, 2, 2).unwrap();
        for edge in [Edge::horizontal(1, 1), Edge::horizontal(2, 1), Edge::vertical(1, 1)] {
            lattice.set_edge(edge, p1()).unwrap();
        }
        let all = MoveSet::square_completing_moves(&lattice, None);
        assert_eq!(all.iter().collect::<Vec<_>>(), vec![Edge::vertical(1, 2)]);

        let candidates: MoveSet = [Edge::vertical(1, 3), Edge::horizontal(1, 1)].into_iter().collect();
        assert!(MoveSet::square_completing_moves(&lattice, Some(&candidates)).is_empty());
    }

    #[test]
    fn test_safe_moves() {
        let mut lattice = Lattice::new(2, 2, 2).unwrap();
        lattice.set_edge(Edge::horizontal(1, 1), p1()).unwrap();
        lattice.set_edge(Edge::vertical(1, 1), p1()).unwrap();
        let safe = MoveSet::safe_moves(&lattice, None, DEFAULT_SAFE_DISTANCE);
        assert!(!safe.contains(Edge::vertical(1, 2)));
        assert!(!safe.contains(Edge::horizontal(2, 1)));
        assert!(safe.contains(Edge::horizontal(3, 2)));
        assert_eq!(safe.len(), MoveSet::free_edges(&lattice).len() - 2);

        // Distance 0 admits everything free.
        assert_eq!(
            MoveSet::safe_moves(&lattice, None, 0),
            MoveSet::free_edges(&lattice)
        );
    }

    #[test]
    fn test_pick_sequential_is_lowest() {
        let set: MoveSet = [Edge::vertical(2, 1), Edge::horizontal(1, 2), Edge::vertical(1, 2)]
            .into_iter()
            .collect();
        assert_eq!(set.pick_sequential(), Some(Edge::horizontal(1, 2)));
    }

    #[test]
    fn test_pick_on_empty_is_none() {
        let set = MoveSet::new();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(set.pick_sequential(), None);
        assert_eq!(set.pick_random(&mut rng), None);
        assert_eq!(set.pick(MoveStrategy::Sequential, &mut rng), None);
    }

    #[test]
    fn test_pick_random_is_reproducible() {
        let lattice = Lattice::new(3, 3, 2).unwrap();
        let free = MoveSet::free_edges(&lattice);
        let picks = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            (0..10).map(|_| free.pick_random(&mut rng)).collect::<Vec<_>>()
        };
        assert_eq!(picks(42), picks(42));
        assert!(picks(42).iter().all(|e| e.is_some_and(|e| free.contains(e))));
    }

    #[test]
    fn test_collect_sorts_and_dedups() {
        let set: MoveSet = [Edge::vertical(1, 1), Edge::horizontal(1, 1), Edge::vertical(1, 1)]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
        assert_eq!(
            set.into_iter().collect::<Vec<_>>(),
            vec![Edge::horizontal(1, 1), Edge::vertical(1, 1)]
        );
    }

    #[test]
    fn test_strategy_parse() {
        use strum::IntoEnumIterator;
        for strategy in MoveStrategy::iter() {
            assert_eq!(strategy.to_string().parse::<MoveStrategy>().unwrap(), strategy);
        }
        assert_eq!("seq".parse::<MoveStrategy>().unwrap(), MoveStrategy::Sequential);
        assert_eq!("Random".parse::<MoveStrategy>().unwrap(), MoveStrategy::Random);
        assert!("greedy".parse::<MoveStrategy>().is_err());
    }

    #[test]
    fn test_full_board_has_no_moves() {
        let mut lattice = Lattice::new(1, 1, 1).unwrap();
        for edge in Square::new(1, 1).bounding_edges() {
            lattice.set_edge(edge, p1()).unwrap();
        }
        assert!(MoveSet::free_edges(&lattice).pick_sequential().is_none());
    }
}
