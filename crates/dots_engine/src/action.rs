//! First-class move requests.

use crate::types::{Edge, PlayerId};
use serde::{Deserialize, Serialize};

/// A player's request to draw an edge.
///
/// Moves can be validated against a lattice (see [`crate::MoveContract`])
/// before they are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The player drawing the edge.
    pub player: PlayerId,
    /// The edge to draw.
    pub edge: Edge,
}

impl Move {
    /// Creates a new move.
    pub fn new(player: PlayerId, edge: Edge) -> Self {
        Self { player, edge }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {} -> {}", self.player, self.edge)
    }
}
