//! Core domain types for the dots lattice.

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

/// Orientation of an edge.
///
/// Ordered `Horizontal < Vertical` so that edges sort by `(row, col, orientation)`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
pub enum Orientation {
    /// Edge joining two dots in the same row.
    #[display("H")]
    Horizontal,
    /// Edge joining two dots in the same column.
    #[display("V")]
    Vertical,
}

impl Orientation {
    /// Index of this orientation in the edge storage (0 horizontal, 1 vertical).
    pub(crate) fn index(self) -> usize {
        match self {
            Orientation::Horizontal => 0,
            Orientation::Vertical => 1,
        }
    }
}

impl FromStr for Orientation {
    type Err = ParseError;

    #[instrument]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "h" | "horizontal" => Ok(Orientation::Horizontal),
            "v" | "vertical" => Ok(Orientation::Vertical),
            other => Err(ParseError::new(format!("Unknown orientation: {}", other))),
        }
    }
}

/// An edge of the lattice: the unit of a move.
///
/// Rows and columns are 1-based. Horizontal edges run from dot `(row, col)`
/// to dot `(row, col + 1)`; vertical edges from dot `(row, col)` to dot
/// `(row + 1, col)`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[display("{row},{col},{orientation}")]
pub struct Edge {
    /// Dot row, starting at 1 for the top of the lattice.
    pub row: u32,
    /// Dot column, starting at 1 for the left of the lattice.
    pub col: u32,
    /// Horizontal or vertical.
    pub orientation: Orientation,
}

impl Edge {
    /// Creates a new edge.
    pub const fn new(row: u32, col: u32, orientation: Orientation) -> Self {
        Self {
            row,
            col,
            orientation,
        }
    }

    /// Shorthand for a horizontal edge.
    pub const fn horizontal(row: u32, col: u32) -> Self {
        Self::new(row, col, Orientation::Horizontal)
    }

    /// Shorthand for a vertical edge.
    pub const fn vertical(row: u32, col: u32) -> Self {
        Self::new(row, col, Orientation::Vertical)
    }

    /// Returns true for horizontal edges.
    pub fn is_horizontal(&self) -> bool {
        self.orientation == Orientation::Horizontal
    }
}

impl FromStr for Edge {
    type Err = ParseError;

    /// Parses `row,col,H` (the `Display` form). Whitespace may separate the
    /// parts instead of commas.
    #[instrument]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect();
        let [row, col, orientation] = parts.as_slice() else {
            return Err(ParseError::new(format!(
                "Expected row,col,orientation but got: {}",
                s
            )));
        };
        let row = row
            .parse::<u32>()
            .map_err(|e| ParseError::new(format!("Bad row {}: {}", row, e)))?;
        let col = col
            .parse::<u32>()
            .map_err(|e| ParseError::new(format!("Bad col {}: {}", col, e)))?;
        Ok(Edge::new(row, col, orientation.parse()?))
    }
}

/// A square of the lattice, 1-based.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[display("[{row},{col}]")]
pub struct Square {
    /// Square row, starting at 1.
    pub row: u32,
    /// Square column, starting at 1.
    pub col: u32,
}

impl Square {
    /// Creates a new square reference.
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// The four edges bounding this square: top, bottom, left, right.
    pub fn bounding_edges(&self) -> [Edge; 4] {
        [
            Edge::horizontal(self.row, self.col),
            Edge::horizontal(self.row + 1, self.col),
            Edge::vertical(self.row, self.col),
            Edge::vertical(self.row, self.col + 1),
        ]
    }
}

/// Player number. Owners are stored in a small field so at most 15 players
/// can take part.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct PlayerId(u8);

impl PlayerId {
    /// Highest representable player number.
    pub const MAX: u8 = 15;

    /// Creates a player id, or `None` outside `1..=15`.
    pub fn new(number: u8) -> Option<Self> {
        (1..=Self::MAX).contains(&number).then_some(Self(number))
    }

    /// The first player.
    pub const fn first() -> Self {
        Self(1)
    }

    /// Player number, 1-based.
    pub fn number(self) -> u8 {
        self.0
    }
}

/// Which of the (up to) two squares adjacent to an edge.
///
/// `Before` is the square above a horizontal edge or left of a vertical one;
/// `After` is the square below or to the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum Side {
    /// Square above / to the left.
    Before,
    /// Square below / to the right.
    After,
}

/// Owner field of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EdgeOwner {
    /// Not yet drawn.
    #[default]
    Free,
    /// Drawn by a player.
    Player(PlayerId),
    /// Padding position outside the true lattice; never playable.
    Unusable,
}

impl EdgeOwner {
    /// The owning player, if the edge has been drawn.
    pub fn player(self) -> Option<PlayerId> {
        match self {
            EdgeOwner::Player(p) => Some(p),
            EdgeOwner::Free | EdgeOwner::Unusable => None,
        }
    }
}

/// Snapshot of one edge: owner plus completion counters.
///
/// `before` / `after` count the set edges among the three other sides of the
/// square on that side of the edge (0 when there is no such square).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct EdgeState {
    /// Who drew the edge.
    pub owner: EdgeOwner,
    /// Set edges in the before-group, 0..=3.
    pub before: u8,
    /// Set edges in the after-group, 0..=3.
    pub after: u8,
}

impl EdgeState {
    pub(crate) const UNUSABLE: EdgeState = EdgeState {
        owner: EdgeOwner::Unusable,
        before: 0,
        after: 0,
    };

    /// True once a player has drawn this edge.
    pub fn is_set(&self) -> bool {
        matches!(self.owner, EdgeOwner::Player(_))
    }

    /// True if the edge is playable and not yet drawn.
    pub fn is_free(&self) -> bool {
        self.owner == EdgeOwner::Free
    }

    /// Counter for the given side.
    pub fn count(&self, side: Side) -> u8 {
        match side {
            Side::Before => self.before,
            Side::After => self.after,
        }
    }

    pub(crate) fn count_mut(&mut self, side: Side) -> &mut u8 {
        match side {
            Side::Before => &mut self.before,
            Side::After => &mut self.after,
        }
    }
}

/// Squares completed by a single edge: zero, one or two.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Completion {
    squares: Vec<Square>,
}

impl Completion {
    /// No squares completed.
    pub fn none() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, square: Square) {
        self.squares.push(square);
    }

    /// Completed squares, before-side first.
    pub fn squares(&self) -> &[Square] {
        &self.squares
    }

    /// Number of squares completed.
    pub fn count(&self) -> usize {
        self.squares.len()
    }

    /// True if at least one square was completed.
    pub fn any(&self) -> bool {
        !self.squares.is_empty()
    }

    /// Consumes the completion, returning its squares.
    pub fn into_squares(self) -> Vec<Square> {
        self.squares
    }
}
