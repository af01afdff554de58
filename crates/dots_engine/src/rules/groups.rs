//! Completion-group construction.
//!
//! Every completion and threat query reduces to counting the set members of
//! one of the two 3-edge groups below.
//!
//! ```text
//!   Horizontal edge E = (r,c,H)
//!
//!                 (r-1,c,H)
//!              +-------------+
//!   (r-1,c,V)  |   before    |  (r-1,c+1,V)
//!              +======E======+
//!     (r,c,V)  |    after    |  (r,c+1,V)
//!              +-------------+
//!                 (r+1,c,H)
//!
//!   Vertical edge E = (r,c,V)
//!
//!                 (r,c-1,H)       (r,c,H)
//!              +-------------+-------------+
//!   (r,c-1,V)  |   before    E    after    |  (r,c+1,V)
//!              +-------------+-------------+
//!                (r+1,c-1,H)     (r+1,c,H)
//! ```

use crate::types::{Edge, Orientation, Side, Square};
use strum::IntoEnumIterator;
use tracing::instrument;

/// The square on `side` of a playable `edge`, if it lies on the lattice.
#[instrument(level = "trace")]
pub fn adjacent_square(nrow: u32, ncol: u32, edge: Edge, side: Side) -> Option<Square> {
    let Edge { row, col, .. } = edge;
    match (edge.orientation, side) {
        (Orientation::Horizontal, Side::Before) => (row > 1).then(|| Square::new(row - 1, col)),
        (Orientation::Horizontal, Side::After) => (row <= nrow).then(|| Square::new(row, col)),
        (Orientation::Vertical, Side::Before) => (col > 1).then(|| Square::new(row, col - 1)),
        (Orientation::Vertical, Side::After) => (col <= ncol).then(|| Square::new(row, col)),
    }
}

/// Sides of a playable `edge` that have a square on the lattice.
pub fn present_sides(nrow: u32, ncol: u32, edge: Edge) -> impl Iterator<Item = Side> {
    Side::iter().filter(move |side| adjacent_square(nrow, ncol, edge, *side).is_some())
}

/// The three edges that, together with `edge`, bound the square on `side`.
///
/// For a horizontal edge at `(r, c)` the before group is
/// `{(r-1,c,V), (r-1,c,H), (r-1,c+1,V)}` and the after group
/// `{(r,c,V), (r+1,c,H), (r,c+1,V)}`; vertical edges mirror this with
/// columns in place of rows.
#[instrument(level = "trace")]
pub fn completion_group(nrow: u32, ncol: u32, edge: Edge, side: Side) -> Option<[Edge; 3]> {
    let square = adjacent_square(nrow, ncol, edge, side)?;
    let mut group = [edge; 3];
    let mut others = square.bounding_edges().into_iter().filter(|e| *e != edge);
    for slot in group.iter_mut() {
        *slot = others.next()?;
    }
    Some(group)
}

/// Which side of `edge` the bounded `square` lies on.
///
/// A square is the after-square of its top and left edges and the
/// before-square of its bottom and right edges.
pub fn side_of(edge: Edge, square: Square) -> Side {
    let leading = match edge.orientation {
        Orientation::Horizontal => edge.row == square.row,
        Orientation::Vertical => edge.col == square.col,
    };
    if leading { Side::After } else { Side::Before }
}
