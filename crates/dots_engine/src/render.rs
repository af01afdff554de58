//! ASCII rendering of a lattice.

use crate::lattice::Lattice;
use crate::types::{Edge, Orientation, Square};
use std::fmt;

const DOT: char = '*';
const DOT_JOINED: char = '+';
const HORIZONTAL: char = '-';
const HORIZONTAL_LAST: char = '=';
const VERTICAL: char = '|';
const VERTICAL_LAST: char = '$';
const INDENT: &str = "    ";

/// Text view of a lattice.
///
/// ```text
/// Move:4 Player:2 row:1 col:2 V squares: [1,1]
///     +---+---*
///     | 2 $
///     +---+   *
/// ```
///
/// Dots touching a drawn edge are `+`, the most recently recorded move is
/// drawn with `=` or `$`, and completed squares show their owner's number
/// (hexadecimal above 9).
#[derive(Debug, Clone, Copy)]
pub struct BoardText<'a> {
    lattice: &'a Lattice,
    vertical_chars: usize,
    horizontal_chars: usize,
    show_owners: bool,
}

impl<'a> BoardText<'a> {
    /// Renderer with two characters per vertical edge and four per horizontal.
    pub fn new(lattice: &'a Lattice) -> Self {
        Self {
            lattice,
            vertical_chars: 2,
            horizontal_chars: 4,
            show_owners: true,
        }
    }

    /// Sets the rows per vertical edge (minimum 2, counting one dot);
    /// horizontal edges become twice as wide.
    pub fn with_vertical_chars(mut self, chars: usize) -> Self {
        self.vertical_chars = chars.max(2);
        self.horizontal_chars = self.vertical_chars * 2;
        self
    }

    /// Sets the columns per horizontal edge (minimum 2, counting one dot).
    pub fn with_horizontal_chars(mut self, chars: usize) -> Self {
        self.horizontal_chars = chars.max(2);
        self
    }

    /// Whether completed squares show their owner.
    pub fn with_owners(mut self, show: bool) -> Self {
        self.show_owners = show;
        self
    }

    /// Board lines without the header, trailing spaces trimmed.
    pub fn lines(&self) -> Vec<String> {
        let lattice = self.lattice;
        let (cv, ch) = (self.vertical_chars, self.horizontal_chars);
        let height = lattice.nrow() as usize * cv + 1;
        let width = lattice.ncol() as usize * ch + 1;
        let mut grid = vec![vec![' '; width]; height];

        for row in 0..=lattice.nrow() as usize {
            for col in 0..=lattice.ncol() as usize {
                grid[row * cv][col * ch] = DOT;
            }
        }

        let last = lattice.ledger().last().map(|r| r.edge());
        for (edge, _) in lattice.set_edges() {
            self.draw_edge(&mut grid, edge, Some(edge) == last);
        }

        if self.show_owners {
            for (square, owner) in lattice.squares() {
                if let Some(player) = owner {
                    let (r, c) = self.square_centre(square);
                    grid[r][c] =
                        char::from_digit(u32::from(player.number()), 16).unwrap_or('?');
                }
            }
        }

        grid.into_iter()
            .map(|line| {
                let text: String = line.into_iter().collect();
                format!("{}{}", INDENT, text).trim_end().to_string()
            })
            .collect()
    }

    fn draw_edge(&self, grid: &mut [Vec<char>], edge: Edge, last: bool) {
        let (cv, ch) = (self.vertical_chars, self.horizontal_chars);
        let top = (edge.row as usize - 1) * cv;
        let left = (edge.col as usize - 1) * ch;
        match edge.orientation {
            Orientation::Horizontal => {
                let mark = if last { HORIZONTAL_LAST } else { HORIZONTAL };
                for cell in &mut grid[top][left + 1..left + ch] {
                    *cell = mark;
                }
                grid[top][left] = DOT_JOINED;
                grid[top][left + ch] = DOT_JOINED;
            }
            Orientation::Vertical => {
                let mark = if last { VERTICAL_LAST } else { VERTICAL };
                for line in &mut grid[top + 1..top + cv] {
                    line[left] = mark;
                }
                grid[top][left] = DOT_JOINED;
                grid[top + cv][left] = DOT_JOINED;
            }
        }
    }

    fn square_centre(&self, square: Square) -> (usize, usize) {
        (
            (square.row as usize - 1) * self.vertical_chars + self.vertical_chars / 2,
            (square.col as usize - 1) * self.horizontal_chars + self.horizontal_chars / 2,
        )
    }
}

impl fmt::Display for BoardText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(record) = self.lattice.ledger().last() {
            writeln!(f, "{}", record)?;
        }
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
