//! Wire-level board state shared with the game server.

use serde::{Deserialize, Serialize};

/// Board dimension fixed by the server contract (8x8).
pub const BOARD_SIZE: usize = 8;

/// State of a single square on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Square {
    /// No piece. Older server revisions name this `EMPTY`.
    #[serde(alias = "EMPTY")]
    Open,
    /// A black piece.
    Black,
    /// A white piece.
    White,
}

/// A playing side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Color {
    /// The black side.
    Black,
    /// The white side.
    White,
}

impl Color {
    /// The other side.
    pub fn opponent(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }
}

/// Zero-based board position, row-major from the top-left.
///
/// Serializes as `{"row": r, "col": c}`, the move request body the server
/// expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coord {
    /// Row index in `[0, board size)`.
    pub row: usize,
    /// Column index in `[0, board size)`.
    pub col: usize,
}

impl Coord {
    /// Creates a coordinate.
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Authoritative game state as returned by `GET /api/board`.
///
/// Snapshots are never merged or patched locally. Whatever the latest fetch
/// returned replaces everything the client previously knew.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// Cell states, `grid[row][col]`.
    pub grid: Vec<Vec<Square>>,
    /// The side whose turn it is.
    pub current_turn: Color,
    /// Number of white pieces on the board.
    pub white_count: u32,
    /// Number of black pieces on the board.
    pub black_count: u32,
    /// Whether the game has ended. Absent in older server revisions.
    #[serde(default)]
    pub game_over: bool,
}

impl BoardSnapshot {
    /// Board dimension of this snapshot.
    pub fn size(&self) -> usize {
        self.grid.len()
    }

    /// The square at `coord`, or `None` when out of range.
    pub fn square(&self, coord: Coord) -> Option<Square> {
        self.grid.get(coord.row).and_then(|row| row.get(coord.col)).copied()
    }

    /// The side leading on piece count, `None` on a tie.
    ///
    /// Only meaningful once [`game_over`](Self::game_over) is set; the
    /// server does not report a winner field, so the client derives it from
    /// the final counts.
    pub fn winner(&self) -> Option<Color> {
        match self.white_count.cmp(&self.black_count) {
            std::cmp::Ordering::Greater => Some(Color::White),
            std::cmp::Ordering::Less => Some(Color::Black),
            std::cmp::Ordering::Equal => None,
        }
    }
}
