//! Cursor movement for keyboard navigation.

use crate::board::Coord;
use crossterm::event::KeyCode;

/// Moves the cursor one cell in the direction of an arrow key, clamped to
/// the board. Any other key leaves the cursor in place, so the cursor can
/// never leave `[0, size)` in either axis.
pub fn move_cursor(cursor: Coord, key: KeyCode, size: usize) -> Coord {
    if size == 0 {
        return cursor;
    }
    let max = size - 1;
    match key {
        KeyCode::Up => Coord::new(cursor.row.saturating_sub(1), cursor.col),
        KeyCode::Down => Coord::new(cursor.row.saturating_add(1).min(max), cursor.col),
        KeyCode::Left => Coord::new(cursor.row, cursor.col.saturating_sub(1)),
        KeyCode::Right => Coord::new(cursor.row, cursor.col.saturating_add(1).min(max)),
        _ => cursor,
    }
}
