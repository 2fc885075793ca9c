//! Application display state.
//!
//! Holds whatever the UI needs to draw a frame: the latest snapshot, the
//! claimed color, the keyboard cursor, and any pending notice. All of it is
//! overwritten by controller events; none of it feeds back into turn
//! decisions.

use crate::board::{BOARD_SIZE, BoardSnapshot, Color, Coord};
use crate::controller::GameEvent;
use crate::input;
use crossterm::event::KeyCode;
use tracing::debug;

/// UI-side state, updated from [`GameEvent`]s.
pub struct App {
    snapshot: Option<BoardSnapshot>,
    claimed: Option<Color>,
    cursor: Coord,
    notice: Option<String>,
}

impl App {
    /// Creates the initial application state.
    pub fn new() -> Self {
        Self {
            snapshot: None,
            claimed: None,
            cursor: Coord::new(0, 0),
            notice: None,
        }
    }

    /// The most recently received snapshot, if any.
    pub fn snapshot(&self) -> Option<&BoardSnapshot> {
        self.snapshot.as_ref()
    }

    /// The side claimed for this session, if any.
    pub fn claimed(&self) -> Option<Color> {
        self.claimed
    }

    /// Current keyboard cursor position.
    pub fn cursor(&self) -> Coord {
        self.cursor
    }

    /// A pending blocking notice, if one is being shown.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Board dimension to navigate; falls back to the server contract's
    /// default before the first snapshot arrives.
    pub fn board_size(&self) -> usize {
        self.snapshot
            .as_ref()
            .map(BoardSnapshot::size)
            .filter(|size| *size > 0)
            .unwrap_or(BOARD_SIZE)
    }

    /// Applies a controller event.
    pub fn handle_event(&mut self, event: GameEvent) {
        debug!(?event, "Handling game event");
        match event {
            GameEvent::Board(snapshot) => {
                // Latest fetch wins; old snapshots are discarded wholesale.
                self.snapshot = Some(snapshot);
            }
            GameEvent::ColorClaimed(color) => {
                self.claimed = Some(color);
            }
            GameEvent::MoveRejected => {
                self.notice = Some("Invalid move!".to_string());
            }
            GameEvent::Notice(message) => {
                self.notice = Some(message);
            }
            GameEvent::TransportFailure(message) => {
                self.notice = Some(format!("Server unreachable: {message} (press u to retry)"));
            }
        }
    }

    /// Moves the cursor one cell, staying on the board.
    pub fn move_cursor(&mut self, key: KeyCode) {
        self.cursor = input::move_cursor(self.cursor, key, self.board_size());
    }

    /// Clears a pending notice. Returns whether one was showing, in which
    /// case the triggering input should be treated as the dismissal.
    pub fn dismiss_notice(&mut self) -> bool {
        self.notice.take().is_some()
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
