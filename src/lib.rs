//! BlacknWhite terminal client
//!
//! A thin client for the BlacknWhite (Othello/Reversi) game server. The
//! server owns the rules, the AI, and the game state; this crate renders
//! server snapshots in a terminal UI and drives the turn-taking loop,
//! including triggering the server AI whenever it is the opponent's turn.
//!
//! # Architecture
//!
//! - **client**: HTTP access to the server's board/move/pass/reset/ai_move
//!   endpoints, behind the [`GameApi`] trait so tests can substitute a fake
//! - **controller**: the turn state machine, run as a task that consumes
//!   [`Command`]s and emits [`GameEvent`]s
//! - **app** / **ui**: display state and ratatui rendering; no decision logic
//!
//! # Example
//!
//! ```no_run
//! use blacknwhite_tui::{Command, HttpGameClient, TurnController};
//! use std::time::Duration;
//! use tokio::sync::mpsc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let api = HttpGameClient::new("http://127.0.0.1:5000");
//! let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
//! let (event_tx, _event_rx) = mpsc::unbounded_channel();
//! let controller = TurnController::new(Box::new(api), Duration::from_millis(500), event_tx);
//! tokio::spawn(controller.run(cmd_rx));
//! cmd_tx.send(Command::Refresh)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod app;
pub mod board;
pub mod cli;
pub mod client;
pub mod controller;
pub mod input;
pub mod ui;

// Crate-level exports - board model
pub use board::{BOARD_SIZE, BoardSnapshot, Color, Coord, Square};

// Crate-level exports - server client
pub use client::{ApiError, GameApi, HttpGameClient};

// Crate-level exports - turn state machine
pub use controller::{Command, GameEvent, TurnController};

// Crate-level exports - UI state
pub use app::App;
