//! Tests for the turn-synchronization state machine.
//!
//! The controller is driven end to end against a scripted in-memory server
//! double with a zero AI delay, so every scenario is deterministic.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use blacknwhite_tui::board::{BOARD_SIZE, BoardSnapshot, Color, Coord, Square};
use blacknwhite_tui::client::{ApiError, GameApi, StatusCode};
use blacknwhite_tui::controller::{Command, GameEvent, TurnController};
use tokio::sync::mpsc;

fn snapshot(turn: Color, game_over: bool) -> BoardSnapshot {
    BoardSnapshot {
        grid: vec![vec![Square::Open; BOARD_SIZE]; BOARD_SIZE],
        current_turn: turn,
        white_count: 2,
        black_count: 2,
        game_over,
    }
}

fn transport_error() -> ApiError {
    ApiError::Transport {
        message: "connection refused".to_string(),
    }
}

/// Scripted server double; records every command it receives.
#[derive(Default)]
struct FakeServer {
    boards: Mutex<VecDeque<Result<BoardSnapshot, ApiError>>>,
    last_board: Mutex<Option<BoardSnapshot>>,
    reject_moves: bool,
    moves: Mutex<Vec<Coord>>,
    ai_moves: Mutex<usize>,
    passes: Mutex<usize>,
    resets: Mutex<usize>,
}

impl FakeServer {
    /// Each `board()` call consumes the next scripted response; once the
    /// script runs out, the last successful snapshot repeats.
    fn scripted(boards: Vec<Result<BoardSnapshot, ApiError>>) -> Arc<Self> {
        Arc::new(Self {
            boards: Mutex::new(boards.into()),
            ..Self::default()
        })
    }

    fn rejecting_moves(boards: Vec<Result<BoardSnapshot, ApiError>>) -> Arc<Self> {
        Arc::new(Self {
            boards: Mutex::new(boards.into()),
            reject_moves: true,
            ..Self::default()
        })
    }

    fn moves(&self) -> Vec<Coord> {
        self.moves.lock().expect("moves lock").clone()
    }

    fn ai_moves(&self) -> usize {
        *self.ai_moves.lock().expect("ai_moves lock")
    }
}

struct FakeApi(Arc<FakeServer>);

#[async_trait::async_trait]
impl GameApi for FakeApi {
    async fn board(&self) -> Result<BoardSnapshot, ApiError> {
        let next = self.0.boards.lock().expect("boards lock").pop_front();
        match next {
            Some(Ok(board)) => {
                *self.0.last_board.lock().expect("last_board lock") = Some(board.clone());
                Ok(board)
            }
            Some(Err(e)) => Err(e),
            None => self
                .0
                .last_board
                .lock()
                .expect("last_board lock")
                .clone()
                .ok_or_else(|| ApiError::Transport {
                    message: "board script exhausted".to_string(),
                }),
        }
    }

    async fn make_move(&self, coord: Coord) -> Result<(), ApiError> {
        self.0.moves.lock().expect("moves lock").push(coord);
        if self.0.reject_moves {
            return Err(ApiError::Rejected {
                status: StatusCode::BAD_REQUEST,
            });
        }
        Ok(())
    }

    async fn pass(&self) -> Result<(), ApiError> {
        *self.0.passes.lock().expect("passes lock") += 1;
        Ok(())
    }

    async fn reset(&self) -> Result<(), ApiError> {
        *self.0.resets.lock().expect("resets lock") += 1;
        Ok(())
    }

    async fn ai_move(&self) -> Result<(), ApiError> {
        *self.0.ai_moves.lock().expect("ai_moves lock") += 1;
        Ok(())
    }
}

/// Runs the controller over `commands` and returns every emitted event.
async fn drive(server: Arc<FakeServer>, commands: Vec<Command>) -> Vec<GameEvent> {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let controller = TurnController::new(Box::new(FakeApi(server)), Duration::ZERO, event_tx);
    let handle = tokio::spawn(controller.run(cmd_rx));

    for command in commands {
        cmd_tx.send(command).expect("controller is running");
    }
    drop(cmd_tx);
    handle
        .await
        .expect("controller task panicked")
        .expect("controller failed");

    let mut events = Vec::new();
    while let Ok(event) = event_rx.try_recv() {
        events.push(event);
    }
    events
}

fn board_events(events: &[GameEvent]) -> usize {
    events.iter().filter(|e| matches!(e, GameEvent::Board(_))).count()
}

#[tokio::test]
async fn startup_fetch_renders_the_board() {
    let server = FakeServer::scripted(vec![Ok(snapshot(Color::White, false))]);
    let events = drive(server.clone(), vec![]).await;

    assert_eq!(events, vec![GameEvent::Board(snapshot(Color::White, false))]);
    assert!(server.moves().is_empty());
    assert_eq!(server.ai_moves(), 0);
}

#[tokio::test]
async fn click_before_color_selection_stays_local() {
    let server = FakeServer::scripted(vec![Ok(snapshot(Color::White, false))]);
    let events = drive(server.clone(), vec![Command::CellClick(Coord::new(2, 3))]).await;

    assert!(server.moves().is_empty(), "no network call before a color is claimed");
    assert_eq!(board_events(&events), 1, "only the startup fetch renders");
    assert!(events.iter().any(|e| matches!(e, GameEvent::Notice(_))));
}

#[tokio::test]
async fn click_on_own_turn_sends_exactly_one_move() {
    // White to move throughout; the player claims White.
    let server = FakeServer::scripted(vec![
        Ok(snapshot(Color::White, false)), // startup
        Ok(snapshot(Color::White, false)), // select refresh
        Ok(snapshot(Color::White, false)), // pre-move re-check
        Ok(snapshot(Color::White, false)), // post-move refresh
    ]);
    let events = drive(
        server.clone(),
        vec![
            Command::SelectColor(Color::White),
            Command::CellClick(Coord::new(3, 2)),
        ],
    )
    .await;

    assert_eq!(server.moves(), vec![Coord::new(3, 2)]);
    assert_eq!(server.ai_moves(), 0);
    assert!(events.contains(&GameEvent::ColorClaimed(Color::White)));
}

#[tokio::test]
async fn click_out_of_turn_is_discarded() {
    // The rendered board says White to move, but the fresh pre-move fetch
    // reveals the turn has already passed to Black.
    let server = FakeServer::scripted(vec![
        Ok(snapshot(Color::White, false)), // startup
        Ok(snapshot(Color::White, false)), // select refresh
        Ok(snapshot(Color::Black, false)), // pre-move re-check: stale click
    ]);
    let events = drive(
        server.clone(),
        vec![
            Command::SelectColor(Color::White),
            Command::CellClick(Coord::new(0, 0)),
        ],
    )
    .await;

    assert!(server.moves().is_empty(), "no move request out of turn");
    assert_eq!(server.ai_moves(), 0, "a discarded click does not start the AI chain");
    assert_eq!(board_events(&events), 3);
}

#[tokio::test]
async fn rejected_move_notifies_and_changes_nothing() {
    let server = FakeServer::rejecting_moves(vec![
        Ok(snapshot(Color::White, false)), // startup
        Ok(snapshot(Color::White, false)), // select refresh
        Ok(snapshot(Color::White, false)), // pre-move re-check
    ]);
    let events = drive(
        server.clone(),
        vec![
            Command::SelectColor(Color::White),
            Command::CellClick(Coord::new(0, 0)),
        ],
    )
    .await;

    assert_eq!(server.moves().len(), 1);
    let rejections = events.iter().filter(|e| matches!(e, GameEvent::MoveRejected)).count();
    assert_eq!(rejections, 1);
    // No refresh follows a rejection: the last rendered board is still the
    // pre-move snapshot.
    assert_eq!(board_events(&events), 3);
    assert_eq!(
        events.iter().rev().find(|e| matches!(e, GameEvent::Board(_))),
        Some(&GameEvent::Board(snapshot(Color::White, false)))
    );
}

#[tokio::test]
async fn color_selection_drives_ai_until_own_turn() {
    // The player claims Black while White is to move; the chain requests
    // one AI move per opponent turn and stops when Black is to move.
    let server = FakeServer::scripted(vec![
        Ok(snapshot(Color::White, false)), // startup
        Ok(snapshot(Color::White, false)), // select refresh: opponent to move
        Ok(snapshot(Color::White, false)), // after AI move 1: still opponent
        Ok(snapshot(Color::Black, false)), // after AI move 2: player's turn
    ]);
    let events = drive(server.clone(), vec![Command::SelectColor(Color::Black)]).await;

    assert_eq!(server.ai_moves(), 2);
    assert_eq!(board_events(&events), 4);
}

#[tokio::test]
async fn ai_chain_stops_at_game_over() {
    let server = FakeServer::scripted(vec![
        Ok(snapshot(Color::White, false)), // startup
        Ok(snapshot(Color::White, false)), // select refresh: opponent to move
        Ok(snapshot(Color::White, true)),  // after AI move: game over
    ]);
    let events = drive(server.clone(), vec![Command::SelectColor(Color::Black)]).await;

    assert_eq!(server.ai_moves(), 1);
    assert_eq!(board_events(&events), 3);
}

#[tokio::test]
async fn second_color_selection_is_rejected() {
    let server = FakeServer::scripted(vec![
        Ok(snapshot(Color::Black, false)), // startup
        Ok(snapshot(Color::Black, false)), // select refresh: player's turn
    ]);
    let events = drive(
        server.clone(),
        vec![
            Command::SelectColor(Color::Black),
            Command::SelectColor(Color::White),
        ],
    )
    .await;

    let claims: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::ColorClaimed(color) => Some(*color),
            _ => None,
        })
        .collect();
    assert_eq!(claims, vec![Color::Black], "the session keeps its first color");
    assert!(events.iter().any(|e| matches!(e, GameEvent::Notice(_))));
}

#[tokio::test]
async fn reset_keeps_the_claimed_color() {
    let server = FakeServer::scripted(vec![
        Ok(snapshot(Color::Black, false)), // startup
        Ok(snapshot(Color::Black, false)), // select refresh: player's turn
        Ok(snapshot(Color::White, false)), // post-reset: opponent opens
        Ok(snapshot(Color::Black, false)), // after AI move: player's turn
    ]);
    let events = drive(
        server.clone(),
        vec![Command::SelectColor(Color::Black), Command::Reset],
    )
    .await;

    assert_eq!(*server.resets.lock().expect("resets lock"), 1);
    // The chain re-engages after the reset, which it only does while a
    // color is still claimed.
    assert_eq!(server.ai_moves(), 1);
    assert_eq!(board_events(&events), 4);
}

#[tokio::test]
async fn pass_is_unguarded_and_refreshes() {
    let server = FakeServer::scripted(vec![
        Ok(snapshot(Color::White, false)), // startup
        Ok(snapshot(Color::White, false)), // post-pass refresh
    ]);
    let events = drive(server.clone(), vec![Command::Pass]).await;

    assert_eq!(*server.passes.lock().expect("passes lock"), 1);
    assert_eq!(board_events(&events), 2);
}

#[tokio::test]
async fn transport_failure_halts_the_ai_chain() {
    let server = FakeServer::scripted(vec![
        Ok(snapshot(Color::White, false)), // startup
        Ok(snapshot(Color::White, false)), // select refresh: opponent to move
        Err(transport_error()),            // fetch after AI move 1 fails
        Ok(snapshot(Color::Black, false)), // manual refresh recovers
    ]);
    let events = drive(
        server.clone(),
        vec![Command::SelectColor(Color::Black), Command::Refresh],
    )
    .await;

    assert_eq!(server.ai_moves(), 1, "the chain stops at the failure");
    let failure_at = events
        .iter()
        .position(|e| matches!(e, GameEvent::TransportFailure(_)))
        .expect("failure is surfaced");
    let last_board_at = events
        .iter()
        .rposition(|e| matches!(e, GameEvent::Board(_)))
        .expect("refresh recovers");
    assert!(failure_at < last_board_at, "a manual refresh restarts the cycle");
}
