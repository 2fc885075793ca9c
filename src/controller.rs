//! The turn-synchronization state machine.
//!
//! The controller is the only component that talks to the server. It runs as
//! a task consuming [`Command`]s from the UI in strict arrival order, so a
//! click that lands while a refresh cycle is still in flight queues behind
//! it instead of racing it. Every accepted command ends with a refresh cycle
//! that re-fetches the authoritative snapshot, and the cycle itself drives
//! the server AI for as long as it is the opponent's turn.

use crate::board::{BoardSnapshot, Color, Coord};
use crate::client::{ApiError, GameApi};
use anyhow::Result;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// User intent sent from the UI to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Claim a side for this session.
    SelectColor(Color),
    /// A click on the board cell at the given coordinate.
    CellClick(Coord),
    /// Pass the current turn.
    Pass,
    /// Reset the game to the opening position.
    Reset,
    /// Re-fetch and re-render; also restarts a halted AI chain.
    Refresh,
}

/// Messages sent from the controller to the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A fresh snapshot arrived; replaces everything previously rendered.
    Board(BoardSnapshot),
    /// The session's side was claimed.
    ColorClaimed(Color),
    /// The server rejected a move; nothing changed.
    MoveRejected,
    /// A locally detected misuse, e.g. clicking before claiming a side.
    Notice(String),
    /// The server could not be reached; any running AI chain has halted.
    TransportFailure(String),
}

/// The interaction state machine.
///
/// Owns the claimed color for the session. Conceptual states: not started
/// (no claimed color), waiting for the player, waiting for the opponent, and
/// game over; all but the first are derived from the latest snapshot rather
/// than stored.
pub struct TurnController {
    api: Box<dyn GameApi>,
    claimed: Option<Color>,
    ai_delay: Duration,
    event_tx: mpsc::UnboundedSender<GameEvent>,
}

impl TurnController {
    /// Creates a controller.
    ///
    /// `ai_delay` is the pause before each AI-move request so the preceding
    /// render can settle visually; tests pass [`Duration::ZERO`].
    pub fn new(
        api: Box<dyn GameApi>,
        ai_delay: Duration,
        event_tx: mpsc::UnboundedSender<GameEvent>,
    ) -> Self {
        Self {
            api,
            claimed: None,
            ai_delay,
            event_tx,
        }
    }

    /// Runs the command loop until the command channel closes.
    ///
    /// Transport failures never end the loop; they surface as
    /// [`GameEvent::TransportFailure`] and the controller waits for the next
    /// command ([`Command::Refresh`] restarts a halted chain).
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) -> Result<()> {
        info!("Starting turn controller");

        // Fetch-on-load so the board is visible before any input.
        if let Err(e) = self.refresh_cycle().await {
            warn!(error = %e, "Initial refresh failed");
            self.emit(GameEvent::TransportFailure(e.to_string()));
        }

        while let Some(command) = commands.recv().await {
            debug!(?command, "Handling command");
            if let Err(e) = self.handle(command).await {
                warn!(error = %e, ?command, "Command failed");
                self.emit(GameEvent::TransportFailure(e.to_string()));
            }
        }

        info!("Command channel closed, stopping turn controller");
        Ok(())
    }

    async fn handle(&mut self, command: Command) -> Result<(), ApiError> {
        match command {
            Command::SelectColor(color) => self.select_color(color).await,
            Command::CellClick(coord) => self.cell_click(coord).await,
            Command::Pass => {
                Self::tolerate_rejection(self.api.pass().await, "pass")?;
                self.refresh_cycle().await
            }
            Command::Reset => {
                Self::tolerate_rejection(self.api.reset().await, "reset")?;
                self.refresh_cycle().await
            }
            Command::Refresh => self.refresh_cycle().await,
        }
    }

    /// Claims a side for the session.
    ///
    /// A side can only be claimed once per session; a second claim is
    /// rejected with a notice and changes nothing. A game reset does not
    /// release the claim.
    #[instrument(skip(self))]
    async fn select_color(&mut self, color: Color) -> Result<(), ApiError> {
        if self.claimed.is_some() {
            debug!("Ignoring color selection, side already claimed");
            self.emit(GameEvent::Notice(
                "A color is already chosen for this session".to_string(),
            ));
            return Ok(());
        }
        info!(%color, "Color claimed");
        self.claimed = Some(color);
        self.emit(GameEvent::ColorClaimed(color));
        self.refresh_cycle().await
    }

    /// Handles a click on a board cell.
    ///
    /// Re-fetches the snapshot before submitting so the turn check runs
    /// against the server's current state, not the possibly stale rendered
    /// one. A click out of turn is discarded as a no-op.
    #[instrument(skip(self), fields(row = coord.row, col = coord.col))]
    async fn cell_click(&mut self, coord: Coord) -> Result<(), ApiError> {
        let Some(color) = self.claimed else {
            debug!("Click before color selection");
            self.emit(GameEvent::Notice(
                "Game not started, pick a color first".to_string(),
            ));
            return Ok(());
        };

        let snapshot = self.api.board().await?;
        let my_turn = !snapshot.game_over && snapshot.current_turn == color;
        self.emit(GameEvent::Board(snapshot));
        if !my_turn {
            debug!("Discarding click, not the claimed color's turn");
            return Ok(());
        }

        match self.api.make_move(coord).await {
            Ok(()) => self.refresh_cycle().await,
            Err(ApiError::Rejected { status }) => {
                warn!(%status, "Move rejected");
                self.emit(GameEvent::MoveRejected);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Pass and reset carry no client-side turn guard and no distinct user
    /// feedback on rejection; the server is the authority on their legality.
    /// Transport failures still propagate.
    fn tolerate_rejection(result: Result<(), ApiError>, what: &str) -> Result<(), ApiError> {
        match result {
            Err(ApiError::Rejected { status }) => {
                warn!(%status, what, "Command rejected by server");
                Ok(())
            }
            other => other,
        }
    }

    /// Fetches and publishes the latest snapshot, then drives the AI chain.
    ///
    /// While a side is claimed, the game is not over, and the opponent is to
    /// move, each iteration waits out the AI delay, requests one AI move,
    /// and re-fetches. The sequential awaits mean at most one AI request is
    /// ever in flight. The chain ends as soon as control returns to the
    /// claimed color or the game ends; any error halts it and propagates.
    #[instrument(skip(self))]
    async fn refresh_cycle(&mut self) -> Result<(), ApiError> {
        loop {
            let snapshot = self.api.board().await?;
            let opponent_to_move = self
                .claimed
                .is_some_and(|color| !snapshot.game_over && snapshot.current_turn == color.opponent());
            debug!(
                current_turn = %snapshot.current_turn,
                game_over = snapshot.game_over,
                opponent_to_move,
                "Refreshed board"
            );
            self.emit(GameEvent::Board(snapshot));
            if !opponent_to_move {
                return Ok(());
            }
            sleep(self.ai_delay).await;
            self.api.ai_move().await?;
        }
    }

    fn emit(&self, event: GameEvent) {
        if self.event_tx.send(event).is_err() {
            warn!("Event channel closed, UI is gone");
        }
    }
}
