//! HTTP access to the game server.

use crate::board::{BoardSnapshot, Coord};
use derive_more::{Display, Error};
use tracing::{debug, info, instrument, warn};

pub use reqwest::StatusCode;

/// Failure talking to the game server.
#[derive(Debug, Clone, Display, Error)]
pub enum ApiError {
    /// The server answered with a non-success status, e.g. an illegal move.
    #[display("server rejected the request ({status})")]
    Rejected {
        /// The HTTP status the server returned.
        status: StatusCode,
    },
    /// The server could not be reached or the response was unreadable.
    #[display("transport failure: {message}")]
    Transport {
        /// Human-readable description of the underlying failure.
        message: String,
    },
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport {
            message: err.to_string(),
        }
    }
}

/// The query/command surface the server exposes.
///
/// The controller only talks to the server through this trait, so tests can
/// drive the state machine with a scripted in-memory double instead of a
/// live server.
#[async_trait::async_trait]
pub trait GameApi: Send + Sync {
    /// Fetches the latest board snapshot.
    async fn board(&self) -> Result<BoardSnapshot, ApiError>;

    /// Submits a move at `coord` for the side to move.
    async fn make_move(&self, coord: Coord) -> Result<(), ApiError>;

    /// Passes the current turn.
    async fn pass(&self) -> Result<(), ApiError>;

    /// Resets the game to the opening position.
    async fn reset(&self) -> Result<(), ApiError>;

    /// Asks the server AI to play its move. Returns once the AI has moved.
    async fn ai_move(&self) -> Result<(), ApiError>;
}

/// HTTP client for the game server's REST API.
#[derive(Debug, Clone)]
pub struct HttpGameClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpGameClient {
    /// Creates a client for the server at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        info!(base_url = %base_url, "Creating HTTP game client");
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Sends a bodyless command POST and checks the status.
    async fn command(&self, path: &str) -> Result<(), ApiError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.post(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%status, path, "Command rejected by server");
            return Err(ApiError::Rejected { status });
        }
        debug!(path, "Command accepted");
        Ok(())
    }
}

#[async_trait::async_trait]
impl GameApi for HttpGameClient {
    #[instrument(skip(self))]
    async fn board(&self) -> Result<BoardSnapshot, ApiError> {
        debug!("Fetching board snapshot");
        let url = format!("{}/api/board", self.base_url);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Board fetch rejected by server");
            return Err(ApiError::Rejected { status });
        }
        let snapshot: BoardSnapshot = response.json().await?;
        debug!(
            current_turn = %snapshot.current_turn,
            game_over = snapshot.game_over,
            "Fetched board snapshot"
        );
        Ok(snapshot)
    }

    #[instrument(skip(self), fields(row = coord.row, col = coord.col))]
    async fn make_move(&self, coord: Coord) -> Result<(), ApiError> {
        info!("Submitting move");
        let url = format!("{}/api/move", self.base_url);
        let response = self.client.post(&url).json(&coord).send().await?;
        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Move rejected by server");
            return Err(ApiError::Rejected { status });
        }
        debug!("Move accepted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn pass(&self) -> Result<(), ApiError> {
        info!("Passing turn");
        self.command("/api/pass").await
    }

    #[instrument(skip(self))]
    async fn reset(&self) -> Result<(), ApiError> {
        info!("Resetting game");
        self.command("/api/reset").await
    }

    #[instrument(skip(self))]
    async fn ai_move(&self) -> Result<(), ApiError> {
        info!("Requesting AI move");
        self.command("/api/ai_move").await
    }
}
