//! Session and configuration errors.

use arcade_games::{MoveError, UnknownGameType};
use derive_more::{Display, Error};
use tracing::instrument;

/// Error raised by session-manager operations.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum SessionError {
    /// The game-type token is not one of the recognised games.
    #[display("{}", _0)]
    UnknownGameType(UnknownGameType),

    /// No active session has this id. Ended, completed and evicted sessions
    /// all report this.
    #[display("Session {} not found", _0)]
    SessionNotFound(String),

    /// The engine rejected the move; the session is unchanged.
    #[display("{}", _0)]
    Move(MoveError),
}

impl std::error::Error for SessionError {}

impl From<UnknownGameType> for SessionError {
    fn from(err: UnknownGameType) -> Self {
        Self::UnknownGameType(err)
    }
}

impl From<MoveError> for SessionError {
    fn from(err: MoveError) -> Self {
        Self::Move(err)
    }
}

/// Configuration error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
