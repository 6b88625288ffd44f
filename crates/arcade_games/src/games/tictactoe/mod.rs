//! Tic-tac-toe against a bot that plays uniformly random empty cells.

mod rules;
mod types;

pub use rules::{LINES, check_winner, is_full};
pub use types::{Board, Mark, Square};

use super::GameEngine;
use crate::error::MoveError;
use crate::rng::RandomSource;
use crate::settings::GameSettings;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Who finished the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    /// The human completed a line.
    Player,
    /// The bot completed a line.
    Bot,
    /// Board filled without a line.
    Draw,
}

/// Status tag of a tic-tac-toe turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TicTacToeStatus {
    /// Both marks placed, nobody won.
    Continue,
    /// The human's mark completed a line.
    PlayerWin,
    /// The bot's mark completed a line.
    BotWin,
    /// Board filled without a line.
    Draw,
    /// Target cell was taken; nothing changed.
    AlreadyOccupied,
}

impl TicTacToeStatus {
    /// Whether this status ends the game.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TicTacToeStatus::PlayerWin | TicTacToeStatus::BotWin | TicTacToeStatus::Draw
        )
    }
}

/// Session payload for tic-tac-toe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicTacToeState {
    /// Current board.
    pub board: Board,
    /// Marks placed so far, both sides.
    pub moves: u8,
    /// Set once the game is decided.
    pub winner: Option<Winner>,
}

/// Result of one human turn (and the bot's reply, if any).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicTacToeOutcome {
    /// Status tag.
    pub status: TicTacToeStatus,
    /// Board after the turn.
    pub board: Board,
    /// Cell the bot played, when it got a turn.
    pub bot_move: Option<usize>,
    /// Points awarded.
    pub points: u32,
}

impl TicTacToeState {
    fn outcome(&self, status: TicTacToeStatus, bot_move: Option<usize>, points: u32) -> TicTacToeOutcome {
        TicTacToeOutcome {
            status,
            board: self.board.clone(),
            bot_move,
            points,
        }
    }
}

impl GameEngine for TicTacToeState {
    type Move = usize;
    type Outcome = TicTacToeOutcome;

    fn new_game<R: RandomSource>(_settings: &GameSettings, _rng: &mut R) -> Self {
        Self::default()
    }

    #[instrument(skip(self, settings, rng), fields(moves = self.moves))]
    fn apply<R: RandomSource>(
        &mut self,
        position: usize,
        settings: &GameSettings,
        rng: &mut R,
    ) -> Result<TicTacToeOutcome, MoveError> {
        if self.winner.is_some() {
            return Err(MoveError::GameOver);
        }
        if position > 8 {
            warn!(position, "Position out of range");
            return Err(MoveError::InvalidPosition(position));
        }
        if !self.board.is_empty(position) {
            debug!(position, "Cell already occupied");
            return Ok(self.outcome(TicTacToeStatus::AlreadyOccupied, None, 0));
        }

        self.board.set(position, Square::Occupied(Mark::X))?;
        self.moves += 1;

        if check_winner(&self.board).is_some() {
            self.winner = Some(Winner::Player);
            info!(position, "Player completed a line");
            return Ok(self.outcome(TicTacToeStatus::PlayerWin, None, *settings.tictactoe().points_win()));
        }
        if self.moves >= 9 || is_full(&self.board) {
            self.winner = Some(Winner::Draw);
            info!("Board full, draw");
            return Ok(self.outcome(TicTacToeStatus::Draw, None, *settings.tictactoe().points_draw()));
        }

        let empty = self.board.empty_cells();
        let Some(&bot_pos) = rng.choose(&empty).or_else(|| {
            warn!("Random draw out of range, bot takes the first free cell");
            empty.first()
        }) else {
            self.winner = Some(Winner::Draw);
            return Ok(self.outcome(TicTacToeStatus::Draw, None, *settings.tictactoe().points_draw()));
        };
        self.board.set(bot_pos, Square::Occupied(Mark::O))?;
        self.moves += 1;
        debug!(position, bot_pos, "Bot replied");

        if check_winner(&self.board).is_some() {
            self.winner = Some(Winner::Bot);
            info!(bot_pos, "Bot completed a line");
            return Ok(self.outcome(TicTacToeStatus::BotWin, Some(bot_pos), 0));
        }

        Ok(self.outcome(TicTacToeStatus::Continue, Some(bot_pos), 0))
    }
}
