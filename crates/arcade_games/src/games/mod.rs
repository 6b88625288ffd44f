//! The seven mini-games and the closed types that dispatch between them.
//!
//! Every game implements [`GameEngine`]. The session layer never matches on
//! strings: it holds a [`GameState`], submits a [`GameMove`] and gets back a
//! [`MoveOutcome`], all three closed enums over the same set of games.

pub mod battleship;
pub mod merge;
pub mod quiz;
pub mod rps;
pub mod snake;
pub mod tetris;
pub mod tictactoe;

use crate::error::{MoveError, UnknownGameType};
use crate::rng::RandomSource;
use crate::settings::GameSettings;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, instrument};

pub use battleship::{BattleshipOutcome, BattleshipState, BattleshipStatus, Shot};
pub use merge::{MergeOutcome, MergeState, MergeStatus};
pub use quiz::{Question, QuizOutcome, QuizState, QuizStatus};
pub use rps::{Hand, RoundResult, RpsRound, RpsState};
pub use snake::{Point, SnakeOutcome, SnakeState, SnakeStatus};
pub use tetris::{Piece, PieceKind, TetrisAction, TetrisOutcome, TetrisState, TetrisStatus};
pub use tictactoe::{Mark, Square, TicTacToeOutcome, TicTacToeState, TicTacToeStatus};

/// Rules of one game: how to deal a fresh state and how to apply a move.
///
/// `apply` validates first and mutates second. An `Err` means the state is
/// exactly as it was before the call.
pub trait GameEngine: Sized {
    /// Payload the player submits.
    type Move;
    /// Result descriptor returned for every accepted move.
    type Outcome;

    /// Deals the initial state.
    fn new_game<R: RandomSource>(settings: &GameSettings, rng: &mut R) -> Self;

    /// Applies one move.
    fn apply<R: RandomSource>(
        &mut self,
        mv: Self::Move,
        settings: &GameSettings,
        rng: &mut R,
    ) -> Result<Self::Outcome, MoveError>;
}

/// The recognised game types.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum GameKind {
    /// Rock-paper-scissors.
    #[serde(rename = "rps")]
    #[strum(to_string = "rps", serialize = "rock_paper_scissors")]
    Rps,
    /// Tic-tac-toe against a random bot.
    #[serde(rename = "tictactoe")]
    #[strum(to_string = "tictactoe", serialize = "tic_tac_toe")]
    TicTacToe,
    /// Multiple-choice quiz.
    #[serde(rename = "quiz")]
    #[strum(to_string = "quiz")]
    Quiz,
    /// Battleship against a hidden fleet.
    #[serde(rename = "battleship")]
    #[strum(to_string = "battleship")]
    Battleship,
    /// Sliding-tile 2048.
    #[serde(rename = "2048")]
    #[strum(to_string = "2048", serialize = "game_2048")]
    Merge,
    /// Tetris.
    #[serde(rename = "tetris")]
    #[strum(to_string = "tetris")]
    Tetris,
    /// Snake.
    #[serde(rename = "snake")]
    #[strum(to_string = "snake")]
    Snake,
}

impl GameKind {
    /// Parses a game-type token, ignoring surrounding whitespace and case.
    #[instrument]
    pub fn parse(token: &str) -> Result<Self, UnknownGameType> {
        Self::from_str(token.trim()).map_err(|_| UnknownGameType(token.trim().to_string()))
    }

    /// Short prefix used when minting session identifiers.
    pub fn id_prefix(self) -> &'static str {
        match self {
            GameKind::Rps => "rps",
            GameKind::TicTacToe => "tic",
            GameKind::Quiz => "qui",
            GameKind::Battleship => "bat",
            GameKind::Merge => "204",
            GameKind::Tetris => "tet",
            GameKind::Snake => "sna",
        }
    }
}

/// One of the four grid directions, shared by 2048 and snake.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Direction {
    /// Towards row 0.
    Up,
    /// Towards the last row.
    Down,
    /// Towards column 0.
    Left,
    /// Towards the last column.
    Right,
}

impl Direction {
    /// Parses a direction token.
    pub fn parse(token: &str) -> Result<Self, MoveError> {
        Self::from_str(token.trim()).map_err(|_| MoveError::UnknownAction(token.trim().to_string()))
    }

    /// The reverse direction.
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Row and column step.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }
}

/// State payload of a session, one variant per game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "game", content = "state")]
pub enum GameState {
    /// Rock-paper-scissors.
    #[serde(rename = "rps")]
    Rps(RpsState),
    /// Tic-tac-toe.
    #[serde(rename = "tictactoe")]
    TicTacToe(TicTacToeState),
    /// Quiz.
    #[serde(rename = "quiz")]
    Quiz(QuizState),
    /// Battleship.
    #[serde(rename = "battleship")]
    Battleship(BattleshipState),
    /// 2048.
    #[serde(rename = "2048")]
    Merge(MergeState),
    /// Tetris.
    #[serde(rename = "tetris")]
    Tetris(TetrisState),
    /// Snake.
    #[serde(rename = "snake")]
    Snake(SnakeState),
}

impl GameState {
    /// Deals the initial state for `kind`.
    #[instrument(skip(settings, rng))]
    pub fn new_game<R: RandomSource>(kind: GameKind, settings: &GameSettings, rng: &mut R) -> Self {
        debug!(%kind, "Dealing new game");
        match kind {
            GameKind::Rps => GameState::Rps(RpsState::new_game(settings, rng)),
            GameKind::TicTacToe => GameState::TicTacToe(TicTacToeState::new_game(settings, rng)),
            GameKind::Quiz => GameState::Quiz(QuizState::new_game(settings, rng)),
            GameKind::Battleship => GameState::Battleship(BattleshipState::new_game(settings, rng)),
            GameKind::Merge => GameState::Merge(MergeState::new_game(settings, rng)),
            GameKind::Tetris => GameState::Tetris(TetrisState::new_game(settings, rng)),
            GameKind::Snake => GameState::Snake(SnakeState::new_game(settings, rng)),
        }
    }

    /// Game type of this payload.
    pub fn kind(&self) -> GameKind {
        match self {
            GameState::Rps(_) => GameKind::Rps,
            GameState::TicTacToe(_) => GameKind::TicTacToe,
            GameState::Quiz(_) => GameKind::Quiz,
            GameState::Battleship(_) => GameKind::Battleship,
            GameState::Merge(_) => GameKind::Merge,
            GameState::Tetris(_) => GameKind::Tetris,
            GameState::Snake(_) => GameKind::Snake,
        }
    }

    /// Forwards `mv` to the engine owning this payload.
    ///
    /// A move for another game is rejected with [`MoveError::WrongGame`].
    #[instrument(skip(self, settings, rng), fields(kind = %self.kind()))]
    pub fn apply<R: RandomSource>(
        &mut self,
        mv: GameMove,
        settings: &GameSettings,
        rng: &mut R,
    ) -> Result<MoveOutcome, MoveError> {
        match (self, mv) {
            (GameState::Rps(state), GameMove::Rps(choice)) => {
                state.apply(choice, settings, rng).map(MoveOutcome::Rps)
            }
            (GameState::TicTacToe(state), GameMove::TicTacToe(position)) => state
                .apply(position, settings, rng)
                .map(MoveOutcome::TicTacToe),
            (GameState::Quiz(state), GameMove::Quiz(answer)) => {
                state.apply(answer, settings, rng).map(MoveOutcome::Quiz)
            }
            (GameState::Battleship(state), GameMove::Battleship(shot)) => state
                .apply(shot, settings, rng)
                .map(MoveOutcome::Battleship),
            (GameState::Merge(state), GameMove::Merge(direction)) => {
                state.apply(direction, settings, rng).map(MoveOutcome::Merge)
            }
            (GameState::Tetris(state), GameMove::Tetris(action)) => {
                state.apply(action, settings, rng).map(MoveOutcome::Tetris)
            }
            (GameState::Snake(state), GameMove::Snake(direction)) => {
                state.apply(direction, settings, rng).map(MoveOutcome::Snake)
            }
            (state, mv) => Err(MoveError::WrongGame {
                expected: state.kind(),
                got: mv.kind(),
            }),
        }
    }
}

/// A move payload, one variant per game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "game", content = "move")]
pub enum GameMove {
    /// A raw choice token, normalised by the engine.
    #[serde(rename = "rps")]
    Rps(String),
    /// Cell index 0-8.
    #[serde(rename = "tictactoe")]
    TicTacToe(usize),
    /// Answer index for the current question.
    #[serde(rename = "quiz")]
    Quiz(usize),
    /// Shot coordinates.
    #[serde(rename = "battleship")]
    Battleship(Shot),
    /// Slide direction.
    #[serde(rename = "2048")]
    Merge(Direction),
    /// Piece action.
    #[serde(rename = "tetris")]
    Tetris(TetrisAction),
    /// Heading.
    #[serde(rename = "snake")]
    Snake(Direction),
}

impl GameMove {
    /// Game this move belongs to.
    pub fn kind(&self) -> GameKind {
        match self {
            GameMove::Rps(_) => GameKind::Rps,
            GameMove::TicTacToe(_) => GameKind::TicTacToe,
            GameMove::Quiz(_) => GameKind::Quiz,
            GameMove::Battleship(_) => GameKind::Battleship,
            GameMove::Merge(_) => GameKind::Merge,
            GameMove::Tetris(_) => GameKind::Tetris,
            GameMove::Snake(_) => GameKind::Snake,
        }
    }

    /// Parses a text payload for a game of `kind`.
    ///
    /// Battleship accepts `"row col"` or `"row,col"`.
    #[instrument]
    pub fn parse(kind: GameKind, input: &str) -> Result<Self, MoveError> {
        let input = input.trim();
        let unknown = || MoveError::UnknownAction(input.to_string());
        match kind {
            GameKind::Rps => Ok(GameMove::Rps(input.to_string())),
            GameKind::TicTacToe => input
                .parse()
                .map(GameMove::TicTacToe)
                .map_err(|_| unknown()),
            GameKind::Quiz => input.parse().map(GameMove::Quiz).map_err(|_| unknown()),
            GameKind::Battleship => {
                let mut parts = input
                    .split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|p| !p.is_empty());
                let row = parts.next().and_then(|p| p.parse().ok()).ok_or_else(unknown)?;
                let col = parts.next().and_then(|p| p.parse().ok()).ok_or_else(unknown)?;
                if parts.next().is_some() {
                    return Err(unknown());
                }
                Ok(GameMove::Battleship(Shot { row, col }))
            }
            GameKind::Merge => Direction::parse(input).map(GameMove::Merge),
            GameKind::Tetris => TetrisAction::parse(input).map(GameMove::Tetris),
            GameKind::Snake => Direction::parse(input).map(GameMove::Snake),
        }
    }
}

/// Result of an accepted move, one variant per game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "game", content = "outcome")]
pub enum MoveOutcome {
    /// Rock-paper-scissors round.
    #[serde(rename = "rps")]
    Rps(RpsRound),
    /// Tic-tac-toe turn.
    #[serde(rename = "tictactoe")]
    TicTacToe(TicTacToeOutcome),
    /// Quiz answer.
    #[serde(rename = "quiz")]
    Quiz(QuizOutcome),
    /// Battleship shot.
    #[serde(rename = "battleship")]
    Battleship(BattleshipOutcome),
    /// 2048 slide.
    #[serde(rename = "2048")]
    Merge(MergeOutcome),
    /// Tetris action.
    #[serde(rename = "tetris")]
    Tetris(TetrisOutcome),
    /// Snake step.
    #[serde(rename = "snake")]
    Snake(SnakeOutcome),
}

impl MoveOutcome {
    /// Whether this outcome ends the session.
    pub fn is_terminal(&self) -> bool {
        match self {
            MoveOutcome::Rps(_) => true,
            MoveOutcome::TicTacToe(o) => o.status.is_terminal(),
            MoveOutcome::Quiz(o) => o.status == QuizStatus::GameOver,
            MoveOutcome::Battleship(o) => o.status == BattleshipStatus::Win,
            MoveOutcome::Merge(o) => o.status.is_terminal(),
            MoveOutcome::Tetris(o) => o.status == TetrisStatus::GameOver,
            MoveOutcome::Snake(o) => o.status == SnakeStatus::GameOver,
        }
    }

    /// Points awarded by this move.
    pub fn points(&self) -> u32 {
        match self {
            MoveOutcome::Rps(o) => o.points,
            MoveOutcome::TicTacToe(o) => o.points,
            MoveOutcome::Quiz(o) => o.points,
            MoveOutcome::Battleship(o) => o.points,
            MoveOutcome::Merge(o) => o.points,
            MoveOutcome::Tetris(o) => o.points,
            MoveOutcome::Snake(o) => o.points,
        }
    }

    /// Short status tag, e.g. `player_win` or `already_shot`.
    pub fn status_tag(&self) -> String {
        match self {
            MoveOutcome::Rps(o) => o.result.to_string(),
            MoveOutcome::TicTacToe(o) => o.status.to_string(),
            MoveOutcome::Quiz(o) => o.status.to_string(),
            MoveOutcome::Battleship(o) => o.status.to_string(),
            MoveOutcome::Merge(o) => o.status.to_string(),
            MoveOutcome::Tetris(o) => o.status.to_string(),
            MoveOutcome::Snake(o) => o.status.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::GameRng;
    use strum::IntoEnumIterator;

    #[test]
    fn test_kind_round_trips_through_display() {
        for kind in GameKind::iter() {
            assert_eq!(GameKind::parse(&kind.to_string()), Ok(kind));
        }
    }

    #[test]
    fn test_kind_aliases() {
        assert_eq!(GameKind::parse("rock_paper_scissors"), Ok(GameKind::Rps));
        assert_eq!(GameKind::parse(" Tic_Tac_Toe "), Ok(GameKind::TicTacToe));
        assert_eq!(GameKind::parse("game_2048"), Ok(GameKind::Merge));
        assert_eq!(
            GameKind::parse("chess"),
            Err(UnknownGameType("chess".to_string()))
        );
    }

    #[test]
    fn test_new_game_kind_matches() {
        let settings = GameSettings::default();
        let mut rng = GameRng::new(9);
        for kind in GameKind::iter() {
            assert_eq!(GameState::new_game(kind, &settings, &mut rng).kind(), kind);
        }
    }

    #[test]
    fn test_wrong_game_rejected() {
        let settings = GameSettings::default();
        let mut rng = GameRng::new(1);
        let mut state = GameState::new_game(GameKind::Snake, &settings, &mut rng);
        let before = state.clone();
        let err = state
            .apply(GameMove::TicTacToe(4), &settings, &mut rng)
            .unwrap_err();
        assert_eq!(
            err,
            MoveError::WrongGame {
                expected: GameKind::Snake,
                got: GameKind::TicTacToe
            }
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_parse_moves() {
        assert_eq!(
            GameMove::parse(GameKind::Battleship, "2, 3"),
            Ok(GameMove::Battleship(Shot { row: 2, col: 3 }))
        );
        assert_eq!(
            GameMove::parse(GameKind::Merge, "LEFT"),
            Ok(GameMove::Merge(Direction::Left))
        );
        assert_eq!(
            GameMove::parse(GameKind::Tetris, "rotate"),
            Ok(GameMove::Tetris(TetrisAction::Rotate))
        );
        assert!(matches!(
            GameMove::parse(GameKind::Snake, "sideways"),
            Err(MoveError::UnknownAction(_))
        ));
        assert!(GameMove::parse(GameKind::Battleship, "1 2 3").is_err());
    }

    #[test]
    fn test_states_round_trip_through_json() {
        let settings = GameSettings::default();
        let mut rng = GameRng::new(5);
        for kind in GameKind::iter() {
            let state = GameState::new_game(kind, &settings, &mut rng);
            let json = serde_json::to_value(&state).unwrap();
            assert_eq!(json["game"], serde_json::json!(kind.to_string()));
            assert!(json.get("state").is_some());
            let back: GameState = serde_json::from_value(json).unwrap();
            assert_eq!(back, state);
        }
    }

    #[test]
    fn test_move_json_uses_game_tags() {
        let slide = GameMove::Merge(Direction::Left);
        let json = serde_json::to_value(&slide).unwrap();
        assert_eq!(json, serde_json::json!({"game": "2048", "move": "left"}));
        assert_eq!(serde_json::from_value::<GameMove>(json).unwrap(), slide);

        let mark: GameMove = serde_json::from_str(r#"{"game":"tictactoe","move":4}"#).unwrap();
        assert_eq!(mark, GameMove::TicTacToe(4));
    }

    #[test]
    fn test_outcome_json_uses_game_tags() {
        let settings = GameSettings::default();
        let mut rng = GameRng::new(3);
        let mut state = GameState::new_game(GameKind::TicTacToe, &settings, &mut rng);
        let outcome = state
            .apply(GameMove::TicTacToe(4), &settings, &mut rng)
            .unwrap();

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["game"], "tictactoe");
        assert!(json["outcome"]["status"].is_string());
        assert!(!json["outcome"]["board"].is_null());
        let back: MoveOutcome = serde_json::from_value(json).unwrap();
        assert_eq!(back, outcome);
    }

    #[test]
    fn test_direction_opposites() {
        for d in Direction::iter() {
            assert_eq!(d.opposite().opposite(), d);
            let (dr, dc) = d.delta();
            let (or, oc) = d.opposite().delta();
            assert_eq!((dr + or, dc + oc), (0, 0));
        }
    }
}
