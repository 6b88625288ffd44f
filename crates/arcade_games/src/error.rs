//! Move validation errors.
//!
//! A `MoveError` always means the move was rejected before any state
//! changed. Callers may fix the input and resubmit.

use crate::games::{Direction, GameKind};

/// Error raised when a move payload is malformed for the current state.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// Rock-paper-scissors choice not in the synonym table.
    #[display("Invalid choice {:?}: expected rock, paper or scissors", _0)]
    InvalidChoice(String),

    /// Tic-tac-toe cell outside 0-8.
    #[display("Invalid position {}: expected 0-8", _0)]
    InvalidPosition(usize),

    /// Quiz answer index outside the current question's options.
    #[display("Invalid answer {}: question has {} options", index, options)]
    InvalidAnswer {
        /// Submitted index.
        index: usize,
        /// Number of options on the current question.
        options: usize,
    },

    /// Battleship shot outside the board.
    #[display("Invalid coordinates ({}, {})", row, col)]
    InvalidCoordinates {
        /// Submitted row.
        row: usize,
        /// Submitted column.
        col: usize,
    },

    /// Snake direction reversing onto itself.
    #[display("Cannot turn {} while heading {}", requested, current)]
    InvalidDirection {
        /// Requested direction.
        requested: Direction,
        /// Direction the snake is heading.
        current: Direction,
    },

    /// A direction or action token that no game understands.
    #[display("Unknown action {:?}", _0)]
    UnknownAction(String),

    /// Every quiz question has already been answered.
    #[display("All quiz questions have been answered")]
    QuizFinished,

    /// The game already reached a terminal outcome.
    #[display("Game is already over")]
    GameOver,

    /// The move belongs to a different game than the session.
    #[display("Move for {} submitted to a {} session", got, expected)]
    WrongGame {
        /// Game of the session.
        expected: GameKind,
        /// Game of the submitted move.
        got: GameKind,
    },
}

impl std::error::Error for MoveError {}

/// Error raised when a game-type token is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("Unknown game type {:?}", _0)]
pub struct UnknownGameType(pub String);

impl std::error::Error for UnknownGameType {}

/// Error raised when a settings table holds a value no game can run with.
#[derive(Debug, Clone, PartialEq, derive_more::Display)]
pub enum InvalidSettings {
    /// Quiz rounds need at least one question.
    #[display("quiz.questions_per_game must be positive")]
    NoQuizQuestions,

    /// A configured quiz pool is empty.
    #[display("quiz.pool must hold at least one question")]
    EmptyQuizPool,

    /// A pool question's correct index does not name one of its answers.
    #[display(
        "quiz.pool question {} marks answer {} correct but has {} answers",
        question,
        correct,
        answers
    )]
    CorrectAnswerOutOfRange {
        /// Position of the question in the pool.
        question: usize,
        /// Configured correct index.
        correct: usize,
        /// Number of answers on the question.
        answers: usize,
    },

    /// The battleship fleet is empty.
    #[display("battleship.ships must list at least one ship")]
    NoShips,

    /// A ship length that cannot fit on the board.
    #[display("battleship ship length {} must be between 1 and {}", length, max)]
    ShipLength {
        /// Configured length.
        length: usize,
        /// Board edge length.
        max: usize,
    },

    /// Placement needs at least one attempt per ship.
    #[display("battleship.placement_attempts must be positive")]
    NoPlacementAttempts,

    /// Spawn odds that are not a probability.
    #[display("2048.four_probability must be within 0.0 and 1.0, got {}", _0)]
    FourProbability(f64),

    /// A winning tile no slide can produce.
    #[display("2048.win_tile must be a power of two of at least 4, got {}", _0)]
    WinTile(u32),

    /// Levelling needs a positive line count.
    #[display("tetris.lines_per_level must be positive")]
    NoLinesPerLevel,
}

impl std::error::Error for InvalidSettings {}
