//! Point awards and tunables for every game.
//!
//! All fields have defaults, so a partial TOML table such as
//! `[games.snake] points_per_food = 25` is enough to override one value.

use crate::error::InvalidSettings;
use crate::games::battleship::BOARD_SIZE;
use crate::games::quiz::Question;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Settings for all games, grouped per game.
#[derive(Debug, Clone, Default, PartialEq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Rock-paper-scissors.
    rps: RpsSettings,
    /// Tic-tac-toe.
    tictactoe: TicTacToeSettings,
    /// Quiz.
    quiz: QuizSettings,
    /// Battleship.
    battleship: BattleshipSettings,
    /// 2048.
    #[serde(rename = "2048")]
    merge: MergeSettings,
    /// Tetris.
    tetris: TetrisSettings,
    /// Snake.
    snake: SnakeSettings,
}

/// Rock-paper-scissors awards.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct RpsSettings {
    points_win: u32,
    points_draw: u32,
}

impl Default for RpsSettings {
    fn default() -> Self {
        Self {
            points_win: 5,
            points_draw: 1,
        }
    }
}

/// Tic-tac-toe awards.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct TicTacToeSettings {
    points_win: u32,
    points_draw: u32,
}

impl Default for TicTacToeSettings {
    fn default() -> Self {
        Self {
            points_win: 15,
            points_draw: 3,
        }
    }
}

/// Quiz awards and question selection.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct QuizSettings {
    points_per_correct: u32,
    questions_per_game: usize,
    /// Replaces the built-in pool when present.
    pool: Option<Vec<Question>>,
}

impl QuizSettings {
    /// Overrides the number of questions drawn per game.
    #[must_use]
    pub fn with_questions_per_game(mut self, count: usize) -> Self {
        self.questions_per_game = count;
        self
    }

    /// Overrides the question pool.
    #[must_use]
    pub fn with_pool(mut self, pool: Vec<Question>) -> Self {
        self.pool = Some(pool);
        self
    }
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            points_per_correct: 5,
            questions_per_game: 3,
            pool: None,
        }
    }
}

/// Battleship awards and fleet.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleshipSettings {
    points_win: u32,
    /// Ship lengths, placed in order.
    ships: Vec<usize>,
    /// Attempts per ship before it is skipped.
    placement_attempts: u32,
}

impl Default for BattleshipSettings {
    fn default() -> Self {
        Self {
            points_win: 20,
            ships: vec![3, 2, 1],
            placement_attempts: 100,
        }
    }
}

/// 2048 awards and spawn odds.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeSettings {
    points_win: u32,
    win_tile: u32,
    /// Probability a spawned tile is a 4 instead of a 2.
    four_probability: f64,
}

impl Default for MergeSettings {
    fn default() -> Self {
        Self {
            points_win: 20,
            win_tile: 2048,
            four_probability: 0.1,
        }
    }
}

/// Tetris awards and levelling.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct TetrisSettings {
    points_per_line: u32,
    lines_per_level: u32,
}

impl Default for TetrisSettings {
    fn default() -> Self {
        Self {
            points_per_line: 10,
            lines_per_level: 10,
        }
    }
}

/// Snake awards.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeSettings {
    points_per_food: u32,
}

impl Default for SnakeSettings {
    fn default() -> Self {
        Self { points_per_food: 10 }
    }
}

impl GameSettings {
    /// Replaces the quiz settings.
    #[must_use]
    pub fn with_quiz(mut self, quiz: QuizSettings) -> Self {
        self.quiz = quiz;
        self
    }

    /// Checks every table for values that would leave a game unplayable.
    ///
    /// Point awards are unconstrained. Everything else has to describe a
    /// game that can start and finish.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), InvalidSettings> {
        self.quiz.validate()?;
        self.battleship.validate()?;
        self.merge.validate()?;
        if self.tetris.lines_per_level == 0 {
            return Err(InvalidSettings::NoLinesPerLevel);
        }
        Ok(())
    }
}

impl QuizSettings {
    fn validate(&self) -> Result<(), InvalidSettings> {
        if self.questions_per_game == 0 {
            return Err(InvalidSettings::NoQuizQuestions);
        }
        let Some(pool) = &self.pool else {
            return Ok(());
        };
        if pool.is_empty() {
            return Err(InvalidSettings::EmptyQuizPool);
        }
        match pool
            .iter()
            .enumerate()
            .find(|(_, q)| q.correct >= q.answers.len())
        {
            Some((question, q)) => Err(InvalidSettings::CorrectAnswerOutOfRange {
                question,
                correct: q.correct,
                answers: q.answers.len(),
            }),
            None => Ok(()),
        }
    }
}

impl BattleshipSettings {
    fn validate(&self) -> Result<(), InvalidSettings> {
        if self.ships.is_empty() {
            return Err(InvalidSettings::NoShips);
        }
        if let Some(&length) = self.ships.iter().find(|&&len| len == 0 || len > BOARD_SIZE) {
            return Err(InvalidSettings::ShipLength {
                length,
                max: BOARD_SIZE,
            });
        }
        if self.placement_attempts == 0 {
            return Err(InvalidSettings::NoPlacementAttempts);
        }
        Ok(())
    }
}

impl MergeSettings {
    fn validate(&self) -> Result<(), InvalidSettings> {
        if !(0.0..=1.0).contains(&self.four_probability) {
            return Err(InvalidSettings::FourProbability(self.four_probability));
        }
        if self.win_tile < 4 || !self.win_tile.is_power_of_two() {
            return Err(InvalidSettings::WinTile(self.win_tile));
        }
        Ok(())
    }
}
