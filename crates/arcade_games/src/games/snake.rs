//! Snake on a walled 10x10 grid.

use super::{Direction, GameEngine};
use crate::error::MoveError;
use crate::rng::RandomSource;
use crate::settings::GameSettings;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, info, instrument, warn};

/// Side length of the grid.
pub const GRID: usize = 10;

/// A grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    /// Row, 0 at the top.
    pub row: usize,
    /// Column, 0 at the left.
    pub col: usize,
}

impl Point {
    /// Creates a point.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The neighbouring cell in `direction`, or `None` past a wall.
    pub fn step(self, direction: Direction) -> Option<Point> {
        let (dr, dc) = direction.delta();
        let row = self.row.checked_add_signed(dr).filter(|&r| r < GRID)?;
        let col = self.col.checked_add_signed(dc).filter(|&c| c < GRID)?;
        Some(Point { row, col })
    }
}

/// Status tag of a snake step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SnakeStatus {
    /// Play on.
    Continue,
    /// Hit a wall or the body.
    GameOver,
}

/// Session payload for snake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnakeState {
    /// Body cells, head first.
    pub body: VecDeque<Point>,
    /// Food cell; absent once the body fills the grid.
    pub food: Option<Point>,
    /// Current heading.
    pub direction: Direction,
    /// Total score.
    pub score: u32,
    /// Set after a collision.
    pub finished: bool,
}

impl SnakeState {
    /// Builds a state from a body and food, heading `direction`.
    pub fn with_body(body: impl IntoIterator<Item = Point>, food: Option<Point>, direction: Direction) -> Self {
        Self {
            body: body.into_iter().collect(),
            food,
            direction,
            score: 0,
            finished: false,
        }
    }

    /// Current head cell.
    pub fn head(&self) -> Option<Point> {
        self.body.front().copied()
    }

    fn place_food<R: RandomSource>(&mut self, rng: &mut R) {
        let free: Vec<Point> = (0..GRID)
            .flat_map(|row| (0..GRID).map(move |col| Point { row, col }))
            .filter(|p| !self.body.contains(p))
            .collect();
        self.food = rng.choose(&free).copied();
        if self.food.is_none() {
            warn!(length = self.body.len(), "No free cell for food");
        }
    }

    fn outcome(&self, status: SnakeStatus, ate: bool, points: u32) -> SnakeOutcome {
        SnakeOutcome {
            status,
            body: self.body.iter().copied().collect(),
            food: self.food,
            direction: self.direction,
            length: self.body.len(),
            score: self.score,
            ate,
            points,
        }
    }
}

/// Result of one step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnakeOutcome {
    /// Status tag.
    pub status: SnakeStatus,
    /// Body cells, head first.
    pub body: Vec<Point>,
    /// Food cell.
    pub food: Option<Point>,
    /// Heading after the step.
    pub direction: Direction,
    /// Body length.
    pub length: usize,
    /// Total score.
    pub score: u32,
    /// Whether food was eaten this step.
    pub ate: bool,
    /// Points awarded this step.
    pub points: u32,
}

impl GameEngine for SnakeState {
    type Move = Direction;
    type Outcome = SnakeOutcome;

    fn new_game<R: RandomSource>(_settings: &GameSettings, rng: &mut R) -> Self {
        let mut state = Self::with_body([Point::new(5, 5)], None, Direction::Right);
        state.place_food(rng);
        state
    }

    #[instrument(skip(self, settings, rng), fields(heading = %self.direction, length = self.body.len()))]
    fn apply<R: RandomSource>(
        &mut self,
        direction: Direction,
        settings: &GameSettings,
        rng: &mut R,
    ) -> Result<SnakeOutcome, MoveError> {
        if self.finished {
            return Err(MoveError::GameOver);
        }
        if direction == self.direction.opposite() {
            return Err(MoveError::InvalidDirection {
                requested: direction,
                current: self.direction,
            });
        }
        let head = self.head().ok_or(MoveError::GameOver)?;

        self.direction = direction;
        let next = match head.step(direction) {
            Some(p) if !self.body.contains(&p) => p,
            _ => {
                self.finished = true;
                info!(score = self.score, length = self.body.len(), "Snake crashed");
                return Ok(self.outcome(SnakeStatus::GameOver, false, 0));
            }
        };

        self.body.push_front(next);
        let ate = self.food == Some(next);
        let points = if ate {
            let points = *settings.snake().points_per_food();
            self.score += points;
            self.place_food(rng);
            debug!(length = self.body.len(), "Food eaten");
            points
        } else {
            self.body.pop_back();
            0
        };

        Ok(self.outcome(SnakeStatus::Continue, ate, points))
    }
}
