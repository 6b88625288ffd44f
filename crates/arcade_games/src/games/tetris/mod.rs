//! Tetris on a 20x10 well, driven one action at a time.

mod piece;

pub use piece::{Piece, PieceKind, rotate_clockwise};

use super::GameEngine;
use crate::error::MoveError;
use crate::rng::RandomSource;
use crate::settings::GameSettings;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument, warn};

/// Rows in the well.
pub const HEIGHT: usize = 20;
/// Columns in the well.
pub const WIDTH: usize = 10;

/// Occupancy grid, row 0 at the top.
pub type Well = [[bool; WIDTH]; HEIGHT];

/// A player action.
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
pub enum TetrisAction {
    /// Shift one column left.
    Left,
    /// Shift one column right.
    Right,
    /// Drop one row, locking the piece if it cannot fall.
    Down,
    /// Rotate clockwise.
    Rotate,
}

impl TetrisAction {
    /// Parses an action token.
    pub fn parse(token: &str) -> Result<Self, MoveError> {
        Self::from_str(token.trim()).map_err(|_| MoveError::UnknownAction(token.trim().to_string()))
    }
}

/// Whether `shape` anchored at `(row, col)` stays inside the walls and
/// floor without overlapping settled cells. Cells above the top are free.
pub fn fits(well: &Well, shape: &[Vec<bool>], row: i32, col: i32) -> bool {
    Piece::cells_of(shape, row, col).into_iter().all(|(r, c)| {
        if c < 0 || c >= WIDTH as i32 || r >= HEIGHT as i32 {
            return false;
        }
        r < 0 || !well[r as usize][c as usize]
    })
}

/// Writes the piece's cells into the well; cells above the top are dropped.
pub fn lock(well: &mut Well, piece: &Piece) {
    for (r, c) in piece.cells() {
        if (0..HEIGHT as i32).contains(&r) && (0..WIDTH as i32).contains(&c) {
            well[r as usize][c as usize] = true;
        }
    }
}

/// Removes full rows, shifting everything above down. Returns rows removed.
pub fn clear_lines(well: &mut Well) -> usize {
    let kept: Vec<[bool; WIDTH]> = well
        .iter()
        .filter(|row| !row.iter().all(|&c| c))
        .copied()
        .collect();
    let cleared = HEIGHT - kept.len();
    if cleared == 0 {
        return 0;
    }
    let mut next = [[false; WIDTH]; HEIGHT];
    for (i, row) in kept.into_iter().enumerate() {
        next[cleared + i] = row;
    }
    *well = next;
    cleared
}

fn random_piece<R: RandomSource>(rng: &mut R) -> Piece {
    let kinds: Vec<PieceKind> = PieceKind::iter().collect();
    let kind = rng.choose(&kinds).copied().unwrap_or_else(|| {
        warn!("Random draw out of range, spawning I");
        PieceKind::I
    });
    Piece::spawn(kind)
}

/// Status tag of a tetris action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TetrisStatus {
    /// Play on.
    Continue,
    /// A fresh piece had no room.
    GameOver,
}

/// Session payload for tetris.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TetrisState {
    /// Settled cells.
    pub well: Well,
    /// Falling piece.
    pub piece: Piece,
    /// Total score.
    pub score: u32,
    /// Total rows cleared.
    pub lines_cleared: u32,
    /// Current level, starting at 1.
    pub level: u32,
    /// Set once a spawn collides.
    pub finished: bool,
}

impl TetrisState {
    /// Builds a state from a well and a falling piece.
    pub fn with_piece(well: Well, piece: Piece) -> Self {
        Self {
            well,
            piece,
            score: 0,
            lines_cleared: 0,
            level: 1,
            finished: false,
        }
    }

    fn outcome(&self, status: TetrisStatus, locked: bool, cleared: u32, points: u32) -> TetrisOutcome {
        TetrisOutcome {
            status,
            well: self.well,
            piece: self.piece.clone(),
            score: self.score,
            lines_cleared: self.lines_cleared,
            level: self.level,
            locked,
            cleared,
            points,
        }
    }

    fn shift(&mut self, dc: i32) {
        if fits(&self.well, &self.piece.shape, self.piece.row, self.piece.col + dc) {
            self.piece.col += dc;
        }
    }

    fn rotate(&mut self) {
        let rotated = rotate_clockwise(&self.piece.shape);
        if fits(&self.well, &rotated, self.piece.row, self.piece.col) {
            self.piece.shape = rotated;
        }
    }
}

/// Result of one action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TetrisOutcome {
    /// Status tag.
    pub status: TetrisStatus,
    /// Settled cells.
    pub well: Well,
    /// Falling piece after the action.
    pub piece: Piece,
    /// Total score.
    pub score: u32,
    /// Total rows cleared.
    pub lines_cleared: u32,
    /// Current level.
    pub level: u32,
    /// Whether the piece locked this action.
    pub locked: bool,
    /// Rows cleared this action.
    pub cleared: u32,
    /// Points awarded this action.
    pub points: u32,
}

impl GameEngine for TetrisState {
    type Move = TetrisAction;
    type Outcome = TetrisOutcome;

    fn new_game<R: RandomSource>(_settings: &GameSettings, rng: &mut R) -> Self {
        Self::with_piece([[false; WIDTH]; HEIGHT], random_piece(rng))
    }

    #[instrument(skip(self, settings, rng), fields(piece = %self.piece.kind, score = self.score))]
    fn apply<R: RandomSource>(
        &mut self,
        action: TetrisAction,
        settings: &GameSettings,
        rng: &mut R,
    ) -> Result<TetrisOutcome, MoveError> {
        if self.finished {
            return Err(MoveError::GameOver);
        }

        match action {
            TetrisAction::Left => self.shift(-1),
            TetrisAction::Right => self.shift(1),
            TetrisAction::Rotate => self.rotate(),
            TetrisAction::Down => {
                if fits(&self.well, &self.piece.shape, self.piece.row + 1, self.piece.col) {
                    self.piece.row += 1;
                } else {
                    return Ok(self.lock_and_spawn(settings, rng));
                }
            }
        }

        Ok(self.outcome(TetrisStatus::Continue, false, 0, 0))
    }
}

impl TetrisState {
    fn lock_and_spawn<R: RandomSource>(&mut self, settings: &GameSettings, rng: &mut R) -> TetrisOutcome {
        lock(&mut self.well, &self.piece);
        let cleared = clear_lines(&mut self.well) as u32;
        let points = cleared * *settings.tetris().points_per_line();
        self.score += points;
        self.lines_cleared += cleared;
        self.level = 1 + self.lines_cleared / (*settings.tetris().lines_per_level()).max(1);
        debug!(kind = %self.piece.kind, cleared, "Piece locked");

        let next = random_piece(rng);
        if !fits(&self.well, &next.shape, next.row, next.col) {
            self.finished = true;
            info!(score = self.score, lines = self.lines_cleared, "Well topped out");
            return self.outcome(TetrisStatus::GameOver, true, cleared, points);
        }
        self.piece = next;
        self.outcome(TetrisStatus::Continue, true, cleared, points)
    }
}
