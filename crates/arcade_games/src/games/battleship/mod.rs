//! Battleship: shoot at a hidden fleet on a 5x5 board.

mod placement;

pub use placement::place_fleet;

use super::GameEngine;
use crate::error::MoveError;
use crate::rng::RandomSource;
use crate::settings::GameSettings;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Side length of the board.
pub const BOARD_SIZE: usize = 5;

/// Shot coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shot {
    /// Row, 0-based.
    pub row: usize,
    /// Column, 0-based.
    pub col: usize,
}

/// What the player knows about a cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    /// Not fired at.
    #[default]
    Unknown,
    /// Fired at, ship there.
    Hit,
    /// Fired at, water.
    Miss,
}

/// A straight ship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ship {
    /// Occupied cells as `(row, col)`.
    pub cells: Vec<(usize, usize)>,
}

impl Ship {
    /// Builds a ship of `len` cells anchored at `(row, col)`.
    pub fn new(row: usize, col: usize, len: usize, horizontal: bool) -> Self {
        let cells = (0..len)
            .map(|i| if horizontal { (row, col + i) } else { (row + i, col) })
            .collect();
        Self { cells }
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the ship has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether the ship occupies `(row, col)`.
    pub fn occupies(&self, row: usize, col: usize) -> bool {
        self.cells.contains(&(row, col))
    }

    /// Whether the two ships share a cell.
    pub fn overlaps(&self, other: &Ship) -> bool {
        self.cells.iter().any(|&(r, c)| other.occupies(r, c))
    }
}

/// Status tag of a shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BattleshipStatus {
    /// Fleet still afloat.
    Continue,
    /// Every ship cell hit.
    Win,
    /// Cell fired at before; nothing changed.
    AlreadyShot,
}

/// Session payload for battleship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleshipState {
    /// Shots grid as seen by the player.
    pub board: [[Cell; BOARD_SIZE]; BOARD_SIZE],
    /// Hidden fleet.
    pub ships: Vec<Ship>,
    /// Shots fired.
    pub shots: u32,
    /// Shots that hit.
    pub hits: u32,
    /// Set once every ship cell is hit.
    pub finished: bool,
}

impl BattleshipState {
    /// Builds a state around a given fleet.
    pub fn with_fleet(ships: Vec<Ship>) -> Self {
        Self {
            board: [[Cell::Unknown; BOARD_SIZE]; BOARD_SIZE],
            ships,
            shots: 0,
            hits: 0,
            finished: false,
        }
    }

    /// Total cells across the fleet.
    pub fn total_ship_cells(&self) -> u32 {
        self.ships.iter().map(|s| s.len() as u32).sum()
    }

    fn outcome(&self, status: BattleshipStatus, hit: bool, points: u32) -> BattleshipOutcome {
        BattleshipOutcome {
            status,
            hit,
            shots: self.shots,
            hits: self.hits,
            board: self.board,
            points,
        }
    }
}

/// Result of one shot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleshipOutcome {
    /// Status tag.
    pub status: BattleshipStatus,
    /// Whether this shot hit.
    pub hit: bool,
    /// Shots fired so far.
    pub shots: u32,
    /// Hits so far.
    pub hits: u32,
    /// Shots grid after the shot.
    pub board: [[Cell; BOARD_SIZE]; BOARD_SIZE],
    /// Points awarded.
    pub points: u32,
}

impl GameEngine for BattleshipState {
    type Move = Shot;
    type Outcome = BattleshipOutcome;

    #[instrument(skip(settings, rng))]
    fn new_game<R: RandomSource>(settings: &GameSettings, rng: &mut R) -> Self {
        let cfg = settings.battleship();
        let ships = place_fleet(cfg.ships(), *cfg.placement_attempts(), rng);
        debug!(ships = ships.len(), "Fleet placed");
        Self::with_fleet(ships)
    }

    #[instrument(skip(self, settings, _rng), fields(shots = self.shots, hits = self.hits))]
    fn apply<R: RandomSource>(
        &mut self,
        shot: Shot,
        settings: &GameSettings,
        _rng: &mut R,
    ) -> Result<BattleshipOutcome, MoveError> {
        if self.finished {
            return Err(MoveError::GameOver);
        }
        let Shot { row, col } = shot;
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            warn!(row, col, "Shot off the board");
            return Err(MoveError::InvalidCoordinates { row, col });
        }
        if self.board[row][col] != Cell::Unknown {
            debug!(row, col, "Cell already shot");
            return Ok(self.outcome(BattleshipStatus::AlreadyShot, false, 0));
        }

        let hit = self.ships.iter().any(|ship| ship.occupies(row, col));
        self.board[row][col] = if hit { Cell::Hit } else { Cell::Miss };
        self.shots += 1;
        if hit {
            self.hits += 1;
        }
        debug!(row, col, hit, "Shot resolved");

        if self.hits >= self.total_ship_cells() {
            self.finished = true;
            info!(shots = self.shots, "Fleet sunk");
            return Ok(self.outcome(BattleshipStatus::Win, hit, *settings.battleship().points_win()));
        }

        Ok(self.outcome(BattleshipStatus::Continue, hit, 0))
    }
}
