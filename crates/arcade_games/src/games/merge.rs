//! 2048: slide and merge tiles on a 4x4 grid.

use super::{Direction, GameEngine};
use crate::error::MoveError;
use crate::rng::RandomSource;
use crate::settings::GameSettings;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Side length of the grid.
pub const SIZE: usize = 4;

/// Tile values, row-major; 0 is empty.
pub type Tiles = [[u32; SIZE]; SIZE];

/// Slides one line towards index 0 and merges equal neighbours once.
///
/// Returns the new line and the sum of the merged tiles.
pub fn slide_line(line: [u32; SIZE]) -> ([u32; SIZE], u32) {
    let mut packed: Vec<u32> = line.iter().copied().filter(|&v| v != 0).collect();
    let mut gained = 0;

    let mut i = 0;
    while i + 1 < packed.len() {
        if packed[i] == packed[i + 1] {
            packed[i] *= 2;
            gained += packed[i];
            packed.remove(i + 1);
        }
        i += 1;
    }

    let mut out = [0; SIZE];
    for (slot, value) in out.iter_mut().zip(packed) {
        *slot = value;
    }
    (out, gained)
}

/// Reads the line at `index` in traversal order for `direction`.
///
/// Index 0 of the returned line is the edge tiles slide towards.
fn read_line(tiles: &Tiles, direction: Direction, index: usize) -> [u32; SIZE] {
    let mut line = [0; SIZE];
    for (k, slot) in line.iter_mut().enumerate() {
        *slot = match direction {
            Direction::Left => tiles[index][k],
            Direction::Right => tiles[index][SIZE - 1 - k],
            Direction::Up => tiles[k][index],
            Direction::Down => tiles[SIZE - 1 - k][index],
        };
    }
    line
}

fn write_line(tiles: &mut Tiles, direction: Direction, index: usize, line: [u32; SIZE]) {
    for (k, value) in line.into_iter().enumerate() {
        match direction {
            Direction::Left => tiles[index][k] = value,
            Direction::Right => tiles[index][SIZE - 1 - k] = value,
            Direction::Up => tiles[k][index] = value,
            Direction::Down => tiles[SIZE - 1 - k][index] = value,
        }
    }
}

/// Slides the whole grid. Returns the points gained by merges.
pub fn slide(tiles: &mut Tiles, direction: Direction) -> u32 {
    let mut gained = 0;
    for index in 0..SIZE {
        let (line, points) = slide_line(read_line(tiles, direction, index));
        write_line(tiles, direction, index, line);
        gained += points;
    }
    gained
}

/// Whether any slide could change the grid.
pub fn can_move(tiles: &Tiles) -> bool {
    for r in 0..SIZE {
        for c in 0..SIZE {
            if tiles[r][c] == 0 {
                return true;
            }
            if r + 1 < SIZE && tiles[r][c] == tiles[r + 1][c] {
                return true;
            }
            if c + 1 < SIZE && tiles[r][c] == tiles[r][c + 1] {
                return true;
            }
        }
    }
    false
}

/// Places a 2 (or a 4, with `four_probability`) on a random empty cell.
///
/// Returns the cell used, or `None` when the grid is full.
pub fn spawn_tile<R: RandomSource>(tiles: &mut Tiles, four_probability: f64, rng: &mut R) -> Option<(usize, usize)> {
    let empty: Vec<(usize, usize)> = (0..SIZE)
        .flat_map(|r| (0..SIZE).map(move |c| (r, c)))
        .filter(|&(r, c)| tiles[r][c] == 0)
        .collect();
    let &(r, c) = rng.choose(&empty)?;
    tiles[r][c] = if rng.chance(four_probability) { 4 } else { 2 };
    Some((r, c))
}

/// Status tag of a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MergeStatus {
    /// Tiles moved; play on.
    Continue,
    /// Nothing could slide that way; no tile spawned, no move counted.
    Unchanged,
    /// A winning tile appeared.
    Win,
    /// No slide can change the grid any more.
    Lose,
}

impl MergeStatus {
    /// Whether this status ends the game.
    pub fn is_terminal(self) -> bool {
        matches!(self, MergeStatus::Win | MergeStatus::Lose)
    }
}

/// Session payload for 2048.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeState {
    /// Tile grid.
    pub tiles: Tiles,
    /// Sum of all merges.
    pub score: u32,
    /// Slides that changed the grid.
    pub moves: u32,
    /// Set once the game is decided.
    pub finished: bool,
}

impl MergeState {
    /// Builds a state from a fixed grid.
    pub fn from_tiles(tiles: Tiles) -> Self {
        Self {
            tiles,
            ..Self::default()
        }
    }

    /// Highest tile on the grid.
    pub fn max_tile(&self) -> u32 {
        self.tiles.iter().flatten().copied().max().unwrap_or(0)
    }

    fn outcome(&self, status: MergeStatus, moved: bool, gained: u32, points: u32) -> MergeOutcome {
        MergeOutcome {
            status,
            tiles: self.tiles,
            score: self.score,
            moves: self.moves,
            moved,
            gained,
            points,
        }
    }
}

/// Result of one slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeOutcome {
    /// Status tag.
    pub status: MergeStatus,
    /// Grid after the slide and spawn.
    pub tiles: Tiles,
    /// Total score.
    pub score: u32,
    /// Slides that changed the grid.
    pub moves: u32,
    /// Whether any tile moved.
    pub moved: bool,
    /// Merge points from this slide.
    pub gained: u32,
    /// Points awarded.
    pub points: u32,
}

impl GameEngine for MergeState {
    type Move = Direction;
    type Outcome = MergeOutcome;

    #[instrument(skip(settings, rng))]
    fn new_game<R: RandomSource>(settings: &GameSettings, rng: &mut R) -> Self {
        let mut state = Self::default();
        let p = *settings.merge().four_probability();
        spawn_tile(&mut state.tiles, p, rng);
        spawn_tile(&mut state.tiles, p, rng);
        state
    }

    #[instrument(skip(self, settings, rng), fields(score = self.score, moves = self.moves))]
    fn apply<R: RandomSource>(
        &mut self,
        direction: Direction,
        settings: &GameSettings,
        rng: &mut R,
    ) -> Result<MergeOutcome, MoveError> {
        if self.finished {
            return Err(MoveError::GameOver);
        }

        let mut next = self.tiles;
        let gained = slide(&mut next, direction);
        if next == self.tiles {
            if can_move(&self.tiles) {
                debug!(%direction, "Slide changed nothing");
                return Ok(self.outcome(MergeStatus::Unchanged, false, 0, 0));
            }
            self.finished = true;
            info!(score = self.score, "No moves left");
            return Ok(self.outcome(MergeStatus::Lose, false, 0, 0));
        }

        self.tiles = next;
        self.score += gained;
        self.moves += 1;
        let spawned = spawn_tile(&mut self.tiles, *settings.merge().four_probability(), rng);
        debug!(%direction, gained, ?spawned, "Slid grid");

        if self.max_tile() >= *settings.merge().win_tile() {
            self.finished = true;
            info!(score = self.score, "Winning tile reached");
            return Ok(self.outcome(MergeStatus::Win, true, gained, *settings.merge().points_win()));
        }
        if !can_move(&self.tiles) {
            self.finished = true;
            info!(score = self.score, "Grid locked");
            return Ok(self.outcome(MergeStatus::Lose, true, gained, 0));
        }

        Ok(self.outcome(MergeStatus::Continue, true, gained, 0))
    }
}
