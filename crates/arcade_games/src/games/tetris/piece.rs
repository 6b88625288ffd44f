//! Tetromino shapes and rotation.

use serde::{Deserialize, Serialize};

/// The seven standard tetrominoes.
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
    strum::EnumIter,
)]
pub enum PieceKind {
    /// Four in a row.
    I,
    /// 2x2 square.
    O,
    /// J hook.
    J,
    /// L hook.
    L,
    /// S skew.
    S,
    /// Z skew.
    Z,
    /// T junction.
    T,
}

impl PieceKind {
    /// Spawn shape, row-major.
    pub fn shape(self) -> Vec<Vec<bool>> {
        let rows: &[&[u8]] = match self {
            PieceKind::I => &[&[1, 1, 1, 1]],
            PieceKind::O => &[&[1, 1], &[1, 1]],
            PieceKind::J => &[&[1, 0, 0], &[1, 1, 1]],
            PieceKind::L => &[&[0, 0, 1], &[1, 1, 1]],
            PieceKind::S => &[&[0, 1, 1], &[1, 1, 0]],
            PieceKind::Z => &[&[1, 1, 0], &[0, 1, 1]],
            PieceKind::T => &[&[0, 1, 0], &[1, 1, 1]],
        };
        rows.iter()
            .map(|row| row.iter().map(|&c| c == 1).collect())
            .collect()
    }

    /// Column of the shape's left edge at spawn.
    pub fn spawn_col(self) -> i32 {
        match self {
            PieceKind::O => 4,
            _ => 3,
        }
    }
}

/// The falling piece: a shape anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    /// Which tetromino.
    pub kind: PieceKind,
    /// Current orientation, row-major.
    pub shape: Vec<Vec<bool>>,
    /// Anchor row; may be negative above the well.
    pub row: i32,
    /// Anchor column.
    pub col: i32,
}

impl Piece {
    /// A fresh piece at its spawn position.
    pub fn spawn(kind: PieceKind) -> Self {
        Self {
            kind,
            shape: kind.shape(),
            row: 0,
            col: kind.spawn_col(),
        }
    }

    /// Absolute `(row, col)` of every filled cell for a shape at an anchor.
    pub fn cells_of(shape: &[Vec<bool>], row: i32, col: i32) -> Vec<(i32, i32)> {
        shape
            .iter()
            .enumerate()
            .flat_map(|(i, line)| {
                line.iter()
                    .enumerate()
                    .filter(|(_, filled)| **filled)
                    .map(move |(j, _)| (row + i as i32, col + j as i32))
            })
            .collect()
    }

    /// Absolute cells of this piece.
    pub fn cells(&self) -> Vec<(i32, i32)> {
        Self::cells_of(&self.shape, self.row, self.col)
    }
}

/// Rotates a shape 90° clockwise: reverse the rows, then transpose.
pub fn rotate_clockwise(shape: &[Vec<bool>]) -> Vec<Vec<bool>> {
    let height = shape.len();
    let width = shape.first().map_or(0, Vec::len);
    (0..width)
        .map(|j| (0..height).map(|i| shape[height - 1 - i][j]).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_piece_has_four_cells() {
        for kind in PieceKind::iter() {
            assert_eq!(Piece::spawn(kind).cells().len(), 4, "{kind}");
        }
    }

    #[test]
    fn test_rotate_i() {
        let vertical = rotate_clockwise(&PieceKind::I.shape());
        assert_eq!(vertical, vec![vec![true]; 4]);
        assert_eq!(rotate_clockwise(&vertical), PieceKind::I.shape());
    }

    #[test]
    fn test_rotate_j() {
        // 1 0 0      1 1
        // 1 1 1  ->  1 0
        //            1 0
        let rotated = rotate_clockwise(&PieceKind::J.shape());
        assert_eq!(
            rotated,
            vec![vec![true, true], vec![true, false], vec![true, false]]
        );
    }

    #[test]
    fn test_four_rotations_is_identity() {
        for kind in PieceKind::iter() {
            let mut shape = kind.shape();
            for _ in 0..4 {
                shape = rotate_clockwise(&shape);
            }
            assert_eq!(shape, kind.shape());
        }
    }
}
