//! Win detection for tic-tac-toe.

use super::super::{Board, Mark, Square};
use tracing::instrument;

/// The eight winning lines: three rows, three columns, two diagonals.
pub const LINES: [[usize; 3]; 8] = [
    // Rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonals
    [0, 4, 8],
    [2, 4, 6],
];

/// Returns the mark owning a completed line, if any.
///
/// Every line is scanned on every call, not just the one through the last
/// move.
#[instrument(skip(board))]
pub fn check_winner(board: &Board) -> Option<Mark> {
    for [a, b, c] in LINES {
        let sq = board.squares()[a];
        if sq != Square::Empty && sq == board.squares()[b] && sq == board.squares()[c] {
            return match sq {
                Square::Occupied(mark) => Some(mark),
                Square::Empty => None,
            };
        }
    }

    None
}
