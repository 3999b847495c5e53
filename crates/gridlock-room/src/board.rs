//! Win and draw detection on a 3×3 board.

use gridlock_protocol::{Board, Mark};

/// The eight lines that win the game, in the order they are checked:
/// rows top to bottom, columns left to right, then both diagonals.
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Returns the mark owning a complete line, if any.
///
/// The first matching line in [`WINNING_LINES`] order decides. Two
/// different marks can't both complete a line through legal play, but
/// the ordering keeps the answer deterministic for any board.
pub fn check_winner(board: &Board) -> Option<Mark> {
    WINNING_LINES.iter().find_map(|&[a, b, c]| match board[a] {
        Some(mark) if board[b] == Some(mark) && board[c] == Some(mark) => {
            Some(mark)
        }
        _ => None,
    })
}

/// Returns `true` when no empty cell is left.
pub fn is_full(board: &Board) -> bool {
    board.iter().all(Option::is_some)
}
