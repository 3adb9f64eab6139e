//! Win and draw detection for the 4x4 board.

use crate::store::records::Cell;
use std::collections::BTreeSet;
use tracing::instrument;

/// A completed 4-cell line.
pub type WinningLine = [Cell; 4];

const fn line(a: u8, b: u8, c: u8, d: u8) -> WinningLine {
    [Cell::raw(a), Cell::raw(b), Cell::raw(c), Cell::raw(d)]
}

/// The 10 winning lines of the 4x4 grid: 4 rows, 4 columns, 2 diagonals.
pub const WINNING_LINES: [WinningLine; 10] = [
    // Rows
    line(0, 1, 2, 3),
    line(4, 5, 6, 7),
    line(8, 9, 10, 11),
    line(12, 13, 14, 15),
    // Columns
    line(0, 4, 8, 12),
    line(1, 5, 9, 13),
    line(2, 6, 10, 14),
    line(3, 7, 11, 15),
    // Diagonals
    line(0, 5, 10, 15),
    line(3, 6, 9, 12),
];

/// Checks whether a seat's held-position set contains a winning line.
///
/// Returns the first fully-held line in table order, `None` otherwise.
#[instrument(level = "debug", ret)]
pub fn check_win(held: &BTreeSet<Cell>) -> Option<WinningLine> {
    WINNING_LINES
        .iter()
        .find(|combo| combo.iter().all(|cell| held.contains(cell)))
        .copied()
}

/// Checks whether the two held sets fill the board.
///
/// Evaluated only after [`check_win`] has found nothing this move; a board
/// that is simultaneously full and winning reports a win, never a draw.
#[instrument(level = "debug", ret)]
pub fn is_board_full(one: &BTreeSet<Cell>, two: &BTreeSet<Cell>) -> bool {
    one.len() + two.len() == Cell::COUNT
}
