//! Move validation for the turn engine.

use crate::store::records::{Cell, GameStateRecord, Seat};
use derive_more::{Display, Error};
use std::collections::BTreeSet;
use tracing::instrument;

/// A rejected move. These are expected, non-fatal, and leave all state
/// unchanged; the player may retry immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum MoveError {
    /// The game has already ended.
    #[display("the game is over")]
    GameOver,
    /// It is the other seat's turn.
    #[display("it's not your turn, waiting for {_0}")]
    NotYourTurn(#[error(not(source))] Seat),
    /// The cell is already held by one of the seats.
    #[display("cell {_0} is already taken")]
    CellOccupied(#[error(not(source))] Cell),
}

/// Validates a move against the shared game state and both held sets.
///
/// Preconditions, in order: the game is still running, it is `seat`'s turn,
/// and `cell` is not a member of either held-position set.
#[instrument(skip(state, mine, theirs), fields(current = %state.current_player))]
pub fn validate_move(
    state: &GameStateRecord,
    seat: Seat,
    cell: Cell,
    mine: &BTreeSet<Cell>,
    theirs: &BTreeSet<Cell>,
) -> Result<(), MoveError> {
    if state.is_game_over {
        return Err(MoveError::GameOver);
    }
    if state.current_player != seat {
        return Err(MoveError::NotYourTurn(state.current_player));
    }
    if mine.contains(&cell) || theirs.contains(&cell) {
        return Err(MoveError::CellOccupied(cell));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(index: u8) -> Cell {
        Cell::new(index).unwrap()
    }

    #[test]
    fn test_valid_move() {
        let state = GameStateRecord::default();
        let result = validate_move(&state, Seat::One, cell(5), &BTreeSet::new(), &BTreeSet::new());
        assert!(result.is_ok());
    }

    #[test]
    fn test_wrong_turn_rejected() {
        let state = GameStateRecord::default();
        let result = validate_move(&state, Seat::Two, cell(5), &BTreeSet::new(), &BTreeSet::new());
        assert_eq!(result, Err(MoveError::NotYourTurn(Seat::One)));
    }

    #[test]
    fn test_occupied_by_self_rejected() {
        let state = GameStateRecord::default();
        let mine: BTreeSet<Cell> = [cell(5)].into_iter().collect();
        let result = validate_move(&state, Seat::One, cell(5), &mine, &BTreeSet::new());
        assert_eq!(result, Err(MoveError::CellOccupied(cell(5))));
    }

    #[test]
    fn test_occupied_by_opponent_rejected() {
        let state = GameStateRecord::default();
        let theirs: BTreeSet<Cell> = [cell(9)].into_iter().collect();
        let result = validate_move(&state, Seat::One, cell(9), &BTreeSet::new(), &theirs);
        assert_eq!(result, Err(MoveError::CellOccupied(cell(9))));
    }

    #[test]
    fn test_finished_game_rejected() {
        let state = GameStateRecord {
            is_game_over: true,
            ..GameStateRecord::default()
        };
        let result = validate_move(&state, Seat::One, cell(0), &BTreeSet::new(), &BTreeSet::new());
        assert_eq!(result, Err(MoveError::GameOver));
    }
}
