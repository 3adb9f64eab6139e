//! Turn-coordination and win-detection state machine.
//!
//! Pure rules (seat assignment, move validation, outcome detection) live in
//! their own modules and are orchestrated by the [`lifecycle`] controller,
//! which is the only part that talks to the store.

pub mod lifecycle;
pub mod moves;
pub mod outcome;
pub mod seat;

pub use lifecycle::{BoardView, ClientView, Control, ControlLabel, GameClient, MoveOutcome};
pub use moves::MoveError;
pub use outcome::{WINNING_LINES, WinningLine, check_win, is_board_full};
pub use seat::{FlipResolution, claim_slot, resolve};
