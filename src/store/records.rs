//! Shared record types persisted by the state store.
//!
//! The four records (`coin.json`, `gamestate.json`, `player_1.json`,
//! `player_2.json`) are the only channel between the two clients, so their
//! JSON shapes double as the wire format of the HTTP store.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One of the two fixed player roles, assigned once per game by the coin flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Seat {
    /// Seat 1 (plays `O`, moves first in a fresh game).
    One,
    /// Seat 2 (plays `X`).
    Two,
}

impl Seat {
    /// Returns the opposing seat.
    pub fn opponent(self) -> Self {
        match self {
            Seat::One => Seat::Two,
            Seat::Two => Seat::One,
        }
    }

    /// The seat's numeric id as stored on the wire (1 or 2).
    pub fn index(self) -> u8 {
        match self {
            Seat::One => 1,
            Seat::Two => 2,
        }
    }

    /// The icon this seat places on the board.
    pub fn icon(self) -> PlayerIcon {
        match self {
            Seat::One => PlayerIcon::O,
            Seat::Two => PlayerIcon::X,
        }
    }

    /// Both seats, in order.
    pub fn both() -> [Seat; 2] {
        [Seat::One, Seat::Two]
    }
}

impl std::fmt::Display for Seat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.index())
    }
}

impl From<Seat> for u8 {
    fn from(seat: Seat) -> u8 {
        seat.index()
    }
}

impl TryFrom<u8> for Seat {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Seat::One),
            2 => Ok(Seat::Two),
            other => Err(format!("invalid seat: {other}")),
        }
    }
}

/// A cell on the 4x4 board, indexed 0-15 in row-major order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Cell(u8);

impl Cell {
    /// Number of cells on the board.
    pub const COUNT: usize = 16;

    /// Creates a cell from a board index, rejecting out-of-range values.
    pub fn new(index: u8) -> Option<Self> {
        (index < Self::COUNT as u8).then_some(Self(index))
    }

    /// Constructs a cell from a known-good index.
    pub(crate) const fn raw(index: u8) -> Self {
        Self(index)
    }

    /// The cell's board index (0-15).
    pub fn index(self) -> u8 {
        self.0
    }

    /// The cell's row (0-3).
    pub fn row(self) -> u8 {
        self.0 / 4
    }

    /// The cell's column (0-3).
    pub fn col(self) -> u8 {
        self.0 % 4
    }

    /// Iterates over all 16 cells in index order.
    pub fn all() -> impl Iterator<Item = Cell> {
        (0..Self::COUNT as u8).map(Cell)
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Cell> for u8 {
    fn from(cell: Cell) -> u8 {
        cell.0
    }
}

impl TryFrom<u8> for Cell {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Cell::new(value).ok_or_else(|| format!("cell index out of range: {value}"))
    }
}

/// The face a coin flip landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoinFace {
    /// Heads.
    Heads,
    /// Tails.
    Tails,
}

/// Which of the two coin slots a client claimed when it flipped.
///
/// The slot is claimed first-unset-wins and says nothing about the final
/// seat; seats are decided by [`resolve`](crate::game::seat::resolve) once
/// both slots are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoinSlot {
    /// The `coin_1` slot.
    One,
    /// The `coin_2` slot.
    Two,
}

/// The coin record: each client's independently generated flip result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinRecord {
    /// First slot, claimed by whichever client flips first.
    pub coin_1: Option<CoinFace>,
    /// Second slot.
    pub coin_2: Option<CoinFace>,
}

impl CoinRecord {
    /// Reads the given slot.
    pub fn slot(&self, slot: CoinSlot) -> Option<CoinFace> {
        match slot {
            CoinSlot::One => self.coin_1,
            CoinSlot::Two => self.coin_2,
        }
    }

    /// Writes the given slot.
    pub fn set_slot(&mut self, slot: CoinSlot, face: CoinFace) {
        match slot {
            CoinSlot::One => self.coin_1 = Some(face),
            CoinSlot::Two => self.coin_2 = Some(face),
        }
    }
}

/// Lifecycle phase of the shared game.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GameStatus {
    /// Waiting on the coin flip to assign seats.
    #[default]
    CoinFlip,
    /// Seats assigned, board empty, waiting for the first mover to start.
    Ready,
    /// Moves are being accepted.
    Playing,
    /// A win or draw has been recorded.
    GameOver,
}

/// Outcome of a finished game as stored in the game-state record.
///
/// Serialized as the original's winner string: `""`, `"Draw"`,
/// `"Player 1"` or `"Player 2"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Winner {
    /// Game not decided yet.
    #[default]
    Undecided,
    /// Board filled with no completed line.
    Draw,
    /// The given seat completed a line.
    Seat(Seat),
}

impl From<Winner> for String {
    fn from(winner: Winner) -> String {
        match winner {
            Winner::Undecided => String::new(),
            Winner::Draw => "Draw".to_string(),
            Winner::Seat(seat) => seat.to_string(),
        }
    }
}

impl TryFrom<String> for Winner {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "" => Ok(Winner::Undecided),
            "Draw" => Ok(Winner::Draw),
            "Player 1" => Ok(Winner::Seat(Seat::One)),
            "Player 2" => Ok(Winner::Seat(Seat::Two)),
            other => Err(format!("invalid winner: {other:?}")),
        }
    }
}

/// The authoritative turn/status pointer shared by both clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStateRecord {
    /// Current lifecycle phase.
    pub status: GameStatus,
    /// Whether the game has ended in a win or draw.
    #[serde(rename = "isGameOver")]
    pub is_game_over: bool,
    /// The seat expected to move next.
    #[serde(rename = "currentPlayer")]
    pub current_player: Seat,
    /// Result of the game once decided.
    pub winner: Winner,
    /// The completed line when the game was won, otherwise empty.
    pub winning_combo: Vec<Cell>,
    /// Whether seat 1 has been re-claimed for a replay.
    pub player_1_assigned: bool,
    /// Whether seat 2 has been re-claimed for a replay.
    pub player_2_assigned: bool,
    /// Write counter for compare-and-swap puts; bumped by the store on
    /// every accepted write.
    #[serde(default)]
    pub version: u64,
}

impl Default for GameStateRecord {
    fn default() -> Self {
        Self {
            status: GameStatus::CoinFlip,
            is_game_over: false,
            current_player: Seat::One,
            winner: Winner::Undecided,
            winning_combo: Vec::new(),
            player_1_assigned: false,
            player_2_assigned: false,
            version: 0,
        }
    }
}

impl GameStateRecord {
    /// Whether the given seat has been re-claimed for a replay.
    pub fn assigned(&self, seat: Seat) -> bool {
        match seat {
            Seat::One => self.player_1_assigned,
            Seat::Two => self.player_2_assigned,
        }
    }

    /// Marks the given seat as re-claimed for a replay.
    pub fn set_assigned(&mut self, seat: Seat) {
        match seat {
            Seat::One => self.player_1_assigned = true,
            Seat::Two => self.player_2_assigned = true,
        }
    }
}

/// Icon a seat places on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerIcon {
    /// Seat 1's icon.
    O,
    /// Seat 2's icon.
    X,
}

impl std::fmt::Display for PlayerIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlayerIcon::O => write!(f, "O"),
            PlayerIcon::X => write!(f, "X"),
        }
    }
}

/// Per-seat player record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// Whether this seat won the previous game (moves first on replay).
    pub is_previous_winner: bool,
    /// Icon the seat places on the board.
    pub player_icon: PlayerIcon,
    /// Display name.
    pub player_name: String,
    /// Cells this seat has claimed. Membership semantics; disjoint from the
    /// opposing seat's set, combined size never exceeds 16.
    pub player_held_positions: BTreeSet<Cell>,
    /// Whether this seat has acknowledged the game-over result.
    pub ack_win: bool,
}

impl PlayerRecord {
    /// The default record for the given seat.
    pub fn default_for(seat: Seat) -> Self {
        Self {
            is_previous_winner: false,
            player_icon: seat.icon(),
            player_name: seat.to_string(),
            player_held_positions: BTreeSet::new(),
            ack_win: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seat_roundtrip() {
        let json = serde_json::to_string(&Seat::Two).unwrap();
        assert_eq!(json, "2");
        assert_eq!(serde_json::from_str::<Seat>("1").unwrap(), Seat::One);
        assert!(serde_json::from_str::<Seat>("3").is_err());
    }

    #[test]
    fn test_cell_bounds() {
        assert!(Cell::new(15).is_some());
        assert!(Cell::new(16).is_none());
        assert!(serde_json::from_str::<Cell>("16").is_err());
    }

    #[test]
    fn test_winner_wire_strings() {
        assert_eq!(
            serde_json::to_string(&Winner::Seat(Seat::One)).unwrap(),
            "\"Player 1\""
        );
        assert_eq!(serde_json::to_string(&Winner::Undecided).unwrap(), "\"\"");
        assert_eq!(
            serde_json::from_str::<Winner>("\"Draw\"").unwrap(),
            Winner::Draw
        );
    }

    #[test]
    fn test_gamestate_default_shape() {
        let json = serde_json::to_value(GameStateRecord::default()).unwrap();
        assert_eq!(json["status"], "coin_flip");
        assert_eq!(json["isGameOver"], false);
        assert_eq!(json["currentPlayer"], 1);
        assert_eq!(json["winner"], "");
        assert_eq!(json["winning_combo"], serde_json::json!([]));
    }

    #[test]
    fn test_coin_default_shape() {
        let json = serde_json::to_value(CoinRecord::default()).unwrap();
        assert_eq!(json["coin_1"], serde_json::Value::Null);
        assert_eq!(json["coin_2"], serde_json::Value::Null);

        let coin: CoinRecord =
            serde_json::from_str(r#"{"coin_1":"heads","coin_2":null}"#).unwrap();
        assert_eq!(coin.coin_1, Some(CoinFace::Heads));
        assert_eq!(coin.coin_2, None);
    }

    #[test]
    fn test_player_defaults_per_seat() {
        let p1 = PlayerRecord::default_for(Seat::One);
        let p2 = PlayerRecord::default_for(Seat::Two);
        assert_eq!(p1.player_icon, PlayerIcon::O);
        assert_eq!(p2.player_icon, PlayerIcon::X);
        assert_eq!(p1.player_name, "Player 1");
        assert!(p1.player_held_positions.is_empty());
        assert!(!p2.ack_win);
    }
}
