//! The shared state store: record types, file persistence, and HTTP surface.

pub mod api;
pub mod files;
pub mod records;

pub use api::{router, serve};
pub use files::{FileStore, FileStoreError};
pub use records::{
    Cell, CoinFace, CoinRecord, CoinSlot, GameStateRecord, GameStatus, PlayerIcon, PlayerRecord,
    Seat, Winner,
};
