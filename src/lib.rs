//! Quadtac - two-player networked 4x4 tic-tac-toe.
//!
//! A minimal HTTP server persists four JSON records (two players, one coin,
//! one game state) to disk, and two terminal clients poll those records on a
//! fixed interval to coordinate turn order, board state, and win/draw
//! detection. The store is the only channel between the clients; the coin
//! flip decides who takes seat 1.
//!
//! # Architecture
//!
//! - **Store**: axum HTTP server over a file-backed record store
//! - **Client**: typed reqwest access to the four store resources
//! - **Game**: seat assignment, move validation, outcome detection, and the
//!   per-client lifecycle controller
//! - **Tui**: ratatui rendering surface driving the controller
//!
//! # Example
//!
//! ```no_run
//! use quadtac::client::HttpStore;
//! use quadtac::game::GameClient;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let store = HttpStore::new("http://127.0.0.1:3000");
//! let mut client = GameClient::new(store).with_player_name("Cory");
//!
//! client.flip().await?;
//! let view = client.tick().await?;
//! println!("{}", view.message);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod client;
pub mod config;
pub mod game;
pub mod store;
pub mod tui;

pub use client::{HttpStore, SharedStore, StoreError};
pub use config::{ClientConfig, ConfigError};
pub use game::{
    ClientView, ControlLabel, FlipResolution, GameClient, MoveError, MoveOutcome, WINNING_LINES,
};
pub use store::{
    Cell, CoinFace, CoinRecord, CoinSlot, FileStore, GameStateRecord, GameStatus, PlayerIcon,
    PlayerRecord, Seat, Winner,
};
