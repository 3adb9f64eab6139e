//! Client-side access to the shared state store.
//!
//! The lifecycle controller is written against the [`SharedStore`] trait so
//! tests can swap the HTTP implementation for an in-memory one. Every
//! operation is whole-record get/put; attribute-level updates are the
//! read-modify-write helpers layered on top.

mod http;

pub use http::HttpStore;

use crate::store::records::{CoinRecord, GameStateRecord, PlayerRecord, Seat};
use async_trait::async_trait;
use derive_more::{Display, Error, From};
use tracing::{debug, warn};

/// Bound on compare-and-swap retries inside one read-modify-write call.
/// Failed store operations are otherwise never retried automatically; the
/// next poll tick re-attempts read-based progress.
const MAX_CAS_ATTEMPTS: u32 = 4;

/// A failed store operation. Callers must not mutate dependent local state
/// until the operation has succeeded.
#[derive(Debug, Display, Error, From)]
pub enum StoreError {
    /// The requested record does not exist on the store.
    #[display("record not found: {_0}")]
    #[from(skip)]
    NotFound(#[error(not(source))] String),
    /// A game-state write lost a compare-and-swap race.
    #[display("game state was modified concurrently")]
    Conflict,
    /// The store rejected the request.
    #[display("store rejected request: {_0}")]
    #[from(skip)]
    Rejected(#[error(not(source))] String),
    /// The transport failed.
    #[display("store request failed: {_0}")]
    Http(reqwest::Error),
    /// A record could not be encoded or decoded.
    #[display("could not decode record: {_0}")]
    Decode(serde_json::Error),
}

/// Whole-record operations on the shared state store.
///
/// No transactional guarantees: each call is an independent round trip, and
/// two clients may interleave freely between calls. Game-state puts carry
/// the version read from the store and fail with [`StoreError::Conflict`]
/// when stale.
#[async_trait]
pub trait SharedStore: Send + Sync {
    /// Fetches the coin record.
    async fn get_coin(&self) -> Result<CoinRecord, StoreError>;

    /// Replaces the coin record.
    async fn put_coin(&self, coin: &CoinRecord) -> Result<(), StoreError>;

    /// Resets the coin record to its defaults (both slots unset).
    async fn reset_coin(&self) -> Result<(), StoreError>;

    /// Fetches the game-state record.
    async fn get_game_state(&self) -> Result<GameStateRecord, StoreError>;

    /// Replaces the game-state record. The record's `version` must match the
    /// stored one or the put fails with [`StoreError::Conflict`].
    async fn put_game_state(&self, state: &GameStateRecord) -> Result<(), StoreError>;

    /// Resets the game-state record to its defaults.
    async fn reset_game_state(&self) -> Result<(), StoreError>;

    /// Fetches the player record for a seat.
    async fn get_player(&self, seat: Seat) -> Result<PlayerRecord, StoreError>;

    /// Replaces the player record for a seat.
    async fn put_player(&self, seat: Seat, player: &PlayerRecord) -> Result<(), StoreError>;

    /// Resets both player records to their defaults.
    async fn reset_players(&self) -> Result<(), StoreError>;

    /// Optimistic attribute update on the game state: fetch, apply, put.
    ///
    /// Retries a bounded number of times when the versioned put loses a race
    /// with the other client, re-reading before each attempt. Returns the
    /// record as written.
    async fn update_game_state<F>(&self, mut apply: F) -> Result<GameStateRecord, StoreError>
    where
        F: FnMut(&mut GameStateRecord) + Send,
    {
        for attempt in 1..=MAX_CAS_ATTEMPTS {
            let mut state = self.get_game_state().await?;
            apply(&mut state);
            match self.put_game_state(&state).await {
                Ok(()) => return Ok(state),
                Err(StoreError::Conflict) => {
                    debug!(attempt, "game state put lost a version race, re-reading");
                }
                Err(e) => return Err(e),
            }
        }
        warn!(
            attempts = MAX_CAS_ATTEMPTS,
            "game state update kept losing version races"
        );
        Err(StoreError::Conflict)
    }

    /// Read-modify-write on a player record. Safe without versioning because
    /// each seat only ever writes its own record.
    async fn update_player<F>(&self, seat: Seat, apply: F) -> Result<PlayerRecord, StoreError>
    where
        F: FnOnce(&mut PlayerRecord) + Send,
    {
        let mut player = self.get_player(seat).await?;
        apply(&mut player);
        self.put_player(seat, &player).await?;
        Ok(player)
    }

    /// Rewrites all four records to their defaults.
    async fn reset_all(&self) -> Result<(), StoreError> {
        self.reset_players().await?;
        self.reset_game_state().await?;
        self.reset_coin().await?;
        Ok(())
    }
}
