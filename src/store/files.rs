//! File-backed persistence for the shared records.
//!
//! One JSON document per record (`coin.json`, `gamestate.json`,
//! `player_1.json`, `player_2.json`) under a data directory. A single mutex
//! serializes read-modify-write sequences so the game-state version check is
//! atomic with respect to concurrent requests.

use crate::store::records::{CoinRecord, GameStateRecord, PlayerRecord, Seat};
use derive_more::{Display, Error, From};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

/// A failed file-store operation.
#[derive(Debug, Display, Error, From)]
pub enum FileStoreError {
    /// The record file does not exist.
    #[display("record file missing: {_0}")]
    #[from(skip)]
    Missing(#[error(not(source))] String),
    /// A game-state write carried a stale version.
    #[display("game state version mismatch: put {put}, stored {stored}")]
    VersionMismatch {
        /// Version carried by the rejected write.
        put: u64,
        /// Version currently stored.
        stored: u64,
    },
    /// Reading or writing the file failed.
    #[display("record file i/o failed: {_0}")]
    Io(std::io::Error),
    /// The file contents could not be decoded.
    #[display("record file corrupt: {_0}")]
    Decode(serde_json::Error),
}

/// File-backed store for the four shared records.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Opens the store at `dir`, creating the directory and seeding any
    /// missing record files with defaults.
    #[instrument(skip(dir), fields(dir = %dir.as_ref().display()))]
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self, FileStoreError> {
        let store = Self {
            dir: dir.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        };
        tokio::fs::create_dir_all(&store.dir).await?;
        store.seed_defaults().await?;
        info!("file store ready");
        Ok(store)
    }

    /// Writes default records for any file that does not exist yet.
    async fn seed_defaults(&self) -> Result<(), FileStoreError> {
        if !self.path("coin.json").exists() {
            self.write_json("coin.json", &CoinRecord::default()).await?;
        }
        if !self.path("gamestate.json").exists() {
            self.write_json("gamestate.json", &GameStateRecord::default())
                .await?;
        }
        for seat in Seat::both() {
            let name = Self::player_file(seat);
            if !self.path(&name).exists() {
                self.write_json(&name, &PlayerRecord::default_for(seat)).await?;
            }
        }
        Ok(())
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    fn player_file(seat: Seat) -> String {
        format!("player_{}.json", seat.index())
    }

    async fn read_json<T: DeserializeOwned>(&self, name: &str) -> Result<T, FileStoreError> {
        let path = self.path(name);
        let bytes = tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FileStoreError::Missing(name.to_string())
            } else {
                FileStoreError::Io(e)
            }
        })?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn write_json<T: Serialize>(&self, name: &str, record: &T) -> Result<(), FileStoreError> {
        let bytes = serde_json::to_vec(record)?;
        tokio::fs::write(self.path(name), bytes).await?;
        debug!(file = name, "record written");
        Ok(())
    }

    /// Loads the coin record.
    pub async fn load_coin(&self) -> Result<CoinRecord, FileStoreError> {
        self.read_json("coin.json").await
    }

    /// Stores the coin record.
    pub async fn save_coin(&self, coin: &CoinRecord) -> Result<(), FileStoreError> {
        let _guard = self.lock.lock().await;
        self.write_json("coin.json", coin).await
    }

    /// Resets the coin record to defaults.
    pub async fn reset_coin(&self) -> Result<(), FileStoreError> {
        self.save_coin(&CoinRecord::default()).await
    }

    /// Loads the game-state record.
    pub async fn load_game_state(&self) -> Result<GameStateRecord, FileStoreError> {
        self.read_json("gamestate.json").await
    }

    /// Stores the game-state record if its version matches the stored one,
    /// bumping the stored version. Returns the record as written.
    #[instrument(skip(self, state), fields(version = state.version))]
    pub async fn save_game_state(
        &self,
        state: &GameStateRecord,
    ) -> Result<GameStateRecord, FileStoreError> {
        let _guard = self.lock.lock().await;
        let stored: GameStateRecord = self.read_json("gamestate.json").await?;
        if state.version != stored.version {
            debug!(put = state.version, stored = stored.version, "stale game state put");
            return Err(FileStoreError::VersionMismatch {
                put: state.version,
                stored: stored.version,
            });
        }
        let mut accepted = state.clone();
        accepted.version = stored.version + 1;
        self.write_json("gamestate.json", &accepted).await?;
        Ok(accepted)
    }

    /// Resets the game-state record to defaults. The version restarts at 0;
    /// reset is an unconditional overwrite, not a versioned put.
    pub async fn reset_game_state(&self) -> Result<(), FileStoreError> {
        let _guard = self.lock.lock().await;
        self.write_json("gamestate.json", &GameStateRecord::default())
            .await
    }

    /// Loads a player record.
    pub async fn load_player(&self, seat: Seat) -> Result<PlayerRecord, FileStoreError> {
        self.read_json(&Self::player_file(seat)).await
    }

    /// Stores a player record.
    pub async fn save_player(
        &self,
        seat: Seat,
        player: &PlayerRecord,
    ) -> Result<(), FileStoreError> {
        let _guard = self.lock.lock().await;
        self.write_json(&Self::player_file(seat), player).await
    }

    /// Resets both player records to their per-seat defaults.
    pub async fn reset_players(&self) -> Result<(), FileStoreError> {
        let _guard = self.lock.lock().await;
        for seat in Seat::both() {
            self.write_json(&Self::player_file(seat), &PlayerRecord::default_for(seat))
                .await?;
        }
        Ok(())
    }
}
