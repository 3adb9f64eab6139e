//! HTTP implementation of the shared store client.

use super::{SharedStore, StoreError};
use crate::store::records::{CoinRecord, GameStateRecord, PlayerRecord, Seat};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

/// Typed reqwest client for the four store resources.
#[derive(Debug, Clone)]
pub struct HttpStore {
    base_url: String,
    client: reqwest::Client,
}

impl HttpStore {
    /// Creates a client for the store at `base_url` (e.g. `http://127.0.0.1:3000`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_record<T: DeserializeOwned>(&self, path: &str) -> Result<T, StoreError> {
        let response = self.client.get(self.url(path)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(path.to_string()));
        }
        let response = Self::check_status(response, path).await?;
        Ok(response.json().await?)
    }

    async fn put_record<T: Serialize + Sync>(&self, path: &str, record: &T) -> Result<(), StoreError> {
        let response = self.client.put(self.url(path)).json(record).send().await?;
        if response.status() == StatusCode::CONFLICT {
            return Err(StoreError::Conflict);
        }
        Self::check_status(response, path).await?;
        Ok(())
    }

    async fn post_reset(&self, path: &str) -> Result<(), StoreError> {
        let response = self.client.post(self.url(path)).send().await?;
        Self::check_status(response, path).await?;
        Ok(())
    }

    async fn check_status(
        response: reqwest::Response,
        path: &str,
    ) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            debug!(path, %status, "store request ok");
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Rejected(format!("{path}: {status} {body}")))
    }
}

#[async_trait]
impl SharedStore for HttpStore {
    #[instrument(skip(self))]
    async fn get_coin(&self) -> Result<CoinRecord, StoreError> {
        self.get_record("/coin").await
    }

    #[instrument(skip(self, coin))]
    async fn put_coin(&self, coin: &CoinRecord) -> Result<(), StoreError> {
        self.put_record("/coin", coin).await
    }

    #[instrument(skip(self))]
    async fn reset_coin(&self) -> Result<(), StoreError> {
        self.post_reset("/coin/reset").await
    }

    #[instrument(skip(self))]
    async fn get_game_state(&self) -> Result<GameStateRecord, StoreError> {
        self.get_record("/gamestate").await
    }

    #[instrument(skip(self, state), fields(version = state.version))]
    async fn put_game_state(&self, state: &GameStateRecord) -> Result<(), StoreError> {
        self.put_record("/gamestate", state).await
    }

    #[instrument(skip(self))]
    async fn reset_game_state(&self) -> Result<(), StoreError> {
        self.post_reset("/gamestate/reset").await
    }

    #[instrument(skip(self))]
    async fn get_player(&self, seat: Seat) -> Result<PlayerRecord, StoreError> {
        self.get_record(&format!("/player/{}", seat.index())).await
    }

    #[instrument(skip(self, player))]
    async fn put_player(&self, seat: Seat, player: &PlayerRecord) -> Result<(), StoreError> {
        self.put_record(&format!("/player/{}", seat.index()), player)
            .await
    }

    #[instrument(skip(self))]
    async fn reset_players(&self) -> Result<(), StoreError> {
        self.post_reset("/player/reset").await
    }
}
