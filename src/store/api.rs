//! HTTP surface of the shared state store.
//!
//! Four REST-like resources over the file store: `/coin`, `/gamestate`,
//! `/player/{seat}`, each with whole-record GET/PUT and a reset POST. All
//! operations are independent round trips; the only coordination primitive
//! is the versioned game-state put.

use crate::store::files::{FileStore, FileStoreError};
use crate::store::records::{CoinRecord, GameStateRecord, PlayerRecord, Seat};
use axum::Router;
use axum::extract::{Path as UrlPath, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Error response for a store request.
#[derive(Debug)]
enum ApiError {
    Store(FileStoreError),
    UnknownSeat(u8),
}

impl From<FileStoreError> for ApiError {
    fn from(e: FileStoreError) -> Self {
        ApiError::Store(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Store(FileStoreError::Missing(name)) => {
                (StatusCode::NOT_FOUND, format!("record not found: {name}"))
            }
            ApiError::Store(e @ FileStoreError::VersionMismatch { .. }) => {
                (StatusCode::CONFLICT, e.to_string())
            }
            ApiError::Store(e) => {
                warn!(error = %e, "store request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            ApiError::UnknownSeat(seat) => {
                (StatusCode::NOT_FOUND, format!("no such player: {seat}"))
            }
        };
        (status, body).into_response()
    }
}

fn parse_seat(raw: u8) -> Result<Seat, ApiError> {
    Seat::try_from(raw).map_err(|_| ApiError::UnknownSeat(raw))
}

async fn get_coin(State(store): State<Arc<FileStore>>) -> Result<Json<CoinRecord>, ApiError> {
    Ok(Json(store.load_coin().await?))
}

async fn put_coin(
    State(store): State<Arc<FileStore>>,
    Json(coin): Json<CoinRecord>,
) -> Result<StatusCode, ApiError> {
    store.save_coin(&coin).await?;
    Ok(StatusCode::OK)
}

async fn reset_coin(State(store): State<Arc<FileStore>>) -> Result<StatusCode, ApiError> {
    store.reset_coin().await?;
    Ok(StatusCode::OK)
}

async fn get_game_state(
    State(store): State<Arc<FileStore>>,
) -> Result<Json<GameStateRecord>, ApiError> {
    Ok(Json(store.load_game_state().await?))
}

async fn put_game_state(
    State(store): State<Arc<FileStore>>,
    Json(state): Json<GameStateRecord>,
) -> Result<Json<GameStateRecord>, ApiError> {
    let accepted = store.save_game_state(&state).await?;
    Ok(Json(accepted))
}

async fn reset_game_state(State(store): State<Arc<FileStore>>) -> Result<StatusCode, ApiError> {
    store.reset_game_state().await?;
    Ok(StatusCode::OK)
}

async fn get_player(
    State(store): State<Arc<FileStore>>,
    UrlPath(seat): UrlPath<u8>,
) -> Result<Json<PlayerRecord>, ApiError> {
    let seat = parse_seat(seat)?;
    Ok(Json(store.load_player(seat).await?))
}

async fn put_player(
    State(store): State<Arc<FileStore>>,
    UrlPath(seat): UrlPath<u8>,
    Json(player): Json<PlayerRecord>,
) -> Result<StatusCode, ApiError> {
    let seat = parse_seat(seat)?;
    store.save_player(seat, &player).await?;
    Ok(StatusCode::OK)
}

async fn reset_players(State(store): State<Arc<FileStore>>) -> Result<StatusCode, ApiError> {
    store.reset_players().await?;
    Ok(StatusCode::OK)
}

/// Builds the store router over an opened file store.
pub fn router(store: Arc<FileStore>) -> Router {
    Router::new()
        .route("/coin", get(get_coin).put(put_coin))
        .route("/coin/reset", post(reset_coin))
        .route("/gamestate", get(get_game_state).put(put_game_state))
        .route("/gamestate/reset", post(reset_game_state))
        .route("/player/reset", post(reset_players))
        .route("/player/{seat}", get(get_player).put(put_player))
        .with_state(store)
}

/// Runs the state store server until the process is stopped.
#[instrument(skip(data_dir), fields(data_dir = %data_dir.as_ref().display()))]
pub async fn serve(host: &str, port: u16, data_dir: impl AsRef<Path>) -> anyhow::Result<()> {
    let store = Arc::new(FileStore::open(data_dir).await?);
    let app = router(store);

    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    info!(host, port, "state store listening");
    axum::serve(listener, app).await?;
    Ok(())
}
