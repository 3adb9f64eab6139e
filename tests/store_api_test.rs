//! Tests for the file-backed store and its HTTP surface.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use quadtac::store::api;
use quadtac::store::files::{FileStore, FileStoreError};
use quadtac::store::records::{
    CoinFace, CoinRecord, GameStateRecord, GameStatus, PlayerRecord, Seat,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

async fn open_store(dir: &TempDir) -> FileStore {
    FileStore::open(dir.path()).await.expect("open store")
}

async fn test_router(dir: &TempDir) -> Router {
    api::router(Arc::new(open_store(dir).await))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn put_json<T: serde::Serialize>(uri: &str, record: &T) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(record).expect("encode")))
        .expect("request")
}

async fn read_json<T: DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("decode")
}

#[tokio::test]
async fn test_open_seeds_default_records() {
    let dir = TempDir::new().expect("temp dir");
    let store = open_store(&dir).await;

    assert_eq!(store.load_coin().await.expect("coin"), CoinRecord::default());
    assert_eq!(
        store.load_game_state().await.expect("state"),
        GameStateRecord::default()
    );
    for seat in Seat::both() {
        assert_eq!(
            store.load_player(seat).await.expect("player"),
            PlayerRecord::default_for(seat)
        );
    }
}

#[tokio::test]
async fn test_open_preserves_existing_records() {
    let dir = TempDir::new().expect("temp dir");
    {
        let store = open_store(&dir).await;
        let coin = CoinRecord {
            coin_1: Some(CoinFace::Tails),
            coin_2: None,
        };
        store.save_coin(&coin).await.expect("save coin");
    }

    // Reopening the same directory must not clobber the stored flip.
    let store = open_store(&dir).await;
    let coin = store.load_coin().await.expect("coin");
    assert_eq!(coin.coin_1, Some(CoinFace::Tails));
}

#[tokio::test]
async fn test_versioned_save_bumps_and_rejects_stale() {
    let dir = TempDir::new().expect("temp dir");
    let store = open_store(&dir).await;

    let mut state = store.load_game_state().await.expect("state");
    state.status = GameStatus::Ready;
    let accepted = store.save_game_state(&state).await.expect("save");
    assert_eq!(accepted.version, 1);

    // The same record again now carries a stale version.
    let err = store.save_game_state(&state).await.expect_err("stale save");
    assert!(matches!(
        err,
        FileStoreError::VersionMismatch { put: 0, stored: 1 }
    ));

    // The stored record is the accepted write, untouched by the stale one.
    let stored = store.load_game_state().await.expect("state");
    assert_eq!(stored, accepted);
}

#[tokio::test]
async fn test_reset_game_state_restarts_version() {
    let dir = TempDir::new().expect("temp dir");
    let store = open_store(&dir).await;

    let mut state = store.load_game_state().await.expect("state");
    state.status = GameStatus::Playing;
    store.save_game_state(&state).await.expect("save");

    store.reset_game_state().await.expect("reset");
    let stored = store.load_game_state().await.expect("state");
    assert_eq!(stored, GameStateRecord::default());
    assert_eq!(stored.version, 0);
}

#[tokio::test]
async fn test_get_coin_round_trip() {
    let dir = TempDir::new().expect("temp dir");
    let app = test_router(&dir).await;

    let response = app
        .clone()
        .oneshot(get("/coin"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let coin: CoinRecord = read_json(response).await;
    assert_eq!(coin, CoinRecord::default());

    let flipped = CoinRecord {
        coin_1: Some(CoinFace::Heads),
        coin_2: None,
    };
    let response = app
        .clone()
        .oneshot(put_json("/coin", &flipped))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/coin")).await.expect("response");
    let coin: CoinRecord = read_json(response).await;
    assert_eq!(coin, flipped);
}

#[tokio::test]
async fn test_stale_game_state_put_returns_conflict() {
    let dir = TempDir::new().expect("temp dir");
    let app = test_router(&dir).await;

    let response = app
        .clone()
        .oneshot(get("/gamestate"))
        .await
        .expect("response");
    let mut state: GameStateRecord = read_json(response).await;
    state.status = GameStatus::Ready;

    let response = app
        .clone()
        .oneshot(put_json("/gamestate", &state))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let accepted: GameStateRecord = read_json(response).await;
    assert_eq!(accepted.version, state.version + 1);

    // Replaying the original write must lose the version race.
    let response = app
        .clone()
        .oneshot(put_json("/gamestate", &state))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // And the stored record still reflects the accepted write.
    let response = app.oneshot(get("/gamestate")).await.expect("response");
    let stored: GameStateRecord = read_json(response).await;
    assert_eq!(stored, accepted);
}

#[tokio::test]
async fn test_player_routes_round_trip() {
    let dir = TempDir::new().expect("temp dir");
    let app = test_router(&dir).await;

    let response = app
        .clone()
        .oneshot(get("/player/2"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let mut player: PlayerRecord = read_json(response).await;
    assert_eq!(player, PlayerRecord::default_for(Seat::Two));

    player.player_name = "Bo".to_string();
    player.ack_win = true;
    let response = app
        .clone()
        .oneshot(put_json("/player/2", &player))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/player/2")).await.expect("response");
    let stored: PlayerRecord = read_json(response).await;
    assert_eq!(stored, player);
}

#[tokio::test]
async fn test_unknown_seat_is_not_found() {
    let dir = TempDir::new().expect("temp dir");
    let app = test_router(&dir).await;

    let response = app.oneshot(get("/player/3")).await.expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_resets_restore_defaults() {
    let dir = TempDir::new().expect("temp dir");
    let app = test_router(&dir).await;

    let coin = CoinRecord {
        coin_1: Some(CoinFace::Heads),
        coin_2: Some(CoinFace::Tails),
    };
    app.clone()
        .oneshot(put_json("/coin", &coin))
        .await
        .expect("response");

    let mut player = PlayerRecord::default_for(Seat::One);
    player.is_previous_winner = true;
    app.clone()
        .oneshot(put_json("/player/1", &player))
        .await
        .expect("response");

    for uri in ["/coin/reset", "/gamestate/reset", "/player/reset"] {
        let response = app.clone().oneshot(post(uri)).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.clone().oneshot(get("/coin")).await.expect("response");
    let coin: CoinRecord = read_json(response).await;
    assert_eq!(coin, CoinRecord::default());

    let response = app.oneshot(get("/player/1")).await.expect("response");
    let player: PlayerRecord = read_json(response).await;
    assert_eq!(player, PlayerRecord::default_for(Seat::One));
}
