mod common;

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Form, Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::{Value, json};
use spotproxy::{
    error::ProxyError,
    spotify::{SearchType, SpotifyClient, TokenSource},
};

use common::{settings, spawn_mock, token};

#[derive(Clone, Default)]
struct Hits {
    me: Arc<AtomicUsize>,
    playlists: Arc<AtomicUsize>,
    search: Arc<AtomicUsize>,
}

async fn token_endpoint(Form(form): Form<HashMap<String, String>>) -> impl IntoResponse {
    match form.get("grant_type").map(String::as_str) {
        Some("refresh_token") if form.get("refresh_token").map(String::as_str) == Some("r1") => {
            Json(json!({
                "access_token": "fresh",
                "token_type": "Bearer",
                "expires_in": 3600,
                "scope": "user-read-private"
            }))
            .into_response()
        }
        Some("authorization_code") if form.get("code_verifier").is_some() => Json(json!({
            "access_token": "a1",
            "token_type": "Bearer",
            "refresh_token": "r1",
            "expires_in": 3600,
            "scope": "user-read-private"
        }))
        .into_response(),
        _ => (StatusCode::BAD_REQUEST, Json(json!({"error": "invalid_grant"}))).into_response(),
    }
}

async fn me(State(hits): State<Hits>) -> impl IntoResponse {
    hits.me.fetch_add(1, Ordering::SeqCst);
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

async fn playlists(
    State(hits): State<Hits>,
    Query(q): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    if hits.playlists.fetch_add(1, Ordering::SeqCst) == 0 {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    assert_eq!(q.get("limit").map(String::as_str), Some("2"));
    Json(json!({
        "items": [
            {"id": "p1", "name": "Morning"},
            null,
            {"id": "p2", "name": "Evening"}
        ]
    }))
    .into_response()
}

async fn search(
    State(hits): State<Hits>,
    headers: HeaderMap,
    Query(q): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    hits.search.fetch_add(1, Ordering::SeqCst);
    if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some("Bearer a1") {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let body: Value = match q.get("type").map(String::as_str) {
        Some("track") => json!({
            "tracks": {"items": [{
                "name": "Halo",
                "uri": "spotify:track:1",
                "external_urls": {"spotify": "http://x/1"},
                "artists": [{"id": "bey", "name": "Beyoncé", "uri": "spotify:artist:bey"}]
            }]}
        }),
        Some("album") => json!({
            "albums": {"items": [{
                "name": "Lemonade",
                "uri": "spotify:album:1",
                "artists": [{"id": "bey", "name": "Beyoncé", "uri": "spotify:artist:bey"}]
            }]}
        }),
        _ => return StatusCode::BAD_REQUEST.into_response(),
    };
    assert_eq!(q.get("q").map(String::as_str), Some("love songs"));
    Json(body).into_response()
}

async fn client() -> (SpotifyClient, Hits) {
    let hits = Hits::default();
    let router = Router::new()
        .route("/api/token", post(token_endpoint))
        .route("/v1/me", get(me))
        .route("/v1/me/playlists", get(playlists))
        .route("/v1/search", get(search))
        .with_state(hits.clone());
    let base = spawn_mock(router).await;

    let client = SpotifyClient::new(settings(&base).spotify, Duration::from_secs(2)).unwrap();
    (client, hits)
}

#[tokio::test]
async fn test_authorization_request_carries_pkce() {
    let (client, _) = client().await;
    let request = client.authorization_request().unwrap();

    assert!(request.url.contains("/authorize?"));
    assert!(request.url.contains("client_id=client-id"));
    assert!(request.url.contains("code_challenge_method=S256"));
    assert!(request.url.contains(&format!(
        "code_challenge={}",
        spotproxy::utils::generate_code_challenge(&request.code_verifier)
    )));
    assert!(request.url.contains(&format!("state={}", request.state)));
}

#[tokio::test]
async fn test_exchange_code() {
    let (client, _) = client().await;
    let token = client.exchange_code("code", "verifier").await.unwrap();
    assert_eq!(token.access_token, "a1");
    assert_eq!(token.refresh_token, "r1");
    assert_eq!(token.authorization(), "Bearer a1");
    assert!(token.expires_at > chrono::Utc::now());
}

#[tokio::test]
async fn test_refresh_keeps_refresh_token_when_not_rotated() {
    let (client, _) = client().await;
    let token = client.refresh("r1").await.unwrap();
    assert_eq!(token.access_token, "fresh");
    assert_eq!(token.refresh_token, "r1");

    assert!(matches!(
        client.refresh("revoked").await,
        Err(ProxyError::UpstreamError(_))
    ));
}

#[tokio::test]
async fn test_search_sends_query_and_authorization() {
    let (client, hits) = client().await;

    let tracks = client
        .search_items(&token("a1", "r1"), "love songs", SearchType::Track)
        .await
        .unwrap();
    let items = tracks.tracks.unwrap().items;
    assert_eq!(items[0].name, "Halo");
    assert_eq!(items[0].artists[0].name, "Beyoncé");

    let albums = client
        .search_items(&token("a1", "r1"), "love songs", SearchType::Album)
        .await
        .unwrap();
    assert!(albums.tracks.is_none());
    assert_eq!(albums.albums.unwrap().items[0].name, "Lemonade");
    assert_eq!(hits.search.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let (client, hits) = client().await;
    let res = client
        .search_items(&token("wrong", "r1"), "love songs", SearchType::Track)
        .await;

    assert!(matches!(res, Err(ProxyError::UpstreamError(_))));
    assert_eq!(hits.search.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_transient_failure_is_retried_once() {
    let (client, hits) = client().await;
    let playlists = client.get_playlists(&token("a1", "r1"), 2).await.unwrap();

    assert_eq!(hits.playlists.load(Ordering::SeqCst), 2);
    let ids: Vec<_> = playlists
        .playlists
        .iter()
        .map(|p| p.playlist_id.as_str())
        .collect();
    assert_eq!(ids, ["p1", "p2"]);
}

#[tokio::test]
async fn test_persistent_failure_gives_up_after_one_retry() {
    let (client, hits) = client().await;
    let res = client.get_profile(&token("a1", "r1")).await;

    assert!(matches!(res, Err(ProxyError::UpstreamError(_))));
    assert_eq!(hits.me.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_playlist_limit_checked_before_request() {
    let (client, hits) = client().await;
    assert!(matches!(
        client.get_playlists(&token("a1", "r1"), 51).await,
        Err(ProxyError::InvalidParameter(_))
    ));
    assert_eq!(hits.playlists.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_timeout_is_reported_as_upstream_error() {
    let router = Router::new().route(
        "/v1/me",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "late"
        }),
    );
    let base = spawn_mock(router).await;
    let client = SpotifyClient::new(settings(&base).spotify, Duration::from_millis(200)).unwrap();

    assert!(matches!(
        client.get_profile(&token("a1", "r1")).await,
        Err(ProxyError::UpstreamError(_))
    ));
}
