#![allow(dead_code)]

use std::time::Duration;

use axum::Router;
use chrono::Utc;
use spotproxy::{
    config::{RadioSettings, Settings, SpotifySettings},
    types::{ArtistRef, ExternalUrls, Token, TrackItem},
};

pub fn token(access: &str, refresh: &str) -> Token {
    Token {
        access_token: access.to_string(),
        token_type: "Bearer".to_string(),
        refresh_token: refresh.to_string(),
        scope: "user-read-private".to_string(),
        expires_at: Utc::now() + chrono::Duration::hours(1),
    }
}

pub fn artist(name: &str, id: &str) -> ArtistRef {
    ArtistRef {
        id: Some(id.to_string()),
        name: name.to_string(),
        uri: format!("spotify:artist:{}", id),
    }
}

pub fn track(name: &str, n: u32, artists: Vec<ArtistRef>) -> TrackItem {
    TrackItem {
        name: name.to_string(),
        uri: format!("spotify:track:{}", n),
        external_urls: ExternalUrls {
            spotify: Some(format!("http://x/{}", n)),
        },
        artists,
    }
}

/// Settings pointing every Spotify endpoint at `base`.
pub fn settings(base: &str) -> Settings {
    Settings {
        server_addr: "127.0.0.1:0".to_string(),
        spotify: SpotifySettings {
            client_id: "client-id".to_string(),
            redirect_uri: "http://127.0.0.1:4567/api/v1/spotify/login".to_string(),
            scope: "user-read-private".to_string(),
            auth_url: format!("{}/authorize", base),
            token_url: format!("{}/api/token", base),
            api_url: format!("{}/v1", base),
            open_url: "https://open.spotify.com".to_string(),
        },
        radio: RadioSettings {
            api_url: format!("{}/sr", base),
            default_channel: 132,
        },
        refresh_interval: Duration::from_secs(1800),
        http_timeout: Duration::from_secs(2),
    }
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_mock(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}
