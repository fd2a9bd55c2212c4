//! Configuration management for the Spotify proxy.
//!
//! This module handles loading configuration values from environment
//! variables and `.env` files and collects them into a [`Settings`] value
//! that is handed to the server at startup.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use std::{env, path::PathBuf, time::Duration};

use crate::{error::ProxyError, management::DEFAULT_REFRESH_INTERVAL};

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:4567";
pub const DEFAULT_SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_SPOTIFY_OPEN_URL: &str = "https://open.spotify.com";
pub const DEFAULT_SPOTIFY_SCOPE: &str =
    "user-read-private user-read-email playlist-read-private playlist-read-collaborative";
pub const DEFAULT_SR_API_URL: &str = "https://api.sr.se/api/v2";
pub const DEFAULT_SR_CHANNEL: u32 = 132;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Loads the `.env` file from the local data directory.
///
/// A missing file is not an error: every value can also come from the
/// process environment.
pub async fn load_env() -> Result<(), String> {
    let path = env_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    match dotenv::from_path(&path) {
        Ok(()) => Ok(()),
        Err(dotenv::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No .env file, using process environment");
            Ok(())
        }
        Err(e) => Err(e.to_string()),
    }
}

fn env_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotproxy/.env");
    path
}

/// Spotify accounts service and Web API endpoints plus client credentials.
#[derive(Debug, Clone)]
pub struct SpotifySettings {
    pub client_id: String,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub open_url: String,
}

#[derive(Debug, Clone)]
pub struct RadioSettings {
    pub api_url: String,
    pub default_channel: u32,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub server_addr: String,
    pub spotify: SpotifySettings,
    pub radio: RadioSettings,
    pub refresh_interval: Duration,
    pub http_timeout: Duration,
}

impl Settings {
    /// Collects settings from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::Config`] when a required variable is missing or
    /// a numeric variable cannot be parsed.
    pub fn from_env() -> Result<Self, ProxyError> {
        Ok(Settings {
            server_addr: optional("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            spotify: SpotifySettings {
                client_id: required("SPOTIFY_API_AUTH_CLIENT_ID")?,
                redirect_uri: required("SPOTIFY_API_REDIRECT_URI")?,
                scope: optional("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SPOTIFY_SCOPE),
                auth_url: optional("SPOTIFY_API_AUTH_URL", DEFAULT_SPOTIFY_AUTH_URL),
                token_url: optional("SPOTIFY_API_TOKEN_URL", DEFAULT_SPOTIFY_TOKEN_URL),
                api_url: optional("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL),
                open_url: optional("SPOTIFY_OPEN_URL", DEFAULT_SPOTIFY_OPEN_URL),
            },
            radio: RadioSettings {
                api_url: optional("SR_API_URL", DEFAULT_SR_API_URL),
                default_channel: numeric("SR_DEFAULT_CHANNEL", DEFAULT_SR_CHANNEL)?,
            },
            refresh_interval: Duration::from_secs(numeric(
                "SPOTPROXY_REFRESH_INTERVAL_SECS",
                DEFAULT_REFRESH_INTERVAL.as_secs(),
            )?),
            http_timeout: Duration::from_secs(numeric(
                "SPOTPROXY_HTTP_TIMEOUT_SECS",
                DEFAULT_HTTP_TIMEOUT_SECS,
            )?),
        })
    }
}

fn required(key: &str) -> Result<String, ProxyError> {
    env::var(key).map_err(|_| ProxyError::Config(format!("{} must be set", key)))
}

fn optional(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn numeric<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ProxyError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ProxyError::Config(format!("{} must be a number, got '{}'", key, raw))),
        Err(_) => Ok(default),
    }
}
