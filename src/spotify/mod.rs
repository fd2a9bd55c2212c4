//! # Spotify Integration Module
//!
//! This module is the outbound side of the proxy: every call to Spotify's
//! accounts service and Web API goes through [`SpotifyClient`].
//!
//! ## Architecture
//!
//! ```text
//! Route Layer (api)
//!          ↓
//! Session Store / Token Refresher / Search Resolver (management)
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (authorize URL, PKCE code exchange, refresh)
//!     ├── Profile        (GET /me)
//!     ├── Playlists      (GET /me/playlists)
//!     └── Search         (GET /search)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## Network Resilience
//!
//! The underlying `reqwest::Client` is built with a bounded timeout. Idempotent
//! calls (profile, playlists, search, token refresh) are retried once after a
//! short backoff when they time out, fail to connect, or come back with a 5xx
//! or 429 status. A `Retry-After` header longer than
//! [`MAX_RETRY_AFTER_SECS`] is not waited for; the error is surfaced instead.
//! The authorization code exchange is never retried since a code can only be
//! redeemed once.
//!
//! ## Seams
//!
//! The management layer does not depend on `SpotifyClient` directly but on
//! the [`TokenSource`] and [`SearchApi`] traits, so tests substitute fakes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tokio::time::sleep;

use crate::{
    config::SpotifySettings,
    error::ProxyError,
    types::{SearchResponse, Token},
};

pub mod auth;
pub mod playlist;
pub mod profile;
pub mod search;

pub use search::SearchType;

/// Delay before the single retry of an idempotent call.
pub const RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// Longest `Retry-After` the client is willing to sleep through.
pub const MAX_RETRY_AFTER_SECS: u64 = 5;

/// Exchanges a refresh token for a new [`Token`].
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn refresh(&self, refresh_token: &str) -> Result<Token, ProxyError>;
}

/// Runs a search against the Web API on behalf of a token holder.
#[async_trait]
pub trait SearchApi: Send + Sync {
    async fn search(
        &self,
        token: &Token,
        query: &str,
        kind: SearchType,
    ) -> Result<SearchResponse, ProxyError>;
}

#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    settings: SpotifySettings,
}

impl SpotifyClient {
    /// Creates a client whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::Config`] if the TLS backend cannot be
    /// initialised.
    pub fn new(settings: SpotifySettings, timeout: Duration) -> Result<Self, ProxyError> {
        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| ProxyError::Config(format!("cannot build HTTP client: {}", e)))?;

        Ok(SpotifyClient { http, settings })
    }

    pub fn settings(&self) -> &SpotifySettings {
        &self.settings
    }

    fn api(&self, path: &str) -> String {
        format!(
            "{base}{path}",
            base = self.settings.api_url.trim_end_matches('/'),
            path = path
        )
    }

    /// Sends the request built by `build`, retrying once on transient failure.
    ///
    /// Only use this for idempotent calls; `build` is invoked once per attempt.
    async fn send_idempotent<F>(&self, what: &str, build: F) -> Result<Response, ProxyError>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            let last_attempt = attempt > 1;

            let delay = match build(&self.http).send().await {
                Ok(resp) if resp.status().is_success() => return Ok(resp),
                Ok(resp) => {
                    let status = resp.status();
                    let transient =
                        status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS;
                    if !transient || last_attempt {
                        return Err(status_error(what, resp).await);
                    }

                    match retry_after(&resp) {
                        Some(secs) if secs > MAX_RETRY_AFTER_SECS => {
                            tracing::warn!(
                                retry_after = secs,
                                "Spotify asked for an abnormally long back-off"
                            );
                            return Err(status_error(what, resp).await);
                        }
                        Some(secs) => Duration::from_secs(secs).max(RETRY_BACKOFF),
                        None => RETRY_BACKOFF,
                    }
                }
                Err(err) => {
                    let transient = err.is_timeout() || err.is_connect() || err.is_request();
                    if !transient || last_attempt {
                        return Err(err.into());
                    }
                    RETRY_BACKOFF
                }
            };

            tracing::debug!(
                request = what,
                attempt,
                delay_ms = delay.as_millis() as u64,
                "Retrying Spotify request"
            );
            sleep(delay).await;
        }
    }
}

fn retry_after(resp: &Response) -> Option<u64> {
    resp.headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}

async fn status_error(what: &str, resp: Response) -> ProxyError {
    let status = resp.status();
    let body = resp.text().await.unwrap_or_default();
    ProxyError::UpstreamError(format!("{} returned {}: {}", what, status, body.trim()))
}

#[async_trait]
impl TokenSource for SpotifyClient {
    async fn refresh(&self, refresh_token: &str) -> Result<Token, ProxyError> {
        self.refresh_token(refresh_token).await
    }
}

#[async_trait]
impl SearchApi for SpotifyClient {
    async fn search(
        &self,
        token: &Token,
        query: &str,
        kind: SearchType,
    ) -> Result<SearchResponse, ProxyError> {
        self.search_items(token, query, kind).await
    }
}
