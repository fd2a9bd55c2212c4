//! Now-playing lookup for radio channels.
//!
//! The search resolver prefers tracks by whatever artist is currently on air.
//! [`NowPlaying`] is the seam; [`SverigesRadio`] reads the public
//! `playlists/rightnow` endpoint of the Sveriges Radio open API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{config::RadioSettings, error::ProxyError};

#[async_trait]
pub trait NowPlaying: Send + Sync {
    /// Artist of the song on air on `channel`, if the channel reports one.
    async fn current_artist(&self, channel: u32) -> Result<Option<String>, ProxyError>;
}

#[derive(Debug, Clone)]
pub struct SverigesRadio {
    http: Client,
    api_url: String,
}

#[derive(Debug, Deserialize)]
struct RightNowResponse {
    playlist: Option<RightNow>,
}

#[derive(Debug, Deserialize)]
struct RightNow {
    song: Option<Song>,
    previoussong: Option<Song>,
}

#[derive(Debug, Deserialize)]
struct Song {
    artist: Option<String>,
}

impl SverigesRadio {
    pub fn new(settings: &RadioSettings, timeout: Duration) -> Result<Self, ProxyError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProxyError::Config(format!("cannot build HTTP client: {}", e)))?;

        Ok(SverigesRadio {
            http,
            api_url: settings.api_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl NowPlaying for SverigesRadio {
    async fn current_artist(&self, channel: u32) -> Result<Option<String>, ProxyError> {
        let url = format!("{}/playlists/rightnow", self.api_url);
        let res = self
            .http
            .get(&url)
            .query(&[("channelid", channel.to_string()), ("format", "json".to_string())])
            .send()
            .await?
            .error_for_status()?;

        let body = res.json::<RightNowResponse>().await?;
        Ok(pick_artist(body))
    }
}

// Between songs the channel only reports the previous one.
fn pick_artist(body: RightNowResponse) -> Option<String> {
    let playlist = body.playlist?;
    [playlist.song, playlist.previoussong]
        .into_iter()
        .flatten()
        .filter_map(|s| s.artist)
        .find(|a| !a.trim().is_empty())
}
