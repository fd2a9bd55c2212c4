use reqwest::header::AUTHORIZATION;

use crate::{
    error::ProxyError,
    types::{GetUserPlaylistsResponse, Playlists, Token},
    utils::MAX_PLAYLIST_LIMIT,
};

use super::SpotifyClient;

impl SpotifyClient {
    /// Fetches up to `limit` of the token owner's playlists.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::InvalidParameter`] without contacting Spotify
    /// when `limit` is above 50.
    pub async fn get_playlists(&self, token: &Token, limit: u32) -> Result<Playlists, ProxyError> {
        if limit > MAX_PLAYLIST_LIMIT {
            return Err(ProxyError::InvalidParameter(format!(
                "The 'limit' parameter has to be a numerical digit between 0 and {}.",
                MAX_PLAYLIST_LIMIT
            )));
        }

        let url = self.api("/me/playlists");
        let limit = limit.to_string();
        let res = self
            .send_idempotent("playlists", |http| {
                http.get(&url)
                    .header(AUTHORIZATION, token.authorization())
                    .query(&[("limit", limit.as_str())])
            })
            .await?;

        Ok(res.json::<GetUserPlaylistsResponse>().await?.into())
    }
}
