use reqwest::header::AUTHORIZATION;

use crate::{
    error::ProxyError,
    types::{MeResponse, Profile, Token},
};

use super::SpotifyClient;

impl SpotifyClient {
    /// Fetches the token owner's profile from `GET /me`.
    pub async fn get_profile(&self, token: &Token) -> Result<Profile, ProxyError> {
        let url = self.api("/me");
        let res = self
            .send_idempotent("profile", |http| {
                http.get(&url).header(AUTHORIZATION, token.authorization())
            })
            .await?;

        Ok(res.json::<MeResponse>().await?.into())
    }
}
