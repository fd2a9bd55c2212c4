use std::fmt;

use reqwest::header::AUTHORIZATION;

use crate::{
    error::ProxyError,
    types::{SearchResponse, Token},
};

use super::SpotifyClient;

/// Item type requested from `GET /search`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    Track,
    Album,
}

impl SearchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Track => "track",
            SearchType::Album => "album",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SpotifyClient {
    /// Runs `GET /search?q=<query>&type=<kind>`.
    pub async fn search_items(
        &self,
        token: &Token,
        query: &str,
        kind: SearchType,
    ) -> Result<SearchResponse, ProxyError> {
        let url = self.api("/search");
        let res = self
            .send_idempotent("search", |http| {
                http.get(&url)
                    .header(AUTHORIZATION, token.authorization())
                    .query(&[("q", query), ("type", kind.as_str())])
            })
            .await?;

        Ok(res.json::<SearchResponse>().await?)
    }
}
