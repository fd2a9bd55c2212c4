use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ProxyError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    pub token_type: String,
    pub refresh_token: String,
    pub scope: String,
    pub expires_at: DateTime<Utc>,
}

impl Token {
    /// Value for the `Authorization` header, e.g. `Bearer BQC...`.
    pub fn authorization(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

/// Body of a successful `POST /api/token` call.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: Option<String>,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
    pub expires_in: Option<i64>,
}

impl TokenResponse {
    /// Builds a [`Token`], keeping `previous_refresh` when the response
    /// does not rotate the refresh token.
    pub fn into_token(self, previous_refresh: Option<&str>) -> Result<Token, ProxyError> {
        let refresh_token = match (self.refresh_token, previous_refresh) {
            (Some(rt), _) if !rt.is_empty() => rt,
            (_, Some(prev)) => prev.to_string(),
            _ => {
                return Err(ProxyError::UpstreamError(
                    "token response carries no refresh_token".to_string(),
                ));
            }
        };

        Ok(Token {
            access_token: self.access_token,
            token_type: self.token_type.unwrap_or_else(|| "Bearer".to_string()),
            refresh_token,
            scope: self.scope.unwrap_or_default(),
            expires_at: Utc::now() + Duration::seconds(self.expires_in.unwrap_or(3600)),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: String,
    pub user_id: String,
    pub token: Token,
    pub profile: Option<Profile>,
}

#[derive(Debug, Clone)]
pub struct PendingLogin {
    pub session_id: String,
    pub code_verifier: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    pub display_name: String,
    pub email: String,
    pub country: String,
    pub product: String,
    pub followers: u64,
    pub profile_url: String,
    pub image_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeResponse {
    pub id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
    pub product: Option<String>,
    pub followers: Option<Followers>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Followers {
    pub total: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Image {
    pub url: String,
}

impl From<MeResponse> for Profile {
    fn from(me: MeResponse) -> Self {
        Profile {
            user_id: me.id,
            display_name: me.display_name.unwrap_or_default(),
            email: me.email.unwrap_or_default(),
            country: me.country.unwrap_or_default(),
            product: me.product.unwrap_or_default(),
            followers: me.followers.map(|f| f.total).unwrap_or(0),
            profile_url: me.external_urls.spotify.unwrap_or_default(),
            image_url: me
                .images
                .into_iter()
                .next()
                .map(|i| i.url)
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlists {
    #[serde(rename = "arrayOfPlaylists", default)]
    pub playlists: Vec<PlaylistSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistSummary {
    pub playlist_name: String,
    pub playlist_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetUserPlaylistsResponse {
    // Spotify occasionally returns `null` entries for deleted playlists.
    pub items: Vec<Option<Playlist>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
}

impl From<GetUserPlaylistsResponse> for Playlists {
    fn from(res: GetUserPlaylistsResponse) -> Self {
        Playlists {
            playlists: res
                .items
                .into_iter()
                .flatten()
                .map(|p| PlaylistSummary {
                    playlist_name: p.name,
                    playlist_id: p.id,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

/// Body of `GET /search`. Only the requested types are present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    pub tracks: Option<Page<TrackItem>>,
    pub albums: Option<Page<AlbumItem>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackItem {
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlbumItem {
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub artists: Vec<ArtistRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ArtistRef {
    pub id: Option<String>,
    pub name: String,
    pub uri: String,
}

#[derive(Debug, Clone, Default)]
pub struct SearchContext {
    pub reference_artist_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub artist_name: String,
    pub artist_uri: String,
    pub track_name: String,
    pub track_url: String,
    pub track_uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub name: String,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistList {
    #[serde(rename = "artist", default)]
    pub artists: Vec<Artist>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VisitorStatus {
    pub status: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub session_id: String,
}
