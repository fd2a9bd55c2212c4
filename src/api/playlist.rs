use axum::{
    extract::{Path, State},
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::{
    error::ProxyError,
    format::Format,
    server::AppState,
    utils::{self, MAX_PLAYLIST_LIMIT},
};

use super::{render, require_session};

/// Up to 50 playlists of the session owned by Spotify user `user_id`.
pub async fn user_playlists(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Response, ProxyError> {
    let session_id = state.store.session_for_user(&user_id).await?;
    playlists_response(&state, &session_id, MAX_PLAYLIST_LIMIT, Format::Json).await
}

pub async fn my_playlists(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(limit): Path<String>,
) -> Result<Response, ProxyError> {
    let limit = utils::parse_limit(&limit)?;
    let session_id = require_session(&jar)?;
    playlists_response(&state, &session_id, limit, Format::Json).await
}

pub async fn my_playlists_format(
    State(state): State<AppState>,
    jar: CookieJar,
    Path((limit, format)): Path<(String, String)>,
) -> Result<Response, ProxyError> {
    let limit = utils::parse_limit(&limit)?;
    let format: Format = format.parse()?;
    let session_id = require_session(&jar)?;
    playlists_response(&state, &session_id, limit, format).await
}

async fn playlists_response(
    state: &AppState,
    session_id: &str,
    limit: u32,
    format: Format,
) -> Result<Response, ProxyError> {
    let token = state.store.get(session_id).await?;
    let playlists = state.spotify.get_playlists(&token, limit).await?;
    render(format, &playlists)
}
