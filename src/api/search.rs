use axum::{
    extract::{Path, Query, State},
    response::Response,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::{error::ProxyError, format::Format, server::AppState, types::SearchContext};

use super::{render, require_session};

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    /// Radio channel whose current song names the reference artist.
    channel: Option<u32>,
    /// Reference artist given directly; wins over `channel`.
    artist: Option<String>,
}

pub async fn search(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(query): Path<String>,
    Query(params): Query<SearchParams>,
) -> Result<Response, ProxyError> {
    search_response(&state, &jar, &query, params, Format::Json).await
}

pub async fn search_format(
    State(state): State<AppState>,
    jar: CookieJar,
    Path((query, format)): Path<(String, String)>,
    Query(params): Query<SearchParams>,
) -> Result<Response, ProxyError> {
    let format: Format = format.parse()?;
    search_response(&state, &jar, &query, params, format).await
}

pub async fn search_artists(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(query): Path<String>,
) -> Result<Response, ProxyError> {
    let session_id = require_session(&jar)?;
    let artists = state.resolver.resolve_artists(&query, &session_id).await?;
    render(Format::Json, &artists)
}

pub async fn search_artists_format(
    State(state): State<AppState>,
    jar: CookieJar,
    Path((query, format)): Path<(String, String)>,
) -> Result<Response, ProxyError> {
    let format: Format = format.parse()?;
    let session_id = require_session(&jar)?;
    let artists = state.resolver.resolve_artists(&query, &session_id).await?;
    render(format, &artists)
}

async fn search_response(
    state: &AppState,
    jar: &CookieJar,
    query: &str,
    params: SearchParams,
    format: Format,
) -> Result<Response, ProxyError> {
    if query.trim().is_empty() {
        return Err(ProxyError::InvalidParameter(
            "The search query must not be empty.".to_string(),
        ));
    }
    let session_id = require_session(jar)?;
    if !state.store.contains(&session_id).await {
        return Err(ProxyError::Unauthenticated(session_id));
    }

    // validated before any outbound call
    let context = search_context(state, params).await;
    let result = state.resolver.resolve(query, &session_id, &context).await?;
    render(format, &result)
}

// A radio outage degrades to "no reference artist", which makes the
// resolver fall back to the first hit.
async fn search_context(state: &AppState, params: SearchParams) -> SearchContext {
    if let Some(artist) = params.artist.filter(|a| !a.trim().is_empty()) {
        return SearchContext {
            reference_artist_name: artist,
        };
    }

    let channel = params
        .channel
        .unwrap_or(state.settings.radio.default_channel);
    let reference_artist_name = match state.radio.current_artist(channel).await {
        Ok(artist) => artist.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(channel, error = %e, "Failed to read now playing");
            String::new()
        }
    };

    SearchContext {
        reference_artist_name,
    }
}
