use axum::{
    extract::{Path, State},
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::{error::ProxyError, format::Format, server::AppState};

use super::{render, require_session};

/// Profile of the session owned by Spotify user `user_id`, as JSON.
pub async fn user_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Response, ProxyError> {
    let session_id = state.store.session_for_user(&user_id).await?;
    profile_response(&state, &session_id, Format::Json).await
}

pub async fn my_profile(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, ProxyError> {
    let session_id = require_session(&jar)?;
    profile_response(&state, &session_id, Format::Json).await
}

pub async fn my_profile_format(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(format): Path<String>,
) -> Result<Response, ProxyError> {
    let format: Format = format.parse()?;
    let session_id = require_session(&jar)?;
    profile_response(&state, &session_id, format).await
}

// Always asks Spotify so renamed users or new followers show up. When
// Spotify fails, the profile recorded at login or on a previous call is
// served instead.
async fn profile_response(
    state: &AppState,
    session_id: &str,
    format: Format,
) -> Result<Response, ProxyError> {
    let token = state.store.get(session_id).await?;
    let profile = match state.spotify.get_profile(&token).await {
        Ok(profile) => {
            state.store.set_profile(session_id, profile.clone()).await?;
            profile
        }
        Err(e @ ProxyError::UpstreamError(_)) => match state.store.profile(session_id).await? {
            Some(cached) => {
                tracing::warn!(session_id, error = %e, "Serving recorded profile");
                cached
            }
            None => return Err(e),
        },
        Err(e) => return Err(e),
    };
    render(format, &profile)
}
