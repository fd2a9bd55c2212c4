use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::{error::ProxyError, server::AppState};

use super::session_from;

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// OAuth redirect target.
///
/// Redeems the code, stores the token under the caller's session, starts
/// the token refresher on first use and records the user's profile. A
/// profile that cannot be fetched is logged; the login still succeeds.
pub async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<Response, ProxyError> {
    if let Some(error) = &params.error {
        tracing::warn!(error = %error, "Spotify denied authorization");
        return Ok((
            StatusCode::UNAUTHORIZED,
            "Spotify did not grant access to the user information.",
        )
            .into_response());
    }

    let Some(code) = params.code else {
        return Ok((
            StatusCode::BAD_REQUEST,
            "Something went wrong while authorizing access to user information. Perhaps the user \
             is already verified, or did not use the correct endpoint for verification.",
        )
            .into_response());
    };

    let pending = match params.state.as_deref() {
        Some(oauth_state) => state.logins.complete(oauth_state).await,
        None => None,
    };
    let Some(pending) = pending else {
        return Err(ProxyError::InvalidParameter(
            "Unknown or expired login. Please authorize again.".to_string(),
        ));
    };

    if session_from(&jar).as_deref() != Some(pending.session_id.as_str()) {
        tracing::warn!("OAuth callback arrived from a different browser session");
        return Err(ProxyError::InvalidParameter(
            "The login was started from another browser session.".to_string(),
        ));
    }

    let token = state
        .spotify
        .exchange_code(&code, &pending.code_verifier)
        .await?;
    state.store.put(&pending.session_id, token.clone()).await;
    state.ensure_refresher();

    match state.spotify.get_profile(&token).await {
        Ok(profile) => {
            tracing::info!(user_id = %profile.user_id, "User authorized with Spotify");
            state.store.set_profile(&pending.session_id, profile).await?;
        }
        Err(e) => tracing::warn!(error = %e, "Failed to fetch profile after login"),
    }

    Ok(Redirect::to("/").into_response())
}
