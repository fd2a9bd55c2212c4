use axum::{extract::State, response::Redirect};
use axum_extra::extract::CookieJar;

use crate::{error::ProxyError, server::AppState, types::PendingLogin};

use super::ensure_session;

/// Sends the browser to Spotify's consent screen.
///
/// The PKCE verifier stays on the server, keyed by the OAuth `state` that
/// Spotify echoes back to [`super::callback`].
pub async fn auth_user(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect), ProxyError> {
    let (jar, session_id) = ensure_session(jar);
    let request = state.spotify.authorization_request()?;

    state
        .logins
        .begin(
            request.state,
            PendingLogin {
                session_id,
                code_verifier: request.code_verifier,
            },
        )
        .await;

    Ok((jar, Redirect::to(&request.url)))
}
