//! Error type shared by the session, search and Spotify client layers.
//!
//! The route layer turns every variant into an HTTP response (see
//! [`crate::api`]); none of them is fatal to the process.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

use crate::api::AUTH_USER_PATH;

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// No session, or no token, for the given session id.
    #[error("no Spotify authorization for session {0}")]
    Unauthenticated(String),

    /// No session belongs to the given Spotify user id.
    #[error("User with ID: {0} has not authorized access to Spotify.")]
    UnknownUser(String),

    /// Non-2xx, timed out or malformed response from an external API.
    #[error("upstream request failed: {0}")]
    UpstreamError(String),

    /// The search endpoint returned no items.
    #[error("no results found for '{0}'")]
    EmptyResult(String),

    /// Rejected before any outbound call.
    #[error("{0}")]
    InvalidParameter(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("cannot render response: {0}")]
    Render(String),
}

impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProxyError::UpstreamError(format!("request timed out: {}", err))
        } else {
            ProxyError::UpstreamError(err.to_string())
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        match self {
            ProxyError::Unauthenticated(_) => Redirect::to(AUTH_USER_PATH).into_response(),
            ProxyError::UnknownUser(_) => (StatusCode::NOT_FOUND, self.to_string()).into_response(),
            ProxyError::EmptyResult(_) => (StatusCode::NOT_FOUND, self.to_string()).into_response(),
            ProxyError::InvalidParameter(_) => {
                (StatusCode::BAD_REQUEST, self.to_string()).into_response()
            }
            ProxyError::UpstreamError(ref e) => {
                tracing::warn!(error = %e, "Upstream request failed");
                (StatusCode::BAD_GATEWAY, self.to_string()).into_response()
            }
            ProxyError::Config(ref e) | ProxyError::Render(ref e) => {
                tracing::error!(error = %e, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
            }
        }
    }
}
