//! # API Module
//!
//! HTTP endpoints of the proxy. Every handler is a thin adapter: it reads the
//! browser session from the `spotproxy_session` cookie, validates route
//! parameters, calls into [`crate::management`] or [`crate::spotify`], and
//! renders the result with [`crate::format`].
//!
//! ## Endpoints
//!
//! All routes except [`health`] are mounted under [`API_PREFIX`].
//!
//! ### Authentication
//!
//! - [`auth_user`] - `GET /authuser`, starts a PKCE login and redirects to Spotify
//! - [`callback`] - `GET /login`, the OAuth redirect URI
//! - [`visitor_status`] - `GET /visitorstatus`, whether the session is authorized
//! - [`session`] - `GET /session`, the caller's session id
//!
//! ### Profile and playlists
//!
//! - [`user_profile`] / [`my_profile`] / [`my_profile_format`]
//! - [`user_playlists`] / [`my_playlists`] / [`my_playlists_format`]
//!
//! ### Search
//!
//! - [`search`] / [`search_format`] - one track, preferring the artist on air
//! - [`search_artists`] / [`search_artists_format`] - lead artists of matching albums
//!
//! ## Errors
//!
//! Handlers return [`crate::error::ProxyError`]; an unauthorized session is
//! answered with a redirect to [`AUTH_USER_PATH`], bad parameters with 400.

use axum::{
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::{
    error::ProxyError,
    format::{Entity, Format},
    utils,
};

mod auth;
mod callback;
mod health;
mod playlist;
mod profile;
mod search;
mod status;

pub use auth::auth_user;
pub use callback::callback;
pub use health::health;
pub use playlist::{my_playlists, my_playlists_format, user_playlists};
pub use profile::{my_profile, my_profile_format, user_profile};
pub use search::{search, search_artists, search_artists_format, search_format};
pub use status::{session, visitor_status};

pub const API_PREFIX: &str = "/api/v1/spotify";
pub const AUTH_USER_PATH: &str = "/api/v1/spotify/authuser";
pub const SESSION_COOKIE: &str = "spotproxy_session";

/// Session id carried by the request, if any.
pub(crate) fn session_from(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|id| !id.is_empty())
}

/// Session id carried by the request, or a freshly issued one.
pub(crate) fn ensure_session(jar: CookieJar) -> (CookieJar, String) {
    if let Some(id) = session_from(&jar) {
        return (jar, id);
    }

    let id = utils::generate_session_id();
    let cookie = Cookie::build((SESSION_COOKIE, id.clone()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .build();
    (jar.add(cookie), id)
}

/// Session id of an authorized caller.
pub(crate) fn require_session(jar: &CookieJar) -> Result<String, ProxyError> {
    session_from(jar).ok_or_else(|| ProxyError::Unauthenticated(String::new()))
}

pub(crate) fn render<T: Entity>(format: Format, entity: &T) -> Result<Response, ProxyError> {
    let body = format.render(entity)?;
    Ok(([(CONTENT_TYPE, format.content_type())], body).into_response())
}
