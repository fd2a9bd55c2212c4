use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::error::ProxyError;

/// Largest page Spotify accepts for `GET /me/playlists`.
pub const MAX_PLAYLIST_LIMIT: u32 = 50;

fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generates a PKCE code verifier of 128 alphanumeric characters.
pub fn generate_code_verifier() -> String {
    random_alphanumeric(128)
}

/// Derives the S256 PKCE challenge for `verifier`.
pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Generates an opaque identifier for a browser session cookie.
pub fn generate_session_id() -> String {
    random_alphanumeric(32)
}

/// Generates the OAuth `state` value tying a callback to its login.
pub fn generate_oauth_state() -> String {
    random_alphanumeric(24)
}

/// Simplifies an artist name into the key used for matching.
///
/// The name is decomposed (NFKD) and lowercased, combining marks are
/// dropped, and only alphanumeric characters are kept, so whitespace and
/// punctuation disappear.
///
/// # Example
///
/// ```
/// assert_eq!(normalize_name("Beyoncé"), "beyonce");
/// assert_eq!(normalize_name("Jay-Z"), "jayz");
/// ```
pub fn normalize_name(name: &str) -> String {
    name.nfkd()
        .flat_map(char::to_lowercase)
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// Parses the playlist `limit` route segment, accepting `0..=50`.
pub fn parse_limit(raw: &str) -> Result<u32, ProxyError> {
    match raw.trim().parse::<u32>() {
        Ok(limit) if limit <= MAX_PLAYLIST_LIMIT => Ok(limit),
        _ => Err(ProxyError::InvalidParameter(format!(
            "The 'limit' parameter has to be a numerical digit between 0 and {}.",
            MAX_PLAYLIST_LIMIT
        ))),
    }
}
