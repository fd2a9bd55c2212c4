use reqwest::Url;

use crate::{
    error::ProxyError,
    types::{Token, TokenResponse},
    utils,
};

use super::SpotifyClient;

/// The redirect target and PKCE verifier for one login attempt.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub url: String,
    pub code_verifier: String,
    pub state: String,
}

impl SpotifyClient {
    /// Builds the Spotify authorize URL for a new PKCE login.
    ///
    /// A fresh code verifier and `state` value are generated on every call;
    /// the caller keeps both until the callback arrives.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::Config`] if `SPOTIFY_API_AUTH_URL` is not a
    /// valid URL.
    pub fn authorization_request(&self) -> Result<AuthorizationRequest, ProxyError> {
        let code_verifier = utils::generate_code_verifier();
        let code_challenge = utils::generate_code_challenge(&code_verifier);
        let state = utils::generate_oauth_state();

        let settings = self.settings();
        let url = Url::parse_with_params(
            &settings.auth_url,
            &[
                ("client_id", settings.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", settings.redirect_uri.as_str()),
                ("code_challenge", code_challenge.as_str()),
                ("code_challenge_method", "S256"),
                ("scope", settings.scope.as_str()),
                ("state", state.as_str()),
            ],
        )
        .map_err(|e| ProxyError::Config(format!("invalid authorize URL: {}", e)))?;

        Ok(AuthorizationRequest {
            url: url.to_string(),
            code_verifier,
            state,
        })
    }

    /// Redeems an authorization code for a token.
    ///
    /// Not retried: Spotify rejects a code the second time it is presented.
    pub async fn exchange_code(&self, code: &str, verifier: &str) -> Result<Token, ProxyError> {
        let settings = self.settings();
        let res = self
            .http
            .post(&settings.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("client_id", settings.client_id.as_str()),
                ("code", code),
                ("code_verifier", verifier),
                ("redirect_uri", settings.redirect_uri.as_str()),
            ])
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(super::status_error("token exchange", res).await);
        }

        res.json::<TokenResponse>().await?.into_token(None)
    }

    /// Exchanges `refresh_token` for a new access token.
    ///
    /// When Spotify does not rotate the refresh token, the returned
    /// [`Token`] keeps the one passed in.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<Token, ProxyError> {
        let settings = self.settings();
        let res = self
            .send_idempotent("token refresh", |http| {
                http.post(&settings.token_url).form(&[
                    ("grant_type", "refresh_token"),
                    ("refresh_token", refresh_token),
                    ("client_id", settings.client_id.as_str()),
                ])
            })
            .await?;

        res.json::<TokenResponse>()
            .await?
            .into_token(Some(refresh_token))
    }
}
