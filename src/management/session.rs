use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    error::ProxyError,
    types::{Profile, Session, Token},
};

/// Maps browser session ids to the Spotify token and profile of their user.
///
/// Implementations must make every write atomic from a reader's point of
/// view: `get` returns either the previous or the new token in full.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Stores `token` for `session_id`, creating the session if needed.
    async fn put(&self, session_id: &str, token: Token);

    /// The current token of `session_id`.
    ///
    /// # Errors
    ///
    /// [`ProxyError::Unauthenticated`] if the session is unknown.
    async fn get(&self, session_id: &str) -> Result<Token, ProxyError>;

    async fn contains(&self, session_id: &str) -> bool;

    /// The session owned by Spotify user `user_id`.
    ///
    /// # Errors
    ///
    /// [`ProxyError::UnknownUser`] if no session has that user's profile.
    async fn session_for_user(&self, user_id: &str) -> Result<String, ProxyError>;

    /// Records the profile (and with it the Spotify user id) of a session.
    async fn set_profile(&self, session_id: &str, profile: Profile) -> Result<(), ProxyError>;

    async fn profile(&self, session_id: &str) -> Result<Option<Profile>, ProxyError>;

    /// Swaps the token of an existing session, but only while it still
    /// holds `previous`. Returns `false` and stores nothing when the session
    /// is gone or its token changed in the meantime.
    async fn replace_token(&self, session_id: &str, previous: &Token, token: Token) -> bool;

    /// Snapshot of the ids currently stored.
    async fn session_ids(&self) -> Vec<String>;
}

/// Process-wide in-memory [`SessionStore`]. Entries live until exit.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn put(&self, session_id: &str, token: Token) {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(session_id) {
            Some(session) => session.token = token,
            None => {
                sessions.insert(
                    session_id.to_string(),
                    Session {
                        session_id: session_id.to_string(),
                        user_id: String::new(),
                        token,
                        profile: None,
                    },
                );
            }
        }
    }

    async fn get(&self, session_id: &str) -> Result<Token, ProxyError> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .map(|s| s.token.clone())
            .ok_or_else(|| ProxyError::Unauthenticated(session_id.to_string()))
    }

    async fn contains(&self, session_id: &str) -> bool {
        self.sessions.read().await.contains_key(session_id)
    }

    async fn session_for_user(&self, user_id: &str) -> Result<String, ProxyError> {
        self.sessions
            .read()
            .await
            .values()
            .find(|s| !s.user_id.is_empty() && s.user_id == user_id)
            .map(|s| s.session_id.clone())
            .ok_or_else(|| ProxyError::UnknownUser(user_id.to_string()))
    }

    async fn set_profile(&self, session_id: &str, profile: Profile) -> Result<(), ProxyError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| ProxyError::Unauthenticated(session_id.to_string()))?;
        session.user_id = profile.user_id.clone();
        session.profile = Some(profile);
        Ok(())
    }

    async fn profile(&self, session_id: &str) -> Result<Option<Profile>, ProxyError> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .map(|s| s.profile.clone())
            .ok_or_else(|| ProxyError::Unauthenticated(session_id.to_string()))
    }

    async fn replace_token(&self, session_id: &str, previous: &Token, token: Token) -> bool {
        match self.sessions.write().await.get_mut(session_id) {
            Some(session) if session.token == *previous => {
                session.token = token;
                true
            }
            _ => false,
        }
    }

    async fn session_ids(&self) -> Vec<String> {
        self.sessions.read().await.keys().cloned().collect()
    }
}
