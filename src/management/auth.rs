use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;

use crate::types::PendingLogin;

/// How long a started login waits for its OAuth callback.
const PENDING_LOGIN_TTL_MINUTES: i64 = 10;

/// Logins that were sent to Spotify and have not come back yet, keyed by
/// the OAuth `state` value.
#[derive(Debug, Default)]
pub struct LoginManager {
    pending: Mutex<HashMap<String, (PendingLogin, DateTime<Utc>)>>,
}

impl LoginManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remembers `login` until its callback arrives. Abandoned logins older
    /// than ten minutes are dropped on the way.
    pub async fn begin(&self, state: String, login: PendingLogin) {
        let now = Utc::now();
        let cutoff = now - Duration::minutes(PENDING_LOGIN_TTL_MINUTES);

        let mut pending = self.pending.lock().await;
        pending.retain(|_, (_, started)| *started > cutoff);
        pending.insert(state, (login, now));
    }

    /// Takes the login started with `state`, if it is still pending.
    pub async fn complete(&self, state: &str) -> Option<PendingLogin> {
        let cutoff = Utc::now() - Duration::minutes(PENDING_LOGIN_TTL_MINUTES);
        self.pending
            .lock()
            .await
            .remove(state)
            .filter(|(_, started)| *started > cutoff)
            .map(|(login, _)| login)
    }
}
