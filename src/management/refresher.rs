use std::{sync::Arc, time::Duration};

use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::spotify::TokenSource;

use super::SessionStore;

/// Default sweep period: 30 minutes, well inside Spotify's one-hour expiry.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// Outcome of one pass over the session store.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub refreshed: usize,
    pub failed: usize,
    /// Sessions without a refresh token, or that disappeared or got a new
    /// token mid-sweep.
    pub skipped: usize,
}

/// Periodically exchanges every stored refresh token for a new access token.
pub struct TokenRefresher {
    store: Arc<dyn SessionStore>,
    source: Arc<dyn TokenSource>,
    period: Duration,
}

/// Owner side of a running [`TokenRefresher`].
pub struct RefresherHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl RefresherHandle {
    /// Cancels the task and waits for it to finish its current sweep.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            tracing::warn!(error = %e, "Token refresher ended abnormally");
        }
    }
}

impl TokenRefresher {
    pub fn new(
        store: Arc<dyn SessionStore>,
        source: Arc<dyn TokenSource>,
        period: Duration,
    ) -> Self {
        TokenRefresher {
            store,
            source,
            // tokio intervals reject a zero period
            period: period.max(Duration::from_secs(1)),
        }
    }

    /// Refreshes every stored session once.
    ///
    /// A failure is logged and counted; it never stops the sweep.
    pub async fn sweep(&self) -> SweepReport {
        let mut report = SweepReport::default();

        for session_id in self.store.session_ids().await {
            let current = match self.store.get(&session_id).await {
                Ok(token) if !token.refresh_token.is_empty() => token,
                _ => {
                    report.skipped += 1;
                    continue;
                }
            };

            match self.source.refresh(&current.refresh_token).await {
                Ok(token) => {
                    if self.store.replace_token(&session_id, &current, token).await {
                        report.refreshed += 1;
                    } else {
                        tracing::debug!(
                            session_id = %session_id,
                            "Token changed during refresh, keeping newer one"
                        );
                        report.skipped += 1;
                    }
                }
                Err(e) => {
                    tracing::warn!(session_id = %session_id, error = %e, "Failed to refresh token");
                    report.failed += 1;
                }
            }
        }

        report
    }

    /// Runs sweeps every period until `cancel` fires. The first sweep
    /// happens one full period after the call.
    pub async fn run(self, cancel: CancellationToken) {
        tracing::info!(
            interval_secs = self.period.as_secs(),
            "Token refresher started"
        );

        let start = tokio::time::Instant::now() + self.period;
        let mut interval = tokio::time::interval_at(start, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Token refresher stopping");
                    break;
                }
                _ = interval.tick() => {
                    let report = self.sweep().await;
                    tracing::info!(
                        refreshed = report.refreshed,
                        failed = report.failed,
                        skipped = report.skipped,
                        "Token refresh sweep finished"
                    );
                }
            }
        }
    }

    /// Spawns [`run`](Self::run) on the current runtime.
    pub fn spawn(self, cancel: CancellationToken) -> RefresherHandle {
        let task = tokio::spawn(self.run(cancel.clone()));
        RefresherHandle { cancel, task }
    }
}
