//! Spool retention cleanup.
//!
//! Converted outputs are ephemeral. A background task periodically drops
//! download-center entries older than the configured retention and purges
//! their spooled files.

use std::sync::Arc;
use std::time::Duration;

use crate::state::AppState;

/// Spawn the periodic cleanup task.
pub fn spawn_cleanup_task(state: Arc<AppState>) -> tokio::task::JoinHandle<()> {
    let interval = Duration::from_secs(state.config.cleanup_interval_secs().max(1));
    let retention = Duration::from_secs(state.config.spool_retention_secs());

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick fires immediately; skip it so startup stays quiet.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let cutoff = chrono::Utc::now()
                - chrono::Duration::from_std(retention).unwrap_or(chrono::Duration::zero());
            let expired = state.downloads.remove_older_than(cutoff).await;

            match state.spool.purge_older_than(retention).await {
                Ok(purged) => {
                    if expired > 0 || purged > 0 {
                        tracing::info!(expired, purged, "Spool cleanup pass completed");
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Spool cleanup pass failed");
                }
            }
        }
    })
}
