//! Background eviction of expired completed jobs.
//!
//! Jobs are never deleted on the request path, so without eviction the
//! store grows for the life of the process. The janitor sweeps on an
//! interval and evicts jobs that completed longer than the TTL ago.
//! In-flight jobs are never evicted, so a worker cannot lose its own
//! job mid-run.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::store::TaskStore;

/// Background sweeper that evicts completed jobs after a TTL.
///
/// A single long-lived Tokio task, started from `main`.
pub struct StoreJanitor {
    store: Arc<TaskStore>,
    ttl: chrono::Duration,
    sweep_interval: Duration,
}

impl StoreJanitor {
    pub fn new(store: Arc<TaskStore>, ttl_secs: u64, sweep_interval_secs: u64) -> Self {
        Self {
            store,
            ttl: chrono::Duration::seconds(ttl_secs as i64),
            sweep_interval: Duration::from_secs(sweep_interval_secs.max(1)),
        }
    }

    /// Run the sweep loop until the cancellation token is triggered.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.sweep_interval);
        tracing::info!(
            ttl_secs = self.ttl.num_seconds(),
            sweep_interval_secs = self.sweep_interval.as_secs(),
            "Store janitor started",
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Store janitor shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    let cutoff = chrono::Utc::now() - self.ttl;
                    let evicted = self.store.purge_completed_before(cutoff).await;
                    if evicted > 0 {
                        tracing::info!(evicted, "Evicted expired jobs");
                    }
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
