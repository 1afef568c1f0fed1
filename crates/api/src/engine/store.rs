//! Process-wide store of batch detection jobs.

use std::collections::HashMap;

use sightline_core::detection::Detection;
use sightline_core::error::CoreError;
use sightline_core::job::{BatchJob, JobSnapshot};
use sightline_core::types::{TaskId, Timestamp};
use tokio::sync::RwLock;

/// Concurrent map of all tracked jobs.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc`
/// and injected into the coordinator and janitor rather than accessed
/// as a global. Every mutation of a job runs as one write-lock critical
/// section, so worker completions on the same job serialize and the
/// progress counters never tear.
pub struct TaskStore {
    jobs: RwLock<HashMap<TaskId, BatchJob>>,
}

impl TaskStore {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
        }
    }

    /// Allocate a fresh job for a batch of `total_items` images and
    /// return its id.
    ///
    /// Ids are random UUIDs, so concurrently created jobs cannot
    /// collide.
    pub async fn create(&self, total_items: usize) -> TaskId {
        let id = TaskId::new_v4();
        let job = BatchJob::new(id, total_items);
        self.jobs.write().await.insert(id, job);
        id
    }

    /// Point-in-time copy of a job's client-visible state, or `None`
    /// for an unknown id.
    pub async fn snapshot(&self, id: TaskId) -> Option<JobSnapshot> {
        self.jobs.read().await.get(&id).map(BatchJob::snapshot)
    }

    /// Apply one worker completion to a job.
    ///
    /// The whole append-count-aggregate sequence runs under the write
    /// lock, making it atomic with respect to every other completion
    /// and every concurrent poll.
    pub async fn record_item(
        &self,
        id: TaskId,
        item_index: usize,
        detections: Vec<Detection>,
    ) -> Result<(), CoreError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .get_mut(&id)
            .ok_or(CoreError::NotFound { entity: "Job", id })?;
        job.record_item(item_index, detections)
    }

    /// Number of jobs currently tracked, in any state.
    pub async fn job_count(&self) -> usize {
        self.jobs.read().await.len()
    }

    /// Evict completed jobs whose completion time is before `cutoff`.
    ///
    /// In-flight jobs are never touched, so a worker can always record
    /// its result. Returns the number of jobs removed.
    pub async fn purge_completed_before(&self, cutoff: Timestamp) -> usize {
        let mut jobs = self.jobs.write().await;
        let before = jobs.len();
        jobs.retain(|_, job| match job.completed_at() {
            Some(completed) => completed >= cutoff,
            None => true,
        });
        before - jobs.len()
    }
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
