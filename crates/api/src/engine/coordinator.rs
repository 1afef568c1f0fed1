//! Batch submission and polling.
//!
//! [`DetectionCoordinator::submit`] allocates the job and fans out one
//! background task per image; the caller gets the task id back
//! immediately and workers report into the [`TaskStore`] as they
//! finish, in any order. [`DetectionCoordinator::poll`] is the
//! level-triggered read side: it always reflects the store's current
//! state, with no push notifications.

use std::sync::Arc;

use sightline_core::error::CoreError;
use sightline_core::job::JobSnapshot;
use sightline_core::types::TaskId;
use sightline_detector::Detector;
use tokio::sync::Semaphore;

use super::store::TaskStore;

/// Orchestrates batch submission and polling.
pub struct DetectionCoordinator {
    store: Arc<TaskStore>,
    detector: Arc<dyn Detector>,
    permits: Arc<Semaphore>,
}

impl DetectionCoordinator {
    /// Create a coordinator running at most `concurrency` detector
    /// calls at once, process-wide across batches.
    pub fn new(store: Arc<TaskStore>, detector: Arc<dyn Detector>, concurrency: usize) -> Self {
        Self {
            store,
            detector,
            permits: Arc::new(Semaphore::new(concurrency.max(1))),
        }
    }

    /// Submit a batch of images for detection.
    ///
    /// Rejects an empty batch before allocating anything. Returns the
    /// new job's id without waiting for any worker; once dispatched, a
    /// worker always runs to completion and always records its item.
    pub async fn submit(&self, images: Vec<Vec<u8>>) -> Result<TaskId, CoreError> {
        if images.is_empty() {
            return Err(CoreError::Validation(
                "Batch must contain at least one image".to_string(),
            ));
        }

        let total = images.len();
        let task_id = self.store.create(total).await;

        for (item_index, payload) in images.into_iter().enumerate() {
            let store = Arc::clone(&self.store);
            let detector = Arc::clone(&self.detector);
            let permits = Arc::clone(&self.permits);

            tokio::spawn(async move {
                // The semaphore is never closed while the coordinator
                // lives; a closed semaphore means shutdown, so bail.
                let Ok(_permit) = permits.acquire().await else {
                    return;
                };

                // A failed detection still counts the item as processed,
                // with no detections, so the job always reaches 100%.
                let detections = match detector.detect(&payload).await {
                    Ok(detections) => detections,
                    Err(e) => {
                        tracing::warn!(
                            task_id = %task_id,
                            item_index,
                            error = %e,
                            "Detection failed; recording empty result",
                        );
                        Vec::new()
                    }
                };

                if let Err(e) = store.record_item(task_id, item_index, detections).await {
                    // Unreachable with correct dispatch; a bug here must
                    // not take the process down or touch other jobs.
                    tracing::error!(
                        task_id = %task_id,
                        item_index,
                        error = %e,
                        "Failed to record detection result",
                    );
                }
            });
        }

        tracing::info!(task_id = %task_id, total, "Batch submitted");

        Ok(task_id)
    }

    /// Current snapshot of a job.
    pub async fn poll(&self, id: TaskId) -> Result<JobSnapshot, CoreError> {
        self.store
            .snapshot(id)
            .await
            .ok_or(CoreError::NotFound { entity: "Job", id })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
