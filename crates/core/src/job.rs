//! Per-batch job state machine.
//!
//! A [`BatchJob`] tracks one submitted batch: per-item results, the
//! progress counters, and the aggregate statistics computed when the
//! last item lands. All mutation goes through
//! [`BatchJob::record_item`], which is designed to run inside the
//! store's critical section so that concurrent worker completions
//! serialize cleanly.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::detection::Detection;
use crate::error::CoreError;
use crate::stats::class_frequencies;
use crate::types::{TaskId, Timestamp};

/// State of one submitted batch.
///
/// Invariants, enforced by [`record_item`](Self::record_item):
/// - `processed` never exceeds `total_items`;
/// - `done` is true exactly when `processed == total_items`;
/// - `stats` is computed once, at the done transition, never partially.
#[derive(Debug, Clone)]
pub struct BatchJob {
    id: TaskId,
    total_items: usize,
    processed: usize,
    progress: u8,
    done: bool,
    results: Vec<Vec<Detection>>,
    stats: BTreeMap<String, u64>,
    created_at: Timestamp,
    completed_at: Option<Timestamp>,
}

/// Immutable point-in-time copy of a job's client-visible state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobSnapshot {
    /// Completion percentage, `floor(processed / total * 100)`.
    pub progress: u8,
    /// Number of items fully processed so far.
    pub processed: usize,
    /// True once every item in the batch has been processed.
    pub done: bool,
    /// Class-name to count histogram; empty until `done`.
    pub stats: BTreeMap<String, u64>,
    /// Per-item detection lists, one slot per submitted item.
    pub results: Vec<Vec<Detection>>,
}

impl BatchJob {
    /// Initialize a job for a batch of `total_items` images.
    ///
    /// Submission validates `total_items >= 1` before a job is created.
    pub fn new(id: TaskId, total_items: usize) -> Self {
        Self {
            id,
            total_items,
            processed: 0,
            progress: 0,
            done: false,
            results: vec![Vec::new(); total_items],
            stats: BTreeMap::new(),
            created_at: chrono::Utc::now(),
            completed_at: None,
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// When the job completed, if it has.
    pub fn completed_at(&self) -> Option<Timestamp> {
        self.completed_at
    }

    /// Apply one worker completion: append `detections` to the slot for
    /// `item_index`, advance the counters, and on the final item compute
    /// the aggregate statistics and mark the job done.
    ///
    /// Each slot is written by exactly one worker invocation. The checks
    /// here keep a dispatch bug from corrupting the counters:
    /// - an out-of-range index is rejected with `Validation`;
    /// - recording into an already-completed job is rejected with
    ///   `Conflict`.
    pub fn record_item(
        &mut self,
        item_index: usize,
        detections: Vec<Detection>,
    ) -> Result<(), CoreError> {
        if item_index >= self.total_items {
            return Err(CoreError::Validation(format!(
                "Item index {item_index} out of range for batch of {}",
                self.total_items
            )));
        }
        if self.done {
            return Err(CoreError::Conflict(format!(
                "Job {} is already complete",
                self.id
            )));
        }

        self.results[item_index].extend(detections);
        self.processed += 1;
        self.progress = ((self.processed * 100) / self.total_items) as u8;

        if self.processed == self.total_items {
            self.stats = class_frequencies(&self.results);
            self.done = true;
            self.completed_at = Some(chrono::Utc::now());
        }

        Ok(())
    }

    /// Client-visible copy of the current state.
    pub fn snapshot(&self) -> JobSnapshot {
        JobSnapshot {
            progress: self.progress,
            processed: self.processed,
            done: self.done,
            stats: self.stats.clone(),
            results: self.results.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn det(class: &str) -> Detection {
        Detection::new(class, [50, 50, 200, 200])
    }

    fn new_job(total: usize) -> BatchJob {
        BatchJob::new(TaskId::new_v4(), total)
    }

    // -- Initial state --

    #[test]
    fn new_job_starts_empty() {
        let job = new_job(3);
        let snap = job.snapshot();
        assert_eq!(snap.processed, 0);
        assert_eq!(snap.progress, 0);
        assert!(!snap.done);
        assert!(snap.stats.is_empty());
        assert_eq!(snap.results, vec![Vec::new(), Vec::new(), Vec::new()]);
    }

    // -- Progress accounting --

    #[test]
    fn progress_uses_floor_division() {
        let mut job = new_job(3);
        job.record_item(0, vec![det("Cat")]).unwrap();
        assert_eq!(job.snapshot().progress, 33);
        job.record_item(1, Vec::new()).unwrap();
        assert_eq!(job.snapshot().progress, 66);
        job.record_item(2, Vec::new()).unwrap();
        assert_eq!(job.snapshot().progress, 100);
    }

    #[test]
    fn done_tracks_processed_exactly() {
        let mut job = new_job(2);
        assert!(!job.is_done());
        job.record_item(1, Vec::new()).unwrap();
        assert!(!job.is_done());
        assert!(job.completed_at().is_none());
        job.record_item(0, Vec::new()).unwrap();
        assert!(job.is_done());
        assert_eq!(job.processed(), job.total_items());
        assert!(job.completed_at().is_some());
    }

    #[test]
    fn completion_order_does_not_matter() {
        let mut job = new_job(3);
        job.record_item(2, vec![det("Dog")]).unwrap();
        job.record_item(0, vec![det("Cat")]).unwrap();
        job.record_item(1, Vec::new()).unwrap();
        let snap = job.snapshot();
        assert!(snap.done);
        assert_eq!(snap.results[0], vec![det("Cat")]);
        assert_eq!(snap.results[1], Vec::new());
        assert_eq!(snap.results[2], vec![det("Dog")]);
    }

    // -- Stats aggregation --

    #[test]
    fn stats_empty_until_done() {
        let mut job = new_job(2);
        job.record_item(0, vec![det("Cat"), det("Dog")]).unwrap();
        assert!(job.snapshot().stats.is_empty());
        job.record_item(1, vec![det("Cat")]).unwrap();
        let stats = job.snapshot().stats;
        assert_eq!(stats.get("Cat"), Some(&2));
        assert_eq!(stats.get("Dog"), Some(&1));
    }

    #[test]
    fn single_item_job_completes_in_one_step() {
        let mut job = new_job(1);
        job.record_item(0, vec![det("Cat"), det("Dog")]).unwrap();
        let snap = job.snapshot();
        assert_eq!(snap.processed, 1);
        assert_eq!(snap.progress, 100);
        assert!(snap.done);
        let total: u64 = snap.stats.values().sum();
        assert_eq!(total, snap.results[0].len() as u64);
    }

    #[test]
    fn job_with_no_detections_completes_with_empty_stats() {
        let mut job = new_job(1);
        job.record_item(0, Vec::new()).unwrap();
        let snap = job.snapshot();
        assert!(snap.done);
        assert!(snap.stats.is_empty());
    }

    // -- Defensive checks --

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut job = new_job(2);
        let err = job.record_item(2, Vec::new()).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        // The failed call must not have advanced anything.
        assert_eq!(job.processed(), 0);
    }

    #[test]
    fn recording_into_done_job_is_rejected() {
        let mut job = new_job(1);
        job.record_item(0, vec![det("Cat")]).unwrap();
        let before = job.snapshot();
        let err = job.record_item(0, vec![det("Dog")]).unwrap_err();
        assert!(matches!(err, CoreError::Conflict(_)));
        // State is frozen once done.
        assert_eq!(job.snapshot(), before);
    }

    // -- Snapshot serialization --

    #[test]
    fn snapshot_serializes_wire_shape() {
        let mut job = new_job(1);
        job.record_item(0, vec![det("Cat")]).unwrap();
        let json = serde_json::to_value(job.snapshot()).unwrap();
        assert_eq!(json["progress"], 100);
        assert_eq!(json["processed"], 1);
        assert_eq!(json["done"], true);
        assert_eq!(json["stats"]["Cat"], 1);
        assert_eq!(json["results"][0][0]["class"], "Cat");
        assert_eq!(
            json["results"][0][0]["bbox"],
            serde_json::json!([50, 50, 200, 200])
        );
    }
}
