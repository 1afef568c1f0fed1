//! Sightline domain library.
//!
//! Pure domain types and logic for batch detection jobs: detection
//! result types, the per-job state machine, the class-frequency
//! aggregator, and the shared error taxonomy. No async, no transport --
//! the `api` crate owns those.

pub mod detection;
pub mod error;
pub mod job;
pub mod stats;
pub mod types;
