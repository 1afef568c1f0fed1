//! Batch detection engine.
//!
//! The engine owns everything between the HTTP surface and the detector
//! collaborator: the process-wide job store, the submission coordinator
//! that fans work out to background tasks, and the janitor that evicts
//! expired completed jobs.

pub mod coordinator;
pub mod janitor;
pub mod store;

pub use coordinator::DetectionCoordinator;
pub use janitor::StoreJanitor;
pub use store::TaskStore;
