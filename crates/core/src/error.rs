//! Shared error taxonomy for the domain layer.

use crate::types::TaskId;

/// Domain errors surfaced by the job store and coordinator.
///
/// `Validation` covers both caller mistakes (an empty batch) and
/// dispatch bugs (an out-of-range item index); `Conflict` marks an
/// append into a job that already completed. The transport layer maps
/// these onto HTTP statuses.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("No {entity} with id {id}")]
    NotFound { entity: &'static str, id: TaskId },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),
}
