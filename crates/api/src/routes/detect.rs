//! Route definitions for the `/detect` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::detect;
use crate::state::AppState;

/// Routes mounted at `/detect`.
///
/// ```text
/// POST   /                -> submit_batch
/// GET    /{task_id}       -> job_progress
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(detect::submit_batch))
        .route("/{task_id}", get(detect::job_progress))
}
