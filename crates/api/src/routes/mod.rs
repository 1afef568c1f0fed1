pub mod detect;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Everything mounted under `/api/v1`:
///
/// ```text
/// POST /detect                 submit a batch
/// GET  /detect/{task_id}       poll job progress
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/detect", detect::router())
}
