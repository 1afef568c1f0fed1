//! Liveness endpoint, mounted at the root rather than under `/api/v1`
//! so load balancers can reach it unversioned.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Version from the crate manifest.
    pub version: &'static str,
    /// How many jobs the store currently holds, in any state.
    pub jobs_tracked: usize,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        jobs_tracked: state.store.job_count().await,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
