//! Handlers for the `/detect` resource.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use sightline_core::job::JobSnapshot;
use sightline_core::types::TaskId;

use crate::error::AppResult;
use crate::state::AppState;

/// Response for a successful batch submission.
#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    /// Always `"processing"`; workers start immediately.
    pub status: &'static str,
    /// Poll handle for the new job.
    pub task_id: TaskId,
}

/// POST /api/v1/detect
///
/// Submit a batch of images as multipart file fields. Returns 202 with
/// the task id; detection runs in the background and progress is
/// available via the poll endpoint. Payloads are opaque bytes here --
/// the engine validates nothing beyond batch non-emptiness.
pub async fn submit_batch(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<SubmitResponse>)> {
    let mut images: Vec<Vec<u8>> = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        images.push(field.bytes().await?.to_vec());
    }

    let received = images.len();
    let task_id = state.coordinator.submit(images).await?;

    tracing::info!(task_id = %task_id, files = received, "Batch accepted");

    Ok((
        StatusCode::ACCEPTED,
        Json(SubmitResponse {
            status: "processing",
            task_id,
        }),
    ))
}

/// GET /api/v1/detect/{task_id}
///
/// Current snapshot of a job: progress percentage, processed count,
/// done flag, aggregate stats, and per-item results. 404 for unknown
/// (or already-evicted) task ids.
pub async fn job_progress(
    State(state): State<AppState>,
    Path(task_id): Path<TaskId>,
) -> AppResult<Json<JobSnapshot>> {
    let snapshot = state.coordinator.poll(task_id).await?;
    Ok(Json(snapshot))
}
