//! HTTP error mapping.
//!
//! Handlers return [`AppError`], which renders every failure as a JSON
//! body of the form `{"error": <message>, "code": <CODE>}` with the
//! matching status. Domain errors arrive via `From<CoreError>`, so a
//! bare `?` on an engine call is enough.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use sightline_core::error::CoreError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Domain-level failure from the engine.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The multipart upload could not be read.
    #[error("Malformed upload: {0}")]
    Upload(#[from] MultipartError),
}

impl AppError {
    fn status_code_message(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(CoreError::NotFound { entity, id }) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{entity} with id {id} not found"),
            ),
            AppError::Core(CoreError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Core(CoreError::Conflict(msg)) => {
                (StatusCode::CONFLICT, "CONFLICT", msg.clone())
            }
            AppError::Core(CoreError::Internal(msg)) => {
                // Details stay in the log; the client gets a generic body.
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Upload(err) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", err.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.status_code_message();
        let body = json!({ "error": message, "code": code });
        (status, axum::Json(body)).into_response()
    }
}
