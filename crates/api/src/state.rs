use std::sync::Arc;

use crate::config::ServerConfig;
use crate::engine::{DetectionCoordinator, TaskStore};

/// Handler-visible application state, reached via `State<AppState>`.
///
/// Clones are cheap: every field is an `Arc` handle.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// Process-wide job store; the health endpoint reads its size.
    pub store: Arc<TaskStore>,
    /// Submission and polling entry points.
    pub coordinator: Arc<DetectionCoordinator>,
}
