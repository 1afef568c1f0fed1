//! Detection collaborator contract and the stand-in implementation.
//!
//! The engine needs exactly one thing from a detection backend: given
//! the raw bytes of one image, eventually produce zero or more labeled
//! detections. [`Detector`] captures that contract behind an
//! object-safe trait so the engine can later be wired to a real model
//! backend without touching any job bookkeeping; [`StubDetector`] is
//! the stand-in used until one exists.

pub mod error;
pub mod stub;

pub use error::DetectorError;
pub use stub::StubDetector;

use async_trait::async_trait;
use sightline_core::detection::Detection;

/// Contract for a single-image detection backend.
#[async_trait]
pub trait Detector: Send + Sync {
    /// Run detection on one image payload.
    ///
    /// Returns every labeled object found (possibly none).
    /// Implementations may take arbitrarily long; callers bound
    /// concurrency, not latency.
    async fn detect(&self, image: &[u8]) -> Result<Vec<Detection>, DetectorError>;
}
