//! Stand-in detector producing fixed detections after a bounded delay.

use std::io::Cursor;
use std::time::Duration;

use async_trait::async_trait;
use image::ImageReader;
use rand::Rng;
use sightline_core::detection::Detection;

use crate::{Detector, DetectorError};

/// Default lower bound on simulated inference latency.
pub const DEFAULT_MIN_DELAY_MS: u64 = 50;
/// Default upper bound on simulated inference latency.
pub const DEFAULT_MAX_DELAY_MS: u64 = 400;

/// Stand-in detection backend.
///
/// Decodes just enough of the payload to prove it is a readable image,
/// sleeps a bounded random interval to imitate inference, then reports
/// a fixed cat-and-dog pair. Payloads that do not decode fail with
/// [`DetectorError::UnreadableImage`].
pub struct StubDetector {
    min_delay: Duration,
    max_delay: Duration,
}

impl StubDetector {
    /// Create a stub with the given latency bounds in milliseconds.
    ///
    /// Bounds are reordered if given backwards.
    pub fn new(min_delay_ms: u64, max_delay_ms: u64) -> Self {
        let min = min_delay_ms.min(max_delay_ms);
        let max = min_delay_ms.max(max_delay_ms);
        Self {
            min_delay: Duration::from_millis(min),
            max_delay: Duration::from_millis(max),
        }
    }

    /// A stub with no simulated latency. Intended for tests.
    pub fn instant() -> Self {
        Self::new(0, 0)
    }

    fn simulated_delay(&self) -> Duration {
        if self.min_delay == self.max_delay {
            return self.min_delay;
        }
        let millis = rand::rng()
            .random_range(self.min_delay.as_millis() as u64..=self.max_delay.as_millis() as u64);
        Duration::from_millis(millis)
    }
}

impl Default for StubDetector {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_DELAY_MS, DEFAULT_MAX_DELAY_MS)
    }
}

#[async_trait]
impl Detector for StubDetector {
    async fn detect(&self, image: &[u8]) -> Result<Vec<Detection>, DetectorError> {
        // Header-only decode: dimensions are enough to prove the payload
        // is a readable image without paying for a full pixel decode.
        let (width, height) = ImageReader::new(Cursor::new(image))
            .with_guessed_format()
            .map_err(|e| DetectorError::UnreadableImage(e.to_string()))?
            .into_dimensions()
            .map_err(|e| DetectorError::UnreadableImage(e.to_string()))?;

        let delay = self.simulated_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        tracing::debug!(width, height, "Stub detection complete");

        Ok(vec![
            Detection::new("Cat", [50, 50, 200, 200]),
            Detection::new("Dog", [300, 100, 450, 350]),
        ])
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
