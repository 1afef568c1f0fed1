//! Detection result types shared across the workspace.

use serde::{Deserialize, Serialize};

/// One labeled object found in an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    /// Class label, e.g. `"Cat"`.
    pub class: String,
    /// Bounding box corners as `[x1, y1, x2, y2]`, pixel coordinates,
    /// top-left origin.
    pub bbox: [i64; 4],
}

impl Detection {
    pub fn new(class: impl Into<String>, bbox: [i64; 4]) -> Self {
        Self {
            class: class.into(),
            bbox,
        }
    }
}
