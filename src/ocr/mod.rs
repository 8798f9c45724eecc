pub mod bridge;
pub mod detections;
pub mod text_cleanup;

pub use bridge::{OcrBridge, OcrToken};
pub use detections::{BridgeEngine, SidecarEngine};

use anyhow::Result;
use std::path::Path;

use crate::core::model::Detection;

/// Source of detections for one image. Implementations are created once and
/// reused for a whole batch.
pub trait OcrEngine {
    fn detect(&self, image: &Path) -> Result<Vec<Detection>>;
}
