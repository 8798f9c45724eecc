use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::core::confidence::clamp_confidence;
use crate::core::model::Detection;
use crate::ocr::bridge::{parse_tokens, OcrBridge, OcrToken};
use crate::ocr::text_cleanup::clean_text;
use crate::ocr::OcrEngine;

/// Cleans token text and keeps only what the core needs. Tokens that are
/// empty after cleanup are dropped.
pub fn tokens_to_detections(tokens: Vec<OcrToken>) -> Vec<Detection> {
    tokens
        .into_iter()
        .filter_map(|token| {
            let text = clean_text(&token.text);
            if text.is_empty() {
                return None;
            }
            Some(Detection {
                text,
                confidence: clamp_confidence(token.confidence),
                position: token.bbox.to_bbox().top(),
            })
        })
        .collect()
}

/// Live OCR through the Python bridge.
#[derive(Debug, Clone, Default)]
pub struct BridgeEngine {
    bridge: OcrBridge,
}

impl BridgeEngine {
    pub fn new(bridge: OcrBridge) -> Self {
        Self { bridge }
    }
}

impl OcrEngine for BridgeEngine {
    fn detect(&self, image: &Path) -> Result<Vec<Detection>> {
        let tokens = self.bridge.run(image)?;
        debug!(image = %image.display(), tokens = tokens.len(), "OCR bridge returned");
        Ok(tokens_to_detections(tokens))
    }
}

/// Precomputed detections stored next to the batch as `<dir>/<image stem>.json`,
/// in the same format the bridge prints.
#[derive(Debug, Clone)]
pub struct SidecarEngine {
    dir: PathBuf,
}

impl SidecarEngine {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn sidecar_path(&self, image: &Path) -> Result<PathBuf> {
        let stem = image
            .file_stem()
            .ok_or_else(|| anyhow::anyhow!("image path has no file name: {}", image.display()))?;
        let mut name = stem.to_os_string();
        name.push(".json");
        Ok(self.dir.join(name))
    }
}

impl OcrEngine for SidecarEngine {
    fn detect(&self, image: &Path) -> Result<Vec<Detection>> {
        let path = self.sidecar_path(image)?;
        let json = fs::read_to_string(&path)
            .with_context(|| format!("failed to read detections from {}", path.display()))?;
        let tokens = parse_tokens(&json)
            .with_context(|| format!("bad detections file {}", path.display()))?;
        Ok(tokens_to_detections(tokens))
    }
}
