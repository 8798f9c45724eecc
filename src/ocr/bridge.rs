use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::core::geometry::BBox;

/// One fragment as reported by the OCR script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrToken {
    pub text: String,
    pub bbox: TokenBox,
    #[serde(default = "default_confidence")]
    pub confidence: f32,
}

/// Either a plain `[x0, y0, x1, y1]` rectangle or EasyOCR's four corners.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TokenBox {
    Rect([f32; 4]),
    Quad([[f32; 2]; 4]),
}

impl TokenBox {
    pub fn to_bbox(&self) -> BBox {
        match self {
            TokenBox::Rect([x0, y0, x1, y1]) => BBox::new(*x0, *y0, *x1, *y1),
            TokenBox::Quad(points) => BBox::from_quad(points),
        }
    }
}

fn default_confidence() -> f32 {
    0.5
}

pub fn parse_tokens(json: &str) -> Result<Vec<OcrToken>> {
    serde_json::from_str(json).with_context(|| "failed to parse OCR JSON response")
}

/// Runs the Python EasyOCR script on one image and reads its JSON output.
#[derive(Debug, Clone)]
pub struct OcrBridge {
    python: String,
    script_path: PathBuf,
    lang: String,
}

impl Default for OcrBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrBridge {
    pub fn new() -> Self {
        Self {
            python: "python3".to_string(),
            script_path: PathBuf::from("ocr/bridge/easyocr_bridge.py"),
            lang: "en,ar".to_string(),
        }
    }

    pub fn with_script(mut self, script_path: PathBuf) -> Self {
        self.script_path = script_path;
        self
    }

    pub fn with_lang(mut self, lang: String) -> Self {
        self.lang = lang;
        self
    }

    pub fn with_python(mut self, python: String) -> Self {
        self.python = python;
        self
    }

    pub fn run(&self, image_path: &Path) -> Result<Vec<OcrToken>> {
        let output = Command::new(&self.python)
            .arg(&self.script_path)
            .arg("--image")
            .arg(image_path)
            .arg("--lang")
            .arg(&self.lang)
            .output()
            .with_context(|| format!("failed to invoke OCR bridge {}", self.script_path.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("OCR bridge failed on {}: {stderr}", image_path.display());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_tokens(&stdout)
    }
}
