pub mod html_report_export;
pub mod json_export;
pub mod text_export;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::core::model::BatchResult;

pub use html_report_export::HtmlReportExporter;
pub use json_export::JsonExporter;
pub use text_export::TextExporter;

pub trait Exporter {
    fn export(&self, batch: &BatchResult) -> Result<()>;
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Text,
    Html,
}

/// Per-image output file name. Built from the whole file name, extension
/// included, so `chat.png` and `chat.jpg` do not share a file.
pub(crate) fn per_image_file(image: &str, suffix: &str) -> String {
    let name = std::path::Path::new(image)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| image.to_string());
    format!("{name}.{suffix}")
}
