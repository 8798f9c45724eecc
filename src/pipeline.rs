use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::assemble::RecordAssembler;
use crate::config::ExtractionConfig;
use crate::core::model::{BatchResult, ImageFailure, ImageRecord};
use crate::export::html_report_export::HtmlReportExporter;
use crate::export::json_export::JsonExporter;
use crate::export::text_export::TextExporter;
use crate::export::{ExportFormat, Exporter};
use crate::ocr::OcrEngine;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "bmp"];

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
    pub extraction: ExtractionConfig,
    pub formats: Vec<ExportFormat>,
}

impl PipelineConfig {
    pub fn new(inputs: Vec<PathBuf>, output: PathBuf) -> Self {
        Self {
            inputs,
            output,
            extraction: ExtractionConfig::default(),
            formats: vec![ExportFormat::Json, ExportFormat::Text, ExportFormat::Html],
        }
    }

    pub fn with_extraction(mut self, extraction: ExtractionConfig) -> Self {
        self.extraction = extraction;
        self
    }

    pub fn with_formats(mut self, formats: Vec<ExportFormat>) -> Self {
        self.formats = formats;
        self
    }
}

/// Collect, extract and export in one go. OCR failures on single images do
/// not abort the batch; they end up in [`BatchResult::failures`].
pub fn run(config: &PipelineConfig, engine: &dyn OcrEngine) -> Result<BatchResult> {
    let assembler = RecordAssembler::new(&config.extraction)?;
    let images = collect_images(&config.inputs)?;
    let batch = run_batch(&images, engine, &assembler);
    export_batch(&batch, &config.output, &config.formats)?;
    Ok(batch)
}

/// Expand files and directories into a sorted, deduplicated list of images.
pub fn collect_images(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut images = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let entries = fs::read_dir(input)
                .with_context(|| format!("failed to list directory {}", input.display()))?;
            for entry in entries {
                let path = entry?.path();
                if path.is_file() && is_image(&path) {
                    images.push(path);
                }
            }
        } else if input.is_file() {
            images.push(input.clone());
        } else {
            anyhow::bail!("input does not exist: {}", input.display());
        }
    }
    images.sort();
    images.dedup();
    Ok(images)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Identifier recorded for an image: its file name.
pub fn image_id(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn extract_image(
    image: &Path,
    engine: &dyn OcrEngine,
    assembler: &RecordAssembler,
) -> Result<ImageRecord> {
    let detections = engine
        .detect(image)
        .with_context(|| format!("OCR failed for {}", image.display()))?;
    Ok(assembler.assemble(&image_id(image), &detections))
}

pub fn run_batch(
    images: &[PathBuf],
    engine: &dyn OcrEngine,
    assembler: &RecordAssembler,
) -> BatchResult {
    let mut batch = BatchResult::default();

    for (i, image) in images.iter().enumerate() {
        info!("[{}/{}] {}", i + 1, images.len(), image.display());
        match extract_image(image, engine, assembler) {
            Ok(record) => {
                debug!(
                    image = %record.image,
                    phones = record.phone_numbers.len(),
                    "image done"
                );
                batch.records.push(record);
            }
            Err(err) => {
                warn!(image = %image.display(), error = %format!("{err:#}"), "skipping image");
                batch.failures.push(ImageFailure {
                    image: image_id(image),
                    error: format!("{err:#}"),
                });
            }
        }
    }

    info!(
        images = images.len(),
        succeeded = batch.records.len(),
        failed = batch.failures.len(),
        unique_numbers = batch.unique_numbers().len(),
        "batch finished"
    );
    batch
}

pub fn export_batch(batch: &BatchResult, output: &Path, formats: &[ExportFormat]) -> Result<()> {
    for format in formats {
        let exporter: Box<dyn Exporter> = match format {
            ExportFormat::Json => Box::new(JsonExporter::new(output.to_path_buf())),
            ExportFormat::Text => Box::new(TextExporter::new(output.to_path_buf())),
            ExportFormat::Html => Box::new(HtmlReportExporter::new(output.to_path_buf())),
        };
        exporter
            .export(batch)
            .with_context(|| format!("failed to write {format:?} output to {}", output.display()))?;
    }
    Ok(())
}
