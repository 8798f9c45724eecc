use anyhow::Result;
use tracing::debug;

use crate::classify::{join_text, sort_by_position, FieldClassifier};
use crate::config::ExtractionConfig;
use crate::core::confidence::mean_confidence;
use crate::core::model::{Detection, ImageRecord, TaggedDetection};
use crate::phone::{Normalizer, Scanner};

/// Turns one image's detections into an [`ImageRecord`].
///
/// Built once per batch from the configuration and shared by reference; it
/// holds no per-image state.
#[derive(Debug, Clone)]
pub struct RecordAssembler {
    classifier: FieldClassifier,
    scanner: Scanner,
}

impl RecordAssembler {
    pub fn new(config: &ExtractionConfig) -> Result<Self> {
        config.validate()?;
        let normalizer = Normalizer::new(config.region()?);
        Ok(Self {
            classifier: FieldClassifier::new(config)?,
            scanner: Scanner::new(normalizer),
        })
    }

    /// An empty detection list is a valid "no text found" image and yields
    /// an empty record.
    pub fn assemble(&self, image: &str, detections: &[Detection]) -> ImageRecord {
        let sorted = sort_by_position(detections);
        let fields = self.classifier.classify_sorted(&sorted);
        let phone_numbers: Vec<_> = self.scanner.scan(&join_text(&sorted)).into_iter().collect();

        // Audit copy keeps the engine's own order.
        let raw_text = detections
            .iter()
            .map(|d| d.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        debug!(
            image,
            blocks = detections.len(),
            phones = phone_numbers.len(),
            name = fields.names.first().map(String::as_str),
            timestamp = fields.timestamp.as_deref(),
            messages = fields.messages.len(),
            "assembled record"
        );

        ImageRecord {
            image: image.to_string(),
            phone_numbers,
            names: fields.names,
            timestamp: fields.timestamp,
            messages: fields.messages,
            raw_text,
            block_count: detections.len(),
            mean_confidence: mean_confidence(detections),
        }
    }

    /// Per-detection roles, for inspecting how a screenshot was read.
    pub fn tag(&self, detections: &[Detection]) -> Vec<TaggedDetection> {
        self.classifier.tag(detections, &self.scanner)
    }
}
