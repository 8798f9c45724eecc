//! Positional field classification.
//!
//! Detections are ordered top to bottom; the first few lines are the
//! conversation header and hold the contact name, the timestamp and the
//! Arabic message bodies are searched for in the whole transcript. Nothing
//! here fails: a field that cannot be found is simply absent.

pub mod header;
pub mod message;
pub mod timestamp;

use anyhow::Result;
use serde::Serialize;

use crate::config::ExtractionConfig;
use crate::core::model::{Detection, FieldRole, TaggedDetection};
use crate::phone::Scanner;

pub use header::{HeaderFilter, SkipReason};
pub use message::extract_messages;
pub use timestamp::TimestampMatcher;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Classification {
    pub names: Vec<String>,
    pub timestamp: Option<String>,
    pub messages: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct FieldClassifier {
    header: HeaderFilter,
    timestamps: TimestampMatcher,
    min_message_chars: usize,
}

impl FieldClassifier {
    /// Compiles the locale vocabulary. Fails only on an invalid
    /// relative-time pattern.
    pub fn new(config: &ExtractionConfig) -> Result<Self> {
        Ok(Self {
            header: HeaderFilter::new(config),
            timestamps: TimestampMatcher::new(
                &config.locale.weekdays,
                &config.locale.relative_time,
            )?,
            min_message_chars: config.min_message_chars,
        })
    }

    pub fn classify(&self, detections: &[Detection]) -> Classification {
        self.classify_sorted(&sort_by_position(detections))
    }

    /// Same as [`classify`](Self::classify) for detections already in
    /// position order.
    pub fn classify_sorted(&self, sorted: &[&Detection]) -> Classification {
        let text = join_text(sorted);
        let names = self
            .header
            .pick(sorted)
            .into_iter()
            .map(|idx| sorted[idx].text.trim().to_string())
            .collect();

        Classification {
            names,
            timestamp: self.timestamps.find(&text),
            messages: extract_messages(&text, self.min_message_chars),
        }
    }

    /// One role per detection, in position order. A fragment that fits more
    /// than one role takes the first of name, timestamp, phone, message.
    pub fn tag(&self, detections: &[Detection], scanner: &Scanner) -> Vec<TaggedDetection> {
        let sorted = sort_by_position(detections);
        let names = self.header.pick(&sorted);

        sorted
            .iter()
            .enumerate()
            .map(|(idx, detection)| {
                let role = if names.contains(&idx) {
                    FieldRole::Name
                } else if self.timestamps.find(&detection.text).is_some() {
                    FieldRole::Timestamp
                } else if !scanner.scan(&detection.text).is_empty() {
                    FieldRole::Phone
                } else if !extract_messages(&detection.text, self.min_message_chars).is_empty() {
                    FieldRole::Message
                } else {
                    FieldRole::Discard
                };
                TaggedDetection {
                    detection: (*detection).clone(),
                    role,
                }
            })
            .collect()
    }
}

/// Top of the image first. The sort is stable, so detections on the same
/// line keep the order the engine reported them in.
pub fn sort_by_position(detections: &[Detection]) -> Vec<&Detection> {
    let mut sorted: Vec<&Detection> = detections.iter().collect();
    sorted.sort_by(|a, b| a.position.total_cmp(&b.position));
    sorted
}

pub fn join_text(detections: &[&Detection]) -> String {
    detections
        .iter()
        .map(|d| d.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
