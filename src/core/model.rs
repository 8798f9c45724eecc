use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One OCR fragment. `position` is the vertical coordinate of the fragment,
/// smaller values are higher on the image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Detection {
    pub text: String,
    pub confidence: f32,
    pub position: f32,
}

impl Detection {
    pub fn new(text: impl Into<String>, confidence: f32, position: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
            position,
        }
    }
}

/// Canonical phone number: `+` followed by digits only.
///
/// The only way to obtain one is through [`crate::phone::Normalizer`] or by
/// parsing an already canonical string, so two values compare equal exactly
/// when their canonical strings do.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

pub const MIN_CANONICAL_DIGITS: usize = 8;
pub const MAX_CANONICAL_DIGITS: usize = 14;

impl PhoneNumber {
    pub(crate) fn from_canonical(canonical: String) -> Self {
        debug_assert!(Self::is_canonical(&canonical));
        Self(canonical)
    }

    /// Accepts a string that is already in canonical form.
    pub fn parse_canonical(value: &str) -> Option<Self> {
        Self::is_canonical(value).then(|| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_canonical(value: &str) -> bool {
        match value.strip_prefix('+') {
            Some(digits) => {
                (MIN_CANONICAL_DIGITS..=MAX_CANONICAL_DIGITS).contains(&digits.len())
                    && digits.bytes().all(|b| b.is_ascii_digit())
            }
            None => false,
        }
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if Self::is_canonical(&value) {
            Ok(Self(value))
        } else {
            Err(format!("not a canonical phone number: {value:?}"))
        }
    }
}

impl From<PhoneNumber> for String {
    fn from(number: PhoneNumber) -> Self {
        number.0
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldRole {
    Name,
    Timestamp,
    Phone,
    Message,
    Discard,
}

impl FieldRole {
    pub fn label(&self) -> &'static str {
        match self {
            FieldRole::Name => "name",
            FieldRole::Timestamp => "timestamp",
            FieldRole::Phone => "phone",
            FieldRole::Message => "message",
            FieldRole::Discard => "discard",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaggedDetection {
    pub detection: Detection,
    pub role: FieldRole,
}

/// Everything extracted from one screenshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageRecord {
    pub image: String,
    pub phone_numbers: Vec<PhoneNumber>,
    pub names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub messages: Vec<String>,
    pub raw_text: String,
    pub block_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_confidence: Option<f32>,
}

impl ImageRecord {
    pub fn name(&self) -> Option<&str> {
        self.names.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageFailure {
    pub image: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchResult {
    pub records: Vec<ImageRecord>,
    pub failures: Vec<ImageFailure>,
}

/// One row per (image, number) pair.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PhoneRow<'a> {
    pub image: &'a str,
    pub number: &'a PhoneNumber,
    pub name: Option<&'a str>,
    pub timestamp: Option<&'a str>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ImageSummary<'a> {
    pub image: &'a str,
    pub phone_count: usize,
    pub name_count: usize,
    pub message_count: usize,
    pub block_count: usize,
    pub mean_confidence: Option<f32>,
}

impl BatchResult {
    pub fn phone_rows(&self) -> Vec<PhoneRow<'_>> {
        self.records
            .iter()
            .flat_map(|record| {
                record.phone_numbers.iter().map(move |number| PhoneRow {
                    image: &record.image,
                    number,
                    name: record.name(),
                    timestamp: record.timestamp.as_deref(),
                })
            })
            .collect()
    }

    /// Every number seen in the batch, once, in ascending order.
    pub fn unique_numbers(&self) -> Vec<&PhoneNumber> {
        self.records
            .iter()
            .flat_map(|record| record.phone_numbers.iter())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn summaries(&self) -> Vec<ImageSummary<'_>> {
        self.records
            .iter()
            .map(|record| ImageSummary {
                image: &record.image,
                phone_count: record.phone_numbers.len(),
                name_count: record.names.len(),
                message_count: record.messages.len(),
                block_count: record.block_count,
                mean_confidence: record.mean_confidence,
            })
            .collect()
    }
}
