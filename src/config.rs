//! Extraction settings: the default region used for local numbers and the
//! locale vocabulary the header and timestamp heuristics match against.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::phone::RegionPrefix;

pub const DEFAULT_REGION: &str = "+966";
pub const DEFAULT_HEADER_BAND: usize = 5;
pub const DEFAULT_MAX_NAMES: usize = 1;
pub const DEFAULT_MAX_NAME_DIGITS: usize = 5;
pub const DEFAULT_MIN_MESSAGE_CHARS: usize = 5;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Country prefix assumed for local-format numbers, e.g. `+966`.
    pub default_region: String,
    /// How many of the topmost detections may hold the contact name.
    pub header_band: usize,
    pub max_names: usize,
    /// Header lines with more digits than this are treated as phone fragments.
    pub max_name_digits: usize,
    /// Message runs must be strictly longer than this many characters.
    pub min_message_chars: usize,
    pub locale: LocaleVocabulary,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LocaleVocabulary {
    pub weekdays: Vec<String>,
    pub ui_chrome: Vec<String>,
    /// Glyphs that make up read receipts; a header line made only of these is skipped.
    pub checkmarks: String,
    /// Regex patterns for relative "last seen" phrases.
    pub relative_time: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            default_region: DEFAULT_REGION.to_string(),
            header_band: DEFAULT_HEADER_BAND,
            max_names: DEFAULT_MAX_NAMES,
            max_name_digits: DEFAULT_MAX_NAME_DIGITS,
            min_message_chars: DEFAULT_MIN_MESSAGE_CHARS,
            locale: LocaleVocabulary::default(),
        }
    }
}

impl Default for LocaleVocabulary {
    fn default() -> Self {
        let words = |list: &[&str]| list.iter().map(|w| w.to_string()).collect::<Vec<_>>();
        Self {
            weekdays: words(&[
                "Monday",
                "Tuesday",
                "Wednesday",
                "Thursday",
                "Friday",
                "Saturday",
                "Sunday",
                "الاثنين",
                "الإثنين",
                "الثلاثاء",
                "الأربعاء",
                "الاربعاء",
                "الخميس",
                "الجمعة",
                "السبت",
                "الأحد",
                "الاحد",
            ]),
            ui_chrome: words(&["edit", "back", "search", "call", "video"]),
            checkmarks: "✓✔✅☑√".to_string(),
            relative_time: words(&[r"(?:آخر|منذ)\s*\d+\s*(?:ساعات|ساعة|ساعتين)"]),
        }
    }
}

impl ExtractionConfig {
    /// Read a TOML config file. Keys that are absent keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: ExtractionConfig = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config TOML at: {}", path.display()))?;
        config.validate()?;
        info!(path = %path.display(), region = %config.default_region, "loaded extraction config");
        Ok(config)
    }

    /// Use `path` when given, the built-in defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                debug!("no config file given; using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.region()?;
        if self.header_band == 0 {
            anyhow::bail!("header_band must be at least 1");
        }
        if self.max_names == 0 {
            anyhow::bail!("max_names must be at least 1");
        }
        if self.locale.weekdays.iter().any(|w| w.trim().is_empty()) {
            anyhow::bail!("locale.weekdays must not contain empty entries");
        }
        Ok(())
    }

    pub fn region(&self) -> Result<RegionPrefix> {
        RegionPrefix::parse(&self.default_region)
            .with_context(|| format!("invalid default_region {:?}", self.default_region))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize config to TOML")
    }
}
