use tracing::trace;

use crate::classify::timestamp::is_bare_clock;
use crate::config::ExtractionConfig;
use crate::core::model::Detection;

const MIN_NAME_CHARS: usize = 3;
const EMOJI_VARIATION_SELECTOR: char = '\u{fe0f}';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    PhoneFragment,
    Weekday,
    Clock,
    TooShort,
    UiChrome,
    Checkmarks,
}

/// Decides which header-band lines can be the contact name.
#[derive(Debug, Clone)]
pub struct HeaderFilter {
    band: usize,
    max_names: usize,
    max_digits: usize,
    weekdays: Vec<String>,
    ui_chrome: Vec<String>,
    checkmarks: Vec<char>,
}

impl HeaderFilter {
    pub fn new(config: &ExtractionConfig) -> Self {
        let lower = |words: &[String]| {
            words
                .iter()
                .map(|w| w.trim().to_lowercase())
                .collect::<Vec<_>>()
        };
        Self {
            band: config.header_band,
            max_names: config.max_names,
            max_digits: config.max_name_digits,
            weekdays: lower(&config.locale.weekdays),
            ui_chrome: lower(&config.locale.ui_chrome),
            checkmarks: config.locale.checkmarks.chars().collect(),
        }
    }

    pub fn skip_reason(&self, text: &str) -> Option<SkipReason> {
        let trimmed = text.trim();
        let lowered = trimmed.to_lowercase();

        if trimmed.chars().filter(char::is_ascii_digit).count() > self.max_digits {
            Some(SkipReason::PhoneFragment)
        } else if self.weekdays.contains(&lowered) {
            Some(SkipReason::Weekday)
        } else if is_bare_clock(trimmed) {
            Some(SkipReason::Clock)
        } else if trimmed.chars().count() < MIN_NAME_CHARS {
            Some(SkipReason::TooShort)
        } else if self.ui_chrome.contains(&lowered) {
            Some(SkipReason::UiChrome)
        } else if trimmed.chars().all(|c| {
            self.checkmarks.contains(&c) || c == EMOJI_VARIATION_SELECTOR || c.is_whitespace()
        }) {
            Some(SkipReason::Checkmarks)
        } else {
            None
        }
    }

    /// Indices (into `sorted`) of the detections taken as names. Only the
    /// header band is examined and scanning stops once `max_names` are found.
    pub fn pick(&self, sorted: &[&Detection]) -> Vec<usize> {
        let mut picked = Vec::new();
        for (idx, detection) in sorted.iter().take(self.band).enumerate() {
            if picked.len() >= self.max_names {
                break;
            }
            match self.skip_reason(&detection.text) {
                Some(reason) => trace!(text = %detection.text, ?reason, "header line skipped"),
                None => picked.push(idx),
            }
        }
        picked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn filter() -> HeaderFilter {
        HeaderFilter::new(&ExtractionConfig::default())
    }

    #[test]
    fn skip_reasons() {
        let f = filter();
        assert_eq!(f.skip_reason("+966 55 111"), Some(SkipReason::PhoneFragment));
        assert_eq!(f.skip_reason("TUESDAY"), Some(SkipReason::Weekday));
        assert_eq!(f.skip_reason("الجمعة"), Some(SkipReason::Weekday));
        assert_eq!(f.skip_reason("14:05"), Some(SkipReason::Clock));
        assert_eq!(f.skip_reason(" <  "), Some(SkipReason::TooShort));
        assert_eq!(f.skip_reason("Search"), Some(SkipReason::UiChrome));
        assert_eq!(f.skip_reason("✓✓✓"), Some(SkipReason::Checkmarks));
        assert_eq!(f.skip_reason("✔\u{fe0f} ✔\u{fe0f}"), Some(SkipReason::Checkmarks));
        assert_eq!(f.skip_reason("Ahmed"), None);
        assert_eq!(f.skip_reason("أبو خالد"), None);
        // Five digits is still allowed in a name line.
        assert_eq!(f.skip_reason("Shop 12345"), None);
    }

    #[test]
    fn picks_first_surviving_line_in_band() {
        let lines = ["Back", "✓✓", "Edit", "Ahmed", "Khalid"];
        let detections: Vec<Detection> = lines
            .iter()
            .enumerate()
            .map(|(i, t)| Detection::new(*t, 0.9, i as f32))
            .collect();
        let sorted: Vec<&Detection> = detections.iter().collect();
        assert_eq!(filter().pick(&sorted), vec![3]);
    }

    #[test]
    fn nothing_beyond_the_band_is_considered() {
        let lines = ["Back", "Edit", "Call", "Video", "Search", "Ahmed"];
        let detections: Vec<Detection> = lines
            .iter()
            .enumerate()
            .map(|(i, t)| Detection::new(*t, 0.9, i as f32))
            .collect();
        let sorted: Vec<&Detection> = detections.iter().collect();
        assert!(filter().pick(&sorted).is_empty());
    }
}
