use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;

/// A clock time not glued to other digits; letters may touch it.
static CLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^0-9])([0-9]{1,2}:[0-9]{2})(?:[^0-9]|$)").unwrap()
});
static BARE_CLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{1,2}:[0-9]{2}$").unwrap());

pub(crate) fn is_bare_clock(text: &str) -> bool {
    BARE_CLOCK_RE.is_match(text.trim())
}

/// Finds the conversation timestamp in a transcript. Rules are tried in
/// order and the first hit wins: weekday + time, weekday, time, relative
/// phrase.
#[derive(Debug, Clone)]
pub struct TimestampMatcher {
    weekday_time: Option<Regex>,
    weekday: Option<Regex>,
    relative: Vec<Regex>,
}

impl TimestampMatcher {
    pub fn new(weekdays: &[String], relative_patterns: &[String]) -> Result<Self> {
        let (weekday_time, weekday) = match weekday_alternation(weekdays) {
            Some(alternation) => (
                Some(Regex::new(&format!(
                    r"(?i)\b({alternation})[\s,]*([0-9]{{1,2}}:[0-9]{{2}})(?:[^0-9]|$)"
                ))?),
                Some(Regex::new(&format!(
                    r"(?i)\b({alternation})(?:[^\p{{L}}\p{{M}}]|$)"
                ))?),
            ),
            None => (None, None),
        };

        let relative = relative_patterns
            .iter()
            .map(|pattern| {
                Regex::new(pattern)
                    .with_context(|| format!("invalid relative-time pattern {pattern:?}"))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            weekday_time,
            weekday,
            relative,
        })
    }

    pub fn find(&self, text: &str) -> Option<String> {
        if let Some(caps) = self.weekday_time.as_ref().and_then(|re| re.captures(text)) {
            return Some(format!("{} {}", &caps[1], &caps[2]));
        }
        if let Some(caps) = self.weekday.as_ref().and_then(|re| re.captures(text)) {
            return Some(caps[1].to_string());
        }
        if let Some(caps) = CLOCK_RE.captures(text) {
            return Some(caps[1].to_string());
        }
        self.relative
            .iter()
            .find_map(|re| re.find(text))
            .map(|m| m.as_str().to_string())
    }
}

/// Longest names first so a name that prefixes another cannot shadow it.
fn weekday_alternation(weekdays: &[String]) -> Option<String> {
    let mut names: Vec<&str> = weekdays
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .collect();
    if names.is_empty() {
        return None;
    }
    names.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
    names.dedup();
    Some(
        names
            .iter()
            .map(|name| regex::escape(name))
            .collect::<Vec<_>>()
            .join("|"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LocaleVocabulary;
    use pretty_assertions::assert_eq;

    fn matcher() -> TimestampMatcher {
        let locale = LocaleVocabulary::default();
        TimestampMatcher::new(&locale.weekdays, &locale.relative_time).unwrap()
    }

    #[test]
    fn weekday_followed_by_time_is_joined() {
        let m = matcher();
        assert_eq!(m.find("Ahmed Tuesday 14:05 hi"), Some("Tuesday 14:05".to_string()));
        assert_eq!(m.find("Ahmed tuesday, 9:41"), Some("tuesday 9:41".to_string()));
        assert_eq!(m.find("سارة الخميس 10:15"), Some("الخميس 10:15".to_string()));
    }

    #[test]
    fn rule_priority() {
        let m = matcher();
        // A weekday anywhere beats a lone time elsewhere.
        assert_eq!(m.find("08:00 seen Friday"), Some("Friday".to_string()));
        assert_eq!(m.find("last seen 23:59"), Some("23:59".to_string()));
        assert_eq!(m.find("آخر ظهور منذ 3 ساعات"), Some("منذ 3 ساعات".to_string()));
        assert_eq!(m.find("no time here"), None);
    }

    #[test]
    fn weekday_must_be_a_whole_word() {
        assert_eq!(matcher().find("Sundays are quiet"), None);
    }

    #[test]
    fn missing_space_before_time_still_matches() {
        let m = matcher();
        assert_eq!(m.find("Sunday10:30"), Some("Sunday 10:30".to_string()));
        assert_eq!(m.find("seen10:30"), Some("10:30".to_string()));
        assert_eq!(m.find("الخميس10:15"), Some("الخميس 10:15".to_string()));
    }

    #[test]
    fn time_glued_to_other_digits_is_ignored() {
        let m = matcher();
        assert_eq!(m.find("ref 123:45"), None);
        assert_eq!(m.find("ref 10:305"), None);
    }

    #[test]
    fn bad_relative_pattern_is_reported() {
        let err = TimestampMatcher::new(&[], &["(unclosed".to_string()]).unwrap_err();
        assert!(err.to_string().contains("relative-time"));
    }

    #[test]
    fn empty_vocabulary_still_finds_times() {
        let m = TimestampMatcher::new(&[], &[]).unwrap();
        assert_eq!(m.find("Monday 10:30"), Some("10:30".to_string()));
    }

    #[test]
    fn bare_clock_detection() {
        assert!(is_bare_clock(" 14:05 "));
        assert!(!is_bare_clock("14:05 pm"));
        assert!(!is_bare_clock("Tuesday"));
    }
}
