//! Phone candidate scanning over a whole OCR transcript.
//!
//! OCR regularly drops or doubles the separators inside a number, so several
//! overlapping pattern families run side by side and the normalizer decides
//! which candidates survive. Duplicates collapse on the canonical form.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::core::model::PhoneNumber;
use crate::phone::normalize::Normalizer;

/// `+` country code, then up to four short groups.
static INTERNATIONAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\+[0-9]{1,3}(?:[\s\-]?[0-9]{1,4}){1,4}").unwrap());
/// Four grouped digit blocks without a sign. Anchored; applied at digit-run starts.
static GROUPED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{1,3}[\s\-]?[0-9]{2,4}[\s\-]?[0-9]{2,4}[\s\-]?[0-9]{2,4}").unwrap()
});
/// Domestic layout: optional `(0xx)` trunk group then two blocks of 3-4 digits.
static LOCAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\(?0[0-9]{0,3}\)?[\s\-]?)?[0-9]{3,4}[\s\-]?[0-9]{3,4}").unwrap()
});
static BARE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{10,15}").unwrap());

#[derive(Debug, Clone, Default)]
pub struct Scanner {
    normalizer: Normalizer,
}

impl Scanner {
    pub fn new(normalizer: Normalizer) -> Self {
        Self { normalizer }
    }

    /// Raw candidate substrings, pattern family by pattern family.
    pub fn candidates<'t>(&self, text: &'t str) -> Vec<&'t str> {
        let mut found: Vec<&str> = INTERNATIONAL_RE
            .find_iter(text)
            .map(|m| m.as_str())
            .collect();
        found.extend(bounded_matches(&GROUPED_RE, text, false));
        found.extend(bounded_matches(&LOCAL_RE, text, true));
        found.extend(bounded_matches(&BARE_RUN_RE, text, false));
        found
    }

    /// Every plausible phone number in `text`, deduplicated and in ascending
    /// canonical order. Candidates the normalizer rejects are dropped.
    pub fn scan(&self, text: &str) -> BTreeSet<PhoneNumber> {
        let mut numbers = BTreeSet::new();
        for candidate in self.candidates(text) {
            match self.normalizer.normalize(candidate) {
                Ok(number) => {
                    numbers.insert(number);
                }
                Err(reason) => trace!(candidate, %reason, "dropped phone candidate"),
            }
        }
        numbers
    }
}

/// Matches of an `^`-anchored pattern tried at the start of every digit run
/// (and at `(` when `allow_paren` is set). A match is kept only if it does not
/// stop in the middle of a longer digit run. Kept matches never overlap.
fn bounded_matches<'t>(re: &Regex, text: &'t str, allow_paren: bool) -> Vec<&'t str> {
    let mut matches = Vec::new();
    let mut prev: Option<char> = None;
    let mut resume_at = 0;

    for (idx, ch) in text.char_indices() {
        let starts_run = (ch.is_ascii_digit() || (allow_paren && ch == '('))
            && !prev.is_some_and(|p| p.is_ascii_digit());
        prev = Some(ch);
        if !starts_run || idx < resume_at {
            continue;
        }

        let Some(m) = re.find(&text[idx..]) else {
            continue;
        };
        let end = idx + m.end();
        let cut_mid_run = text[end..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit());
        if !cut_mid_run {
            matches.push(&text[idx..end]);
            resume_at = end;
        }
    }

    matches
}
