use thiserror::Error;

use crate::core::model::{PhoneNumber, MAX_CANONICAL_DIGITS, MIN_CANONICAL_DIGITS};

const MIN_RAW_DIGITS: usize = 8;
const MAX_RAW_DIGITS: usize = 15;
/// Length of a domestic number written with its trunk `0`, e.g. `0501234567`.
const LOCAL_NUMBER_LEN: usize = 10;
const INTERNATIONAL_MIN_DIGITS: usize = 10;

/// Country calling code of the region local numbers are assumed to belong to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegionPrefix {
    country_code: String,
}

impl RegionPrefix {
    /// Parses `+` followed by a 1-3 digit calling code, e.g. `+966`.
    pub fn parse(value: &str) -> Option<Self> {
        let code = value.trim().strip_prefix('+')?;
        let valid = (1..=3).contains(&code.len())
            && code.bytes().all(|b| b.is_ascii_digit())
            && !code.starts_with('0');
        valid.then(|| Self {
            country_code: code.to_string(),
        })
    }

    /// The calling code without the `+`.
    pub fn country_code(&self) -> &str {
        &self.country_code
    }
}

impl Default for RegionPrefix {
    fn default() -> Self {
        Self {
            country_code: "966".to_string(),
        }
    }
}

/// Why a candidate did not become a [`PhoneNumber`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("no digits")]
    Empty,
    #[error("unexpected character {0:?}")]
    InvalidCharacter(char),
    #[error("{0} digits is too short for a phone number")]
    TooShort(usize),
    #[error("{0} digits is too long for a phone number")]
    TooLong(usize),
    #[error("all digits are zero")]
    AllZeros,
    #[error("no country code and too short to assume one")]
    Ambiguous,
    #[error("canonical form would carry {0} digits")]
    OutOfRange(usize),
}

#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    region: RegionPrefix,
}

impl Normalizer {
    pub fn new(region: RegionPrefix) -> Self {
        Self { region }
    }

    /// Rewrite a raw digit/separator string into canonical `+<digits>` form.
    pub fn normalize(&self, raw: &str) -> Result<PhoneNumber, Rejection> {
        let compact: String = raw
            .chars()
            .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
            .collect();
        let (has_plus, digits) = match compact.strip_prefix('+') {
            Some(rest) => (true, rest),
            None => (false, compact.as_str()),
        };

        if digits.is_empty() {
            return Err(Rejection::Empty);
        }
        if let Some(bad) = digits.chars().find(|c| !c.is_ascii_digit()) {
            return Err(Rejection::InvalidCharacter(bad));
        }
        let len = digits.len();
        if len < MIN_RAW_DIGITS {
            return Err(Rejection::TooShort(len));
        }
        if len > MAX_RAW_DIGITS {
            return Err(Rejection::TooLong(len));
        }
        if digits.bytes().all(|b| b == b'0') {
            return Err(Rejection::AllZeros);
        }

        let canonical = if has_plus {
            format!("+{digits}")
        } else if let Some(rest) = digits.strip_prefix("00") {
            format!("+{rest}")
        } else if digits.starts_with('0') && len == LOCAL_NUMBER_LEN {
            format!("+{}{}", self.region.country_code(), &digits[1..])
        } else if digits.starts_with(self.region.country_code()) {
            format!("+{digits}")
        } else if len >= INTERNATIONAL_MIN_DIGITS {
            // Known false-positive source: a long local number without its
            // trunk prefix is taken as international here.
            format!("+{digits}")
        } else {
            return Err(Rejection::Ambiguous);
        };

        let canonical_digits = canonical.len() - 1;
        if !(MIN_CANONICAL_DIGITS..=MAX_CANONICAL_DIGITS).contains(&canonical_digits) {
            return Err(Rejection::OutOfRange(canonical_digits));
        }
        Ok(PhoneNumber::from_canonical(canonical))
    }
}
