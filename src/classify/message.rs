use std::sync::LazyLock;

use regex::Regex;

static ARABIC_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{Arabic}\s]+").unwrap());

/// Maximal runs of Arabic script (and the whitespace between words), trimmed,
/// longer than `min_chars` characters. Document order, repeats kept.
pub fn extract_messages(text: &str, min_chars: usize) -> Vec<String> {
    ARABIC_RUN_RE
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .filter(|run| run.chars().count() > min_chars)
        .map(str::to_string)
        .collect()
}
