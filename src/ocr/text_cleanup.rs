//! Cleanup applied to every OCR fragment before classification.
//!
//! NFKC folds Arabic presentation forms back to base letters. Arabic-Indic
//! digits are rewritten as ASCII so the phone patterns can see them.

use unicode_normalization::UnicodeNormalization;

fn fold_digit(c: char) -> char {
    match c {
        '\u{0660}'..='\u{0669}' => char::from(b'0' + (c as u32 - 0x0660) as u8),
        '\u{06F0}'..='\u{06F9}' => char::from(b'0' + (c as u32 - 0x06F0) as u8),
        _ => c,
    }
}

fn is_direction_mark(c: char) -> bool {
    matches!(
        c,
        '\u{200B}'..='\u{200F}' | '\u{202A}'..='\u{202E}' | '\u{2066}'..='\u{2069}' | '\u{061C}' | '\u{FEFF}'
    )
}

pub fn clean_text(text: &str) -> String {
    let folded: String = text
        .nfkc()
        .filter(|c| !is_direction_mark(*c))
        .map(fold_digit)
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}
