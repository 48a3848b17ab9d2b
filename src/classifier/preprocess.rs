//! Text normalisation shared by live queries, keyword tables and model training.

use std::sync::LazyLock;

use regex::Regex;

/// Unicode decimal digits (`Nd`); other numeric characters such as `½` are kept.
static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("digit pattern is valid"));

/// Sentence delimiters used in Devanagari text.
const DEVANAGARI_PUNCTUATION: [char; 2] = ['\u{0964}', '\u{0965}'];

/// Lowercases, strips digits and punctuation, and collapses whitespace.
///
/// Punctuation is removed without inserting a space, so `"e-mail"` becomes `"email"`.
pub fn preprocess(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped: String = DIGITS
        .replace_all(&lowered, "")
        .chars()
        .filter(|c| !c.is_ascii_punctuation() && !DEVANAGARI_PUNCTUATION.contains(c))
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Splits preprocessed text into model tokens (runs of at least two characters).
pub fn tokenize(normalized: &str) -> impl Iterator<Item = &str> {
    normalized
        .split_whitespace()
        .filter(|token| token.chars().nth(1).is_some())
}
