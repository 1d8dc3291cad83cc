// Text canonicalization used by every comparison in the crate.
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Canonicalizes text for comparison: trims, lowercases, decomposes
/// accented characters (NFD) and drops the combining marks, so that
/// "Descripción" and "descripcion" compare equal.
///
/// Pure and idempotent; empty input yields an empty string.
pub fn normalize(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Keeps only the ASCII digits of `text`, in order.
pub fn digits_only(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}
