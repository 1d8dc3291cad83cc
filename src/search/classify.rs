// Decides which lookup mode a raw query gets.
use crate::normalizer::digits_only;

/// How a query is matched against the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// 4 digits: match against the tail of the EAN barcode.
    EanSuffix,
    /// 5 digits: match the barcode fragment exactly.
    BarcodeExact,
    /// Anything else: every term must appear in the row's search blob.
    FreeText,
}

/// Classifies a trimmed, non-empty query. Pure function of the query
/// string; queries that are entirely digits get the numeric quick
/// modes, everything else is free text.
pub fn classify(query: &str) -> MatchMode {
    let digits = digits_only(query);
    if digits.chars().count() == query.chars().count() {
        match digits.len() {
            4 => return MatchMode::EanSuffix,
            5 => return MatchMode::BarcodeExact,
            _ => {}
        }
    }
    MatchMode::FreeText
}
