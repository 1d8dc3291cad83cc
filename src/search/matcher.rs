use crate::columns::LogicalField;
use crate::model::{ProductCatalog, ProductRow};
use crate::normalizer::{digits_only, normalize};
use crate::search::MatchMode;

/// Runs one match mode over the catalog, preserving insertion order.
///
/// The numeric quick modes consult a single mapped column; when they
/// find nothing (including when the column is unmapped), the caller is
/// expected to retry as free text via [`free_text_matches`].
pub fn find_matches<'a>(
    query: &str,
    mode: MatchMode,
    catalog: &'a ProductCatalog,
) -> Vec<&'a ProductRow> {
    let digits = digits_only(query);

    let specialized: Vec<&ProductRow> = match mode {
        MatchMode::EanSuffix => catalog
            .rows
            .iter()
            .filter(|row| {
                let ean = digits_only(catalog.field(row, LogicalField::Ean));
                !ean.is_empty() && ean.ends_with(&digits)
            })
            .collect(),
        MatchMode::BarcodeExact => catalog
            .rows
            .iter()
            .filter(|row| {
                let barra = digits_only(catalog.field(row, LogicalField::Barra));
                !barra.is_empty() && barra == digits
            })
            .collect(),
        MatchMode::FreeText => Vec::new(),
    };

    if specialized.is_empty() {
        free_text_matches(query, catalog)
    } else {
        specialized
    }
}

/// AND-of-terms substring search over the precomputed blobs. Terms may
/// appear in any order. A query with no terms left after normalization
/// (punctuation only) matches every row.
fn free_text_matches<'a>(query: &str, catalog: &'a ProductCatalog) -> Vec<&'a ProductRow> {
    let normalized = normalize(query);
    let terms: Vec<&str> = normalized.split_whitespace().collect();

    catalog
        .rows
        .iter()
        .filter(|row| terms.iter().all(|t| row.search_blob.contains(t)))
        .collect()
}
