use std::collections::HashSet;

use crate::columns::LogicalField;
use crate::model::{ProductCatalog, ProductRow};
use crate::normalizer::{digits_only, normalize};

/// Characters of blob used as the identity key of last resort.
const BLOB_KEY_LEN: usize = 120;

/// Collapses rows that represent the same product, first occurrence
/// wins, order preserved.
///
/// The identity key is the first non-empty of: digit-stripped EAN,
/// part number, digit-stripped 11-digit reference, quick ID, then a
/// prefix of the search blob. Rows where every candidate is empty are
/// dropped outright so a sheet of blank lines cannot flood the result.
pub fn dedupe_rows<'a>(
    rows: Vec<&'a ProductRow>,
    catalog: &ProductCatalog,
) -> Vec<&'a ProductRow> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for row in rows {
        let Some(key) = identity_key(row, catalog) else {
            continue;
        };
        if seen.insert(key) {
            out.push(row);
        }
    }
    out
}

fn identity_key(row: &ProductRow, catalog: &ProductCatalog) -> Option<String> {
    let candidates = [
        digits_only(&normalize(catalog.field(row, LogicalField::Ean))),
        normalize(catalog.field(row, LogicalField::Part)),
        digits_only(&normalize(catalog.field(row, LogicalField::Ref11))),
        normalize(catalog.field(row, LogicalField::Rapid)),
        row.search_blob.chars().take(BLOB_KEY_LEN).collect(),
    ];
    candidates.into_iter().find(|k| !k.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawRow;

    fn catalog(headers: &[&str], rows: &[&[(&str, &str)]]) -> ProductCatalog {
        let headers: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
        let raw: Vec<RawRow> = rows
            .iter()
            .map(|r| r.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
            .collect();
        ProductCatalog::install(headers, raw)
    }

    fn dedupe(cat: &ProductCatalog) -> Vec<&ProductRow> {
        dedupe_rows(cat.rows.iter().collect(), cat)
    }

    #[test]
    fn same_ean_collapses_to_first_even_with_different_part() {
        let cat = catalog(
            &["EAN", "Part Number"],
            &[
                &[("EAN", "4006381333931"), ("Part Number", "A-1")],
                &[("EAN", "4006381333931"), ("Part Number", "B-2")],
            ],
        );
        let out = dedupe(&cat);
        assert_eq!(out.len(), 1);
        assert_eq!(cat.field(out[0], LogicalField::Part), "A-1");
    }

    #[test]
    fn part_number_is_the_key_when_ean_is_empty() {
        let cat = catalog(
            &["EAN", "Part Number", "Nombre"],
            &[
                &[("EAN", ""), ("Part Number", "MX-500"), ("Nombre", "Uno")],
                &[("EAN", ""), ("Part Number", "mx-500"), ("Nombre", "Dos")],
            ],
        );
        let out = dedupe(&cat);
        assert_eq!(out.len(), 1);
        assert_eq!(cat.field(out[0], LogicalField::Nombre), "Uno");
    }

    #[test]
    fn ean_separators_do_not_defeat_dedupe() {
        let cat = catalog(
            &["EAN"],
            &[&[("EAN", "4006381333931")], &[("EAN", "4006-381-333931")]],
        );
        assert_eq!(dedupe(&cat).len(), 1);
    }

    #[test]
    fn blob_prefix_is_the_last_resort_key() {
        let cat = catalog(
            &["Columna"],
            &[&[("Columna", "misma cosa")], &[("Columna", "Misma   cosa")]],
        );
        // No identity columns mapped; first blob differs from second
        // ("misma cosa" vs "misma   cosa"), so both survive.
        assert_eq!(dedupe(&cat).len(), 2);

        let cat = catalog(
            &["Columna"],
            &[&[("Columna", "misma cosa")], &[("Columna", " Misma cosa ")]],
        );
        assert_eq!(dedupe(&cat).len(), 1);
    }

    #[test]
    fn fully_blank_rows_are_dropped() {
        let cat = catalog(
            &["EAN", "Nombre"],
            &[
                &[("EAN", ""), ("Nombre", "")],
                &[("EAN", ""), ("Nombre", "")],
                &[("EAN", ""), ("Nombre", "Real")],
            ],
        );
        let out = dedupe(&cat);
        assert_eq!(out.len(), 1);
        assert_eq!(cat.field(out[0], LogicalField::Nombre), "Real");
    }

    #[test]
    fn order_of_survivors_is_original_order() {
        let cat = catalog(
            &["EAN"],
            &[
                &[("EAN", "111")],
                &[("EAN", "222")],
                &[("EAN", "111")],
                &[("EAN", "333")],
            ],
        );
        let keys: Vec<&str> = dedupe(&cat)
            .iter()
            .map(|r| cat.field(r, LogicalField::Ean))
            .collect();
        assert_eq!(keys, vec!["111", "222", "333"]);
    }
}
