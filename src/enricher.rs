// Derives the per-row search blob at install and restore time.
use crate::model::{ProductRow, RawRow};
use crate::normalizer::normalize;

/// Attaches the derived search blob to every raw row. The blob is the
/// normalized space-join of the row's cell values in header order, so
/// a later query only needs substring checks against one string.
pub fn enrich_rows(raw_rows: Vec<RawRow>, headers: &[String]) -> Vec<ProductRow> {
    raw_rows
        .into_iter()
        .map(|cells| {
            let search_blob = compute_search_blob(&cells, headers);
            ProductRow { cells, search_blob }
        })
        .collect()
}

fn compute_search_blob(cells: &RawRow, headers: &[String]) -> String {
    let joined = headers
        .iter()
        .map(|h| cells.get(h).map(String::as_str).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(" ");
    normalize(&joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> RawRow {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn blob_joins_cells_in_header_order() {
        let headers = vec!["B".to_string(), "A".to_string()];
        let rows = enrich_rows(vec![raw(&[("A", "segundo"), ("B", "Primero")])], &headers);
        assert_eq!(rows[0].search_blob, "primero segundo");
    }

    #[test]
    fn blob_is_normalized() {
        let headers = vec!["Nombre".to_string()];
        let rows = enrich_rows(vec![raw(&[("Nombre", "  Ratón Inalámbrico ")])], &headers);
        assert_eq!(rows[0].search_blob, "raton inalambrico");
    }

    #[test]
    fn all_empty_cells_yield_empty_blob() {
        let headers = vec!["A".to_string(), "B".to_string()];
        let rows = enrich_rows(vec![raw(&[("A", ""), ("B", "")])], &headers);
        assert_eq!(rows[0].search_blob, "");
    }
}
