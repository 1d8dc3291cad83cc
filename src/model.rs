// Core structs: ProductRow, ProductCatalog + error types
use std::collections::HashMap;

use thiserror::Error;

use crate::columns::{ColumnMap, LogicalField, build_column_map};
use crate::enricher::enrich_rows;

/// One decoded sheet row: cell text keyed by raw header. Every known
/// header is present, a missing cell holds an empty string.
pub type RawRow = HashMap<String, String>;

/// A catalog row plus its precomputed search blob.
#[derive(Debug, Clone)]
pub struct ProductRow {
    pub cells: RawRow,
    /// Normalized concatenation of all cell values in header order.
    /// Recomputed on every install and restore, never persisted.
    pub search_blob: String,
}

impl ProductRow {
    /// Raw cell text under `header`, trimmed. Empty if the header is
    /// unknown to this row.
    pub fn cell(&self, header: &str) -> &str {
        self.cells.get(header).map(String::as_str).unwrap_or("").trim()
    }
}

/// The full loaded dataset: rows, original headers and the resolved
/// column map. Owned by the main loop; replaced wholesale on each
/// successful load, emptied by the clear command.
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    pub headers: Vec<String>,
    pub col_map: ColumnMap,
    pub rows: Vec<ProductRow>,
}

impl ProductCatalog {
    /// Builds a catalog from a freshly decoded sheet: resolves the
    /// column map against the headers and enriches every row.
    pub fn install(headers: Vec<String>, raw_rows: Vec<RawRow>) -> Self {
        let col_map = build_column_map(&headers);
        let rows = enrich_rows(raw_rows, &headers);
        Self { headers, col_map, rows }
    }

    /// Rebuilds a catalog from persisted state. The column map was
    /// saved alongside the rows, so no re-matching happens here; only
    /// the search blobs are re-derived.
    pub fn restore(headers: Vec<String>, col_map: ColumnMap, raw_rows: Vec<RawRow>) -> Self {
        let rows = enrich_rows(raw_rows, &headers);
        Self { headers, col_map, rows }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Value of a logical field for `row`, trimmed. Empty when the
    /// field is unmapped or the cell is blank; never an error.
    pub fn field<'a>(&self, row: &'a ProductRow, field: LogicalField) -> &'a str {
        match self.col_map.header(field) {
            Some(header) => row.cell(header),
            None => "",
        }
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unsupported format '{0}': use .csv or .xlsx")]
    Unsupported(String),
    #[error("the file contains no data rows")]
    EmptySheet,
    #[error("read error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
    #[error("XLSX parse error: {0}")]
    Xlsx(#[from] calamine::XlsxError),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> RawRow {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn install_maps_columns_and_enriches() {
        let headers = vec!["EAN".to_string(), "Nombre".to_string()];
        let rows = vec![raw(&[("EAN", "4006381333931"), ("Nombre", "Lápiz STABILO")])];
        let catalog = ProductCatalog::install(headers, rows);

        assert_eq!(catalog.len(), 1);
        let row = &catalog.rows[0];
        assert_eq!(catalog.field(row, LogicalField::Ean), "4006381333931");
        assert_eq!(row.search_blob, "4006381333931 lapiz stabilo");
    }

    #[test]
    fn unmapped_field_reads_as_empty() {
        let headers = vec!["Nombre".to_string()];
        let rows = vec![raw(&[("Nombre", "Tornillo")])];
        let catalog = ProductCatalog::install(headers, rows);
        assert_eq!(catalog.field(&catalog.rows[0], LogicalField::Ean), "");
    }

    #[test]
    fn clear_returns_to_first_run_state() {
        let headers = vec!["Nombre".to_string()];
        let rows = vec![raw(&[("Nombre", "Tornillo")])];
        let mut catalog = ProductCatalog::install(headers, rows);
        catalog.clear();
        assert!(catalog.is_empty());
        assert!(catalog.headers.is_empty());
    }
}
