use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};

use crate::columns::ColumnMap;
use crate::model::{RawRow, StorageError};

/// Catalog state as it sits on disk: headers, the resolved column map
/// and the raw rows. Search blobs are never stored; the caller
/// re-derives them after a load.
pub struct PersistedCatalog {
    pub headers: Vec<String>,
    pub col_map: ColumnMap,
    pub raw_rows: Vec<RawRow>,
    pub saved_at: Option<DateTime<Utc>>,
}

/// Local SQLite cache so a restart does not need the sheet again.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    pub fn new(db_path: &str) -> Result<Self, StorageError> {
        let conn = Connection::open(db_path)?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS catalog_meta (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                headers TEXT NOT NULL,
                col_map TEXT NOT NULL,
                saved_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS catalog_rows (
                pos INTEGER PRIMARY KEY,
                cells TEXT NOT NULL
            );
            ",
        )?;

        Ok(Self { conn })
    }

    /// Replaces the stored catalog in one transaction. Rows are kept
    /// in catalog order via their position.
    pub fn save_catalog<'a>(
        &mut self,
        headers: &[String],
        col_map: &ColumnMap,
        raw_rows: impl Iterator<Item = &'a RawRow>,
    ) -> Result<(), StorageError> {
        let tx = self.conn.transaction()?;

        tx.execute("DELETE FROM catalog_meta", [])?;
        tx.execute("DELETE FROM catalog_rows", [])?;

        tx.execute(
            "INSERT INTO catalog_meta (id, headers, col_map, saved_at) VALUES (1, ?1, ?2, ?3)",
            params![
                serde_json::to_string(headers)?,
                serde_json::to_string(col_map)?,
                Utc::now().to_rfc3339(),
            ],
        )?;

        for (pos, row) in raw_rows.enumerate() {
            tx.execute(
                "INSERT INTO catalog_rows (pos, cells) VALUES (?1, ?2)",
                params![pos as i64, serde_json::to_string(row)?],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    /// Loads the stored catalog, or `None` on a first run.
    pub fn load_catalog(&self) -> Result<Option<PersistedCatalog>, StorageError> {
        let meta: Option<(String, String, String)> = self
            .conn
            .query_row(
                "SELECT headers, col_map, saved_at FROM catalog_meta WHERE id = 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        let Some((headers_json, col_map_json, saved_at)) = meta else {
            return Ok(None);
        };

        let headers: Vec<String> = serde_json::from_str(&headers_json)?;
        let col_map: ColumnMap = serde_json::from_str(&col_map_json)?;

        let mut stmt = self
            .conn
            .prepare("SELECT cells FROM catalog_rows ORDER BY pos")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut raw_rows = Vec::new();
        for cells_json in rows {
            raw_rows.push(serde_json::from_str(&cells_json?)?);
        }

        Ok(Some(PersistedCatalog {
            headers,
            col_map,
            raw_rows,
            saved_at: parse_saved_at(&saved_at),
        }))
    }

    /// Purges the cache; the next startup is a first run again.
    pub fn clear_catalog(&self) -> Result<(), StorageError> {
        self.conn.execute("DELETE FROM catalog_meta", [])?;
        self.conn.execute("DELETE FROM catalog_rows", [])?;
        Ok(())
    }
}

fn parse_saved_at(text: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ProductCatalog;

    fn memory_storage() -> SqliteStorage {
        SqliteStorage::new(":memory:").unwrap()
    }

    fn sample_catalog() -> ProductCatalog {
        let headers = vec!["EAN".to_string(), "Descripción".to_string()];
        let raw: Vec<RawRow> = vec![
            [("EAN", "4006381333931"), ("Descripción", "Lápiz Rojo")],
            [("EAN", "7501031311309"), ("Descripción", "Cinta métrica")],
        ]
        .into_iter()
        .map(|r| r.into_iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
        .collect();
        ProductCatalog::install(headers, raw)
    }

    fn save(storage: &mut SqliteStorage, catalog: &ProductCatalog) {
        storage
            .save_catalog(
                &catalog.headers,
                &catalog.col_map,
                catalog.rows.iter().map(|r| &r.cells),
            )
            .unwrap();
    }

    #[test]
    fn first_run_loads_nothing() {
        let storage = memory_storage();
        assert!(storage.load_catalog().unwrap().is_none());
    }

    #[test]
    fn round_trip_restores_identical_blobs() {
        let mut storage = memory_storage();
        let catalog = sample_catalog();
        save(&mut storage, &catalog);

        let persisted = storage.load_catalog().unwrap().unwrap();
        assert!(persisted.saved_at.is_some());
        let restored =
            ProductCatalog::restore(persisted.headers, persisted.col_map, persisted.raw_rows);

        assert_eq!(restored.len(), catalog.len());
        for (a, b) in restored.rows.iter().zip(catalog.rows.iter()) {
            assert_eq!(a.search_blob, b.search_blob);
            assert_eq!(a.cells, b.cells);
        }
    }

    #[test]
    fn save_replaces_the_previous_catalog_in_full() {
        let mut storage = memory_storage();
        save(&mut storage, &sample_catalog());

        let smaller = ProductCatalog::install(
            vec!["Nombre".to_string()],
            vec![[("Nombre".to_string(), "Único".to_string())].into_iter().collect()],
        );
        save(&mut storage, &smaller);

        let persisted = storage.load_catalog().unwrap().unwrap();
        assert_eq!(persisted.headers, vec!["Nombre"]);
        assert_eq!(persisted.raw_rows.len(), 1);
    }

    #[test]
    fn clear_leaves_nothing_to_load() {
        let mut storage = memory_storage();
        save(&mut storage, &sample_catalog());
        storage.clear_catalog().unwrap();
        assert!(storage.load_catalog().unwrap().is_none());
    }
}
