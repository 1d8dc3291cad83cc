mod columns;
mod config;
mod enricher;
mod model;
mod normalizer;
mod parser;
mod render;
mod search;
mod storage;

use std::io::{self, BufRead, Write};
use std::path::Path;

use tracing::{error, info, warn};

use config::load_config;
use model::ProductCatalog;
use parser::decode_file;
use search::run_query;
use storage::SqliteStorage;

fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = match load_config("config.json") {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    let mut storage = match SqliteStorage::new(&config.cache_path) {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to initialize storage: {:?}", e);
            return;
        }
    };

    // Restore the cached catalog from the last session, if any.
    let mut catalog = match storage.load_catalog() {
        Ok(Some(persisted)) => {
            let saved_at = persisted.saved_at;
            let catalog =
                ProductCatalog::restore(persisted.headers, persisted.col_map, persisted.raw_rows);
            match saved_at {
                Some(t) => info!(rows = catalog.len(), "Catalog restored from cache of {}", t),
                None => info!(rows = catalog.len(), "Catalog restored from cache"),
            }
            catalog
        }
        Ok(None) => ProductCatalog::default(),
        Err(e) => {
            warn!("Cache load failed, starting empty: {}", e);
            ProductCatalog::default()
        }
    };

    if catalog.is_empty() {
        if let Some(sheet) = &config.sheet_path {
            install_sheet(sheet, &mut catalog, &mut storage);
        }
    }

    print_status(&catalog);
    println!("Escribe una búsqueda, o :load <ruta>, :clear, :quit");

    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                error!("stdin read error: {}", e);
                break;
            }
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input.split_once(' ') {
            _ if input == ":quit" || input == ":q" => break,
            _ if input == ":clear" => clear_all(&mut catalog, &storage),
            Some((":load", path)) => install_sheet(path.trim(), &mut catalog, &mut storage),
            _ if input.starts_with(':') => {
                println!("Comandos: :load <ruta>  :clear  :quit");
            }
            _ => answer_query(input, &catalog),
        }
    }

    info!("Bye");
}

/// Decodes a sheet and replaces the catalog in full. A decode failure
/// rejects the load and leaves the previous catalog untouched; a cache
/// write failure only warns, the in-memory catalog stays authoritative.
fn install_sheet(path: &str, catalog: &mut ProductCatalog, storage: &mut SqliteStorage) {
    let sheet = match decode_file(Path::new(path)) {
        Ok(sheet) => sheet,
        Err(e) => {
            error!("Load rejected: {}", e);
            println!("No se pudo cargar: {e}");
            return;
        }
    };

    *catalog = ProductCatalog::install(sheet.headers, sheet.rows);
    info!(rows = catalog.len(), "Catalog installed from {}", path);
    println!("Datos cargados: {} filas.", catalog.len());

    if let Err(e) = storage.save_catalog(
        &catalog.headers,
        &catalog.col_map,
        catalog.rows.iter().map(|r| &r.cells),
    ) {
        warn!("Cache save failed, continuing in memory: {}", e);
    }
}

/// The clear command: back to the first-run state, cache included.
fn clear_all(catalog: &mut ProductCatalog, storage: &SqliteStorage) {
    catalog.clear();
    if let Err(e) = storage.clear_catalog() {
        warn!("Cache purge failed: {}", e);
    }
    println!("Datos borrados.");
}

fn answer_query(query: &str, catalog: &ProductCatalog) {
    if catalog.is_empty() {
        println!("Primero carga un CSV/XLSX con :load <ruta>.");
        return;
    }
    let presentation = run_query(query, catalog);
    print!("{}", render::render(query, &presentation, catalog));
}

fn print_status(catalog: &ProductCatalog) {
    if catalog.is_empty() {
        println!("Sin datos cargados.");
    } else {
        println!("Datos guardados: {} filas.", catalog.len());
    }
}
