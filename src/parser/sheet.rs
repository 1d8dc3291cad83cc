// CSV/XLSX decoding into header-keyed rows.
use std::fs::File;
use std::io;
use std::path::Path;

use calamine::{Data, Reader, Xlsx, open_workbook};

use crate::model::{DecodeError, RawRow};

/// A decoded sheet: the header row plus every data row, each fully
/// keyed by every header (missing cells become empty strings).
#[derive(Debug)]
pub struct DecodedSheet {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

pub trait SheetDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedSheet, DecodeError>;
}

/// Picks a decoder from the file extension. Anything that is not
/// `.csv` or `.xlsx` is rejected before any bytes are read.
pub fn decode_file(path: &Path) -> Result<DecodedSheet, DecodeError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" => CsvDecoder.decode(path),
        "xlsx" => XlsxDecoder.decode(path),
        _ => Err(DecodeError::Unsupported(ext)),
    }
}

pub struct CsvDecoder;

impl SheetDecoder for CsvDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedSheet, DecodeError> {
        let file = File::open(path)?;
        decode_csv(file)
    }
}

/// Reads CSV from any source; split out so tests can feed in-memory
/// text without touching the filesystem.
fn decode_csv<R: io::Read>(input: R) -> Result<DecodedSheet, DecodeError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: RawRow = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), record.get(i).unwrap_or("").to_string()))
            .collect();
        rows.push(row);
    }

    finish(headers, rows)
}

pub struct XlsxDecoder;

impl SheetDecoder for XlsxDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedSheet, DecodeError> {
        let mut workbook: Xlsx<_> = open_workbook(path)?;

        // First sheet only; multi-sheet workbooks are out of scope.
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or(DecodeError::EmptySheet)?;
        let range = workbook.worksheet_range(&sheet_name)?;

        let mut row_iter = range.rows();
        let headers: Vec<String> = match row_iter.next() {
            Some(cells) => cells.iter().map(cell_text).collect(),
            None => return Err(DecodeError::EmptySheet),
        };

        let mut rows = Vec::new();
        for cells in row_iter {
            // Blank spreadsheet lines inside the used range are noise.
            if cells.iter().all(|c| matches!(c, Data::Empty)) {
                continue;
            }
            let row: RawRow = headers
                .iter()
                .enumerate()
                .map(|(i, h)| (h.clone(), cells.get(i).map(cell_text).unwrap_or_default()))
                .collect();
            rows.push(row);
        }

        finish(headers, rows)
    }
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn finish(headers: Vec<String>, rows: Vec<RawRow>) -> Result<DecodedSheet, DecodeError> {
    if rows.is_empty() {
        return Err(DecodeError::EmptySheet);
    }
    Ok(DecodedSheet { headers, rows })
}
