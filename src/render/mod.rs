// Render module: turns a presentation shape into terminal text.

use crate::columns::LogicalField;
use crate::model::{ProductCatalog, ProductRow};
use crate::normalizer::digits_only;
use crate::search::Presentation;

/// Formats a finished search for the terminal. The search core never
/// calls this; it only sees the `Presentation` value.
pub fn render(query: &str, presentation: &Presentation<'_>, catalog: &ProductCatalog) -> String {
    match presentation {
        Presentation::Empty => format!("Sin resultados para \"{query}\".\n"),
        Presentation::Single(row) => render_detail_card(row, catalog),
        Presentation::Multiple(rows) => render_list(query, rows, catalog),
    }
}

/// The "Quick ID" detail card: the short ID big on top, then every
/// identifier the row actually has.
fn render_detail_card(row: &ProductRow, catalog: &ProductCatalog) -> String {
    let rapid = non_empty_or(catalog.field(row, LogicalField::Rapid), "—");
    let part = catalog.field(row, LogicalField::Part);
    let ref11 = catalog.field(row, LogicalField::Ref11);
    let ean = catalog.field(row, LogicalField::Ean);
    let desc = description(row, catalog);
    let precio = format_price_eur(catalog.field(row, LogicalField::Precio));
    let refs = ref_line(row, catalog);
    let foto = catalog.field(row, LogicalField::Foto);

    let mut out = String::new();
    out.push_str("==============================\n");
    out.push_str(&format!("  {rapid}\n  ID rápida\n"));
    if !desc.is_empty() {
        out.push_str(&format!("\n  {desc}\n"));
    }
    if !part.is_empty() {
        out.push_str(&format!("  PN: {part}\n"));
    }
    if !precio.is_empty() {
        out.push_str(&format!("  Precio: {precio}\n"));
    }
    if !ref11.is_empty() {
        out.push_str(&format!("  Ref. (11 dígitos): {ref11}\n"));
    }
    if !ean.is_empty() {
        out.push_str(&format!("  EAN {ean}\n"));
    }
    if let Some(refs) = refs {
        out.push_str(&format!("  REF: {refs}\n"));
    }
    if !foto.is_empty() {
        out.push_str(&format!("  Foto: {foto}\n"));
    }
    out.push_str("==============================\n");
    out
}

/// One line per product, catalog order, with the numeric-lookup tip
/// at the bottom.
fn render_list(query: &str, rows: &[&ProductRow], catalog: &ProductCatalog) -> String {
    let mut out = format!("Resultados: {} (búsqueda: \"{query}\")\n", rows.len());
    for row in rows {
        out.push_str(&render_list_line(row, catalog));
    }
    out.push_str("Tip: escribe números (4 o 5 dígitos) para una búsqueda rápida por EAN/Barra.\n");
    out
}

fn render_list_line(row: &ProductRow, catalog: &ProductCatalog) -> String {
    let mut parts = Vec::new();

    let rapid = catalog.field(row, LogicalField::Rapid);
    if !rapid.is_empty() {
        parts.push(format!("[{rapid}]"));
    }
    let desc = description(row, catalog);
    if !desc.is_empty() {
        parts.push(desc.to_string());
    }
    let part = catalog.field(row, LogicalField::Part);
    if !part.is_empty() {
        parts.push(part.to_string());
    }
    let ean = catalog.field(row, LogicalField::Ean);
    if !ean.is_empty() {
        parts.push(format!("EAN {ean}"));
    }
    if let Some(refs) = ref_line(row, catalog) {
        parts.push(format!("REF: {refs}"));
    }
    let ref11 = catalog.field(row, LogicalField::Ref11);
    if !ref11.is_empty() {
        parts.push(format!("Ref 11: {ref11}"));
    }
    let precio = format_price_eur(catalog.field(row, LogicalField::Precio));
    if !precio.is_empty() {
        parts.push(precio);
    }

    format!("  {}\n", parts.join(" | "))
}

/// Long description, falling back to the short name.
fn description<'a>(row: &'a ProductRow, catalog: &ProductCatalog) -> &'a str {
    let desc = catalog.field(row, LogicalField::Descripcion);
    if desc.is_empty() {
        catalog.field(row, LogicalField::Nombre)
    } else {
        desc
    }
}

/// The `REF: uneco familia barra` line, only for rows that have at
/// least one of the three.
fn ref_line(row: &ProductRow, catalog: &ProductCatalog) -> Option<String> {
    let refs: Vec<&str> = [LogicalField::Uneco, LogicalField::Fam, LogicalField::Barra]
        .iter()
        .map(|f| catalog.field(row, *f))
        .filter(|v| !v.is_empty())
        .collect();
    if refs.is_empty() { None } else { Some(refs.join(" ")) }
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() { fallback } else { value }
}

/// Price cells arrive in wildly mixed shapes. Values that already
/// carry one or two decimals ("319,00") are euros, with '.' read as a
/// thousands separator per the sheets' es-ES convention; bare digit
/// runs ("31900") are cents. Output is es-ES formatted with a trailing
/// euro sign; anything unparseable is echoed back unchanged.
pub fn format_price_eur(value: &str) -> String {
    let raw = value.trim();
    if raw.is_empty() {
        return String::new();
    }

    let cleaned: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

    let num = if ends_with_decimals(raw) {
        cleaned.replace('.', "").replace(',', ".").parse::<f64>().ok()
    } else {
        let digits = digits_only(&cleaned);
        if digits.is_empty() {
            return raw.to_string();
        }
        digits.parse::<f64>().ok().map(|cents| cents / 100.0)
    };

    match num {
        Some(n) => format!("{} €", format_es(n)),
        None => raw.to_string(),
    }
}

/// True when the value ends in a decimal separator followed by one or
/// two digits (ignoring trailing whitespace).
fn ends_with_decimals(value: &str) -> bool {
    let chars: Vec<char> = value.trim_end().chars().collect();
    let digits = chars
        .iter()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .count();
    // An all-digit value has no room for a separator.
    if digits == 0 || digits > 2 || digits >= chars.len() {
        return false;
    }
    matches!(chars.get(chars.len() - digits - 1), Some(',') | Some('.'))
}

/// es-ES money formatting: '.' for thousands, ',' for decimals.
fn format_es(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}{grouped},{frac:02}")
}
