// Logical fields and the synonym-driven column mapping.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::normalizer::normalize;

/// Canonical product attributes, independent of whatever the uploaded
/// sheet actually calls its columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogicalField {
    /// Short human-facing quick ID, shown big on the detail card.
    Rapid,
    /// Manufacturer part number / SKU.
    Part,
    /// Full EAN barcode.
    Ean,
    /// Last-5-digit barcode fragment for fast manual lookup.
    Barra,
    /// Short product name.
    Nombre,
    /// Long description.
    Descripcion,
    /// Image reference.
    Foto,
    /// Price.
    Precio,
    /// 11-digit internal reference.
    Ref11,
    /// Department.
    Dept,
    Uneco,
    /// Product family.
    Fam,
}

impl LogicalField {
    pub const ALL: [LogicalField; 12] = [
        LogicalField::Rapid,
        LogicalField::Part,
        LogicalField::Ean,
        LogicalField::Barra,
        LogicalField::Nombre,
        LogicalField::Descripcion,
        LogicalField::Foto,
        LogicalField::Precio,
        LogicalField::Ref11,
        LogicalField::Dept,
        LogicalField::Uneco,
        LogicalField::Fam,
    ];

    /// Header spellings known to denote this field, in priority order.
    /// Spanish/Catalan heavy because that is what the source sheets use.
    pub fn synonyms(self) -> &'static [&'static str] {
        match self {
            LogicalField::Rapid => &[
                "id rápida", "id rapida", "id", "id rápida (4)", "id rapida (4)",
                "id rapida 4", "id rápida 4", "id rápida 4 dígitos", "id rapida 4 digitos",
                "id rápida 4 del ean", "id rapida 4 del ean", "id rápida ean",
                "id rapida ean", "quick id", "id rápida apple", "id rápida producto",
            ],
            LogicalField::Part => &[
                "part number", "part", "pn", "p/n", "sku", "modelo", "model",
                "código producto", "codigo producto", "product code", "code",
            ],
            LogicalField::Ean => &[
                "ean", "ean13", "código ean", "codigo ean", "barcode", "codi ean",
                "codi de barres", "código de barras", "codigo de barras",
            ],
            LogicalField::Barra => &[
                "barra", "barra5", "codigo5", "código5", "bar", "barra 5", "barra (5)",
                "barra 5 dígitos", "barra 5 digitos", "ultimos 5", "últimos 5",
            ],
            LogicalField::Nombre => &[
                "nombre", "producto", "titulo", "título", "name", "product", "article",
                "artículo", "descripción corta", "descripcion corta", "short description",
            ],
            LogicalField::Descripcion => &[
                "descripcion", "descripción", "description", "descripcio", "detalle",
                "detalles", "long description",
            ],
            LogicalField::Foto => &[
                "foto", "imagen", "image", "photo", "picture", "url imagen",
                "url imagen producto", "img", "image url", "foto url", "imagen url",
                "url foto", "url",
            ],
            LogicalField::Precio => &[
                "precio", "price", "pvp", "p.v.p.", "importe", "amount", "coste",
                "costo", "cost",
            ],
            LogicalField::Ref11 => &[
                "ref11", "ref 11", "referencia 11", "nuestra referencia",
                "referencia interna", "ref", "ref.", "referencia",
            ],
            LogicalField::Dept => &["departamento", "dept", "depto", "departament"],
            LogicalField::Uneco => &["uneco", "u.neco", "une", "codigo uneco", "código uneco"],
            LogicalField::Fam => &["familia", "family"],
        }
    }
}

/// Maps logical fields to the raw header that carries them in the
/// current sheet. Built once per install; fields with no matching
/// header are simply absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnMap {
    map: HashMap<LogicalField, String>,
}

impl ColumnMap {
    pub fn header(&self, field: LogicalField) -> Option<&str> {
        self.map.get(&field).map(String::as_str)
    }
}

/// Resolves every logical field against the sheet's headers.
///
/// Two passes per field: an exact pass over the synonym list in its
/// declared order (the first header whose normalized form equals the
/// synonym wins), then a substring pass in header order (the first
/// header containing any synonym wins). A header may end up bound to
/// several fields; that is accepted, not a conflict.
pub fn build_column_map(headers: &[String]) -> ColumnMap {
    let headers_norm: Vec<String> = headers.iter().map(|h| normalize(h)).collect();

    let mut map = HashMap::new();
    for field in LogicalField::ALL {
        if let Some(header) = pick_header(headers, &headers_norm, field.synonyms()) {
            map.insert(field, header.to_string());
        }
    }
    ColumnMap { map }
}

fn pick_header<'a>(
    headers: &'a [String],
    headers_norm: &[String],
    synonyms: &[&str],
) -> Option<&'a String> {
    // Exact match first.
    for syn in synonyms {
        let syn_norm = normalize(syn);
        if let Some(idx) = headers_norm.iter().position(|h| *h == syn_norm) {
            return Some(&headers[idx]);
        }
    }
    // Then contains.
    for (idx, header) in headers_norm.iter().enumerate() {
        for syn in synonyms {
            if header.contains(&normalize(syn)) {
                return Some(&headers[idx]);
            }
        }
    }
    None
}
