// Search module: query classification, matching, deduplication and
// the resulting presentation shape.

pub mod classify;
pub mod dedupe;
pub mod matcher;

pub use classify::{MatchMode, classify};

use crate::model::{ProductCatalog, ProductRow};

/// What the renderer should show for a finished search.
#[derive(Debug)]
pub enum Presentation<'a> {
    /// Nothing matched.
    Empty,
    /// Exactly one product: show the detail card.
    Single(&'a ProductRow),
    /// Several products: show the list, in catalog order.
    Multiple(Vec<&'a ProductRow>),
}

/// Full query pipeline: classify, match (with free-text fallback),
/// deduplicate, then pick the presentation shape. The caller must
/// hand in a trimmed, non-empty query.
pub fn run_query<'a>(query: &str, catalog: &'a ProductCatalog) -> Presentation<'a> {
    let mode = classify(query);
    let matches = matcher::find_matches(query, mode, catalog);
    let matches = dedupe::dedupe_rows(matches, catalog);
    select(matches)
}

fn select(matches: Vec<&ProductRow>) -> Presentation<'_> {
    match matches.len() {
        0 => Presentation::Empty,
        1 => Presentation::Single(matches[0]),
        _ => Presentation::Multiple(matches),
    }
}
