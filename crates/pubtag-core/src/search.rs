//! Search over the record store
//!
//! Pure predicates over a snapshot of the store's records; nothing here
//! mutates. Tags match exactly after normalization; authors match as
//! case-insensitive substrings. The asymmetry is intentional: tags are a
//! controlled vocabulary, author names are typed from memory.

use std::collections::{BTreeSet, HashSet};

use anyhow::{bail, Result};

use crate::models::Publication;
use crate::store::Store;

/// Records whose tag set intersects the query, exact match after
/// lowercase, whitespace collapse and trim
pub fn search_tags(store: &Store, query: &BTreeSet<String>) -> HashSet<Publication> {
    store
        .publications()
        .filter(|p| p.has_any_tags(query))
        .cloned()
        .collect()
}

/// Records where any author contains any query term as a substring,
/// case-insensitively and whitespace-normalized
pub fn search_authors(store: &Store, query: &BTreeSet<String>) -> HashSet<Publication> {
    store
        .publications()
        .filter(|p| p.has_any_authors(query))
        .cloned()
        .collect()
}

/// Records matching the author predicate AND the tag predicate
///
/// Implemented as a two-stage filter (authors first, then tags); both
/// predicates are pure, so the order does not affect the result.
pub fn search_authors_with_tags(
    store: &Store,
    authors: &BTreeSet<String>,
    tags: &BTreeSet<String>,
) -> HashSet<Publication> {
    store
        .publications()
        .filter(|p| p.has_any_authors(authors))
        .filter(|p| p.has_any_tags(tags))
        .cloned()
        .collect()
}

/// Validate a query set before searching
///
/// A query is invalid when it is empty or any term is blank. The search
/// functions themselves accept any set; this check belongs to the caller
/// layer.
pub fn validate_query(query: &BTreeSet<String>) -> Result<()> {
    if query.is_empty() {
        bail!("the query is empty");
    }
    if query.iter().any(|term| term.trim().is_empty()) {
        bail!("the query contains a blank term");
    }
    Ok(())
}
