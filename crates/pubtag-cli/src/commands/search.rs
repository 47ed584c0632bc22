//! Search command handler

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};

use pubtag_core::{search, Store};

use crate::output::Output;

/// Search the database by tags and/or authors
///
/// Queries are `;`-delimited term lists. When a sync directory is known,
/// file references are rebuilt first so results can show current paths.
pub fn run(
    snapshot: &Path,
    tags: Option<String>,
    authors: Option<String>,
    sync_dir: Option<PathBuf>,
    output: &Output,
) -> Result<()> {
    let tags = tags.map(|t| to_query(&t));
    let authors = authors.map(|a| to_query(&a));

    for query in [&tags, &authors].into_iter().flatten() {
        search::validate_query(query)?;
    }

    let mut store = Store::open_from_snapshot(snapshot);
    if let Some(directory) = sync_dir {
        store.synchronize(&directory);
    }

    let results = match (&authors, &tags) {
        (Some(authors), Some(tags)) => search::search_authors_with_tags(&store, authors, tags),
        (Some(authors), None) => search::search_authors(&store, authors),
        (None, Some(tags)) => search::search_tags(&store, tags),
        (None, None) => bail!("nothing to search for; provide --tags and/or --authors"),
    };

    output.print_results(&store, &results);
    Ok(())
}

/// Split a `;`-delimited term list into a query set
fn to_query(text: &str) -> BTreeSet<String> {
    text.split(';').map(|term| term.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_query_splits_and_trims() {
        let query = to_query("ml; adaptive automata ;theory");
        assert_eq!(query.len(), 3);
        assert!(query.contains("ml"));
        assert!(query.contains("adaptive automata"));
        assert!(query.contains("theory"));
    }

    #[test]
    fn test_to_query_blank_terms_survive_for_validation() {
        // validate_query is responsible for rejecting these
        let query = to_query("ml;;theory");
        assert!(query.contains(""));
        assert!(search::validate_query(&query).is_err());
    }
}
