//! Show command handler

use std::collections::HashSet;
use std::path::Path;

use anyhow::Result;

use pubtag_core::{Publication, Store};

use crate::output::Output;

/// Display the records for a document or directory
pub fn run(snapshot: &Path, entry: &Path, output: &Output) -> Result<()> {
    let (store, results) = collect(snapshot, entry);

    if results.is_empty() {
        output.message("No publications found.");
        return Ok(());
    }

    output.print_results(&store, &results);
    Ok(())
}

/// Gather the records to display
///
/// A directory entry is scanned into a derived store. A single file goes
/// through the database: its stored record wins over freshly extracted
/// frontmatter, so a tagged document is shown as the database knows it.
fn collect(snapshot: &Path, entry: &Path) -> (Store, HashSet<Publication>) {
    if entry.is_dir() {
        let store = Store::open_from_files(entry);
        let results = store.publications().cloned().collect();
        return (store, results);
    }

    let store = Store::open_from_snapshot(snapshot);
    let publication = store.extract_from_document(entry);
    let results = if publication.is_blank() {
        HashSet::new()
    } else {
        HashSet::from([publication])
    };
    (store, results)
}
