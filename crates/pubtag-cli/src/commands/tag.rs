//! Tag command handler

use std::path::Path;

use anyhow::{bail, Result};

use pubtag_core::Store;

use crate::output::Output;

/// Update a document's record and write its "(tagged)" sibling copy
///
/// The record starts from the stored entry for the document's checksum
/// (or freshly extracted metadata when none exists), then the given
/// fields overwrite it.
pub fn run(
    snapshot: &Path,
    entry: &Path,
    title: Option<String>,
    authors: Option<String>,
    tags: Option<String>,
    output: &Output,
) -> Result<()> {
    let mut store = Store::open_from_snapshot(snapshot);

    let mut publication = store.extract_from_document(entry);
    if publication.is_blank() {
        bail!("could not identify document: {}", entry.display());
    }

    if let Some(title) = title {
        publication.title = title;
    }
    if let Some(authors) = authors {
        publication.set_authors_from_str(&authors);
    }
    if let Some(tags) = tags {
        publication.set_tags_from_str(&tags);
    }
    publication.sanitize();
    publication.clean_collections();

    store.update(publication.clone());

    if store.write_tagged_copy(entry) {
        output.print_publication(&store, &publication);
        output.message("Tagged copy written.");
        Ok(())
    } else {
        bail!("could not write tagged copy of {}", entry.display());
    }
}
