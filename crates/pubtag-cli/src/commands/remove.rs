//! Remove command handler

use std::path::Path;

use anyhow::{bail, Result};

use pubtag_core::Store;

use crate::output::Output;

/// Remove the record for a document from the database
pub fn run(snapshot: &Path, entry: &Path, output: &Output) -> Result<()> {
    let mut store = Store::open_from_snapshot(snapshot);

    let publication = store.extract_from_document(entry);
    if publication.is_blank() {
        bail!("could not identify document: {}", entry.display());
    }

    store.remove(&publication);
    output.message("Record removed.");
    Ok(())
}
