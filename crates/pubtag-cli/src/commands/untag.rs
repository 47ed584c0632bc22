//! Untag command handler

use std::path::Path;

use anyhow::{bail, Result};

use pubtag_core::Store;

use crate::output::Output;

/// Write an "(untagged)" sibling copy with an empty metadata dictionary
pub fn run(entry: &Path, output: &Output) -> Result<()> {
    if Store::write_untagged_copy(entry) {
        output.message("Untagged copy written.");
        Ok(())
    } else {
        bail!("could not write untagged copy of {}", entry.display());
    }
}
