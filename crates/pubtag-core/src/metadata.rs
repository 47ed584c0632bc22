//! Metadata extraction and writing
//!
//! The extractor turns a document into a `Publication`; the writer
//! produces a sibling copy of a document carrying a replaced metadata
//! dictionary. Neither ever mutates a source file in place.
//!
//! Extraction is total: any failure (unreadable file, bad frontmatter,
//! checksum error) yields the blank publication so a bulk scan is never
//! aborted by one bad document.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::checksum;
use crate::document::{self, DocumentFields};
use crate::error::DocumentError;
use crate::models::Publication;

/// Extract a publication record from a document
///
/// Maps the conventional frontmatter fields (title, `;`-delimited authors
/// and keywords) into the record, sanitizes the text fields, and assigns
/// the identifier from the document's content checksum. Returns
/// `Publication::blank()` on any failure.
pub fn extract(path: &Path) -> Publication {
    match try_extract(path) {
        Ok(publication) => publication,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "extraction failed, using blank record");
            Publication::blank()
        }
    }
}

fn try_extract(path: &Path) -> Result<Publication, DocumentError> {
    let identifier = checksum::compute(path).map_err(|e| match e {
        crate::error::ChecksumError::Read { path, source } => DocumentError::Read { path, source },
    })?;
    let content = fs::read_to_string(path).map_err(|source| DocumentError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let (fields, _body) = document::parse_fields(path, &content)?;

    let mut publication = Publication::new(identifier);
    publication.title = fields.title;
    publication.set_authors_from_str(&fields.authors);
    publication.set_tags_from_str(&fields.keywords);
    publication.sanitize();
    publication.clean_collections();
    Ok(publication)
}

/// Write a copy of `source` at `dest` with a replaced metadata dictionary
///
/// The body is carried over untouched; the frontmatter is replaced wholesale
/// by `fields`. Returns `false` (never raises) if the source cannot be
/// opened or the destination cannot be created.
pub fn write_copy(source: &Path, dest: &Path, fields: &DocumentFields) -> bool {
    match try_write_copy(source, dest, fields) {
        Ok(()) => true,
        Err(e) => {
            warn!(
                source = %source.display(),
                dest = %dest.display(),
                error = %e,
                "failed to write document copy"
            );
            false
        }
    }
}

fn try_write_copy(source: &Path, dest: &Path, fields: &DocumentFields) -> Result<(), DocumentError> {
    let content = fs::read_to_string(source).map_err(|source_err| DocumentError::Read {
        path: source.to_path_buf(),
        source: source_err,
    })?;
    let (_, body) = document::split_frontmatter(&content);
    let output = document::assemble(fields, body);
    fs::write(dest, output).map_err(|source_err| DocumentError::Write {
        path: dest.to_path_buf(),
        source: source_err,
    })
}

/// The metadata dictionary for a publication's "(tagged)" copy
pub fn fields_for(publication: &Publication) -> DocumentFields {
    DocumentFields {
        title: publication.title.clone(),
        authors: if publication.authors.is_empty() {
            String::new()
        } else {
            publication.authors.join("; ")
        },
        keywords: if publication.tags.is_empty() {
            String::new()
        } else {
            publication.tags.iter().cloned().collect::<Vec<_>>().join("; ")
        },
    }
}

/// Path of the "(tagged)" sibling for a document
pub fn tagged_sibling(path: &Path) -> PathBuf {
    sibling(path, "tagged")
}

/// Path of the "(untagged)" sibling for a document
pub fn untagged_sibling(path: &Path) -> PathBuf {
    sibling(path, "untagged")
}

fn sibling(path: &Path, marker: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = format!("{} ({}).md", stem, marker);
    match path.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}
