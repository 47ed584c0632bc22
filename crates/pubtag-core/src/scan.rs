//! Document discovery
//!
//! Recursive, case-insensitive `.md` enumeration, shared by the derived
//! loader and the synchronizer. Unreadable directory entries are skipped.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// The document extension, matched case-insensitively
pub const DOCUMENT_EXTENSION: &str = "md";

/// Check whether a path names a document
pub fn is_document(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(DOCUMENT_EXTENSION))
}

/// Enumerate all documents under a directory, recursively
pub fn documents_under(directory: &Path) -> Vec<PathBuf> {
    WalkDir::new(directory)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_document(path))
        .collect()
}
