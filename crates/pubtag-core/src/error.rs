//! Typed errors for the checksum and document seams
//!
//! The store's public surface swallows most failures by design (blank
//! records, skipped files, degraded-to-empty loads); these types exist for
//! the internal seams where the failure still carries useful detail.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors computing a content checksum
#[derive(Error, Debug)]
pub enum ChecksumError {
    /// The source could not be read
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors reading or writing a document's metadata
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Failed to read the document
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write the document copy
    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The frontmatter block is present but not valid YAML
    #[error("Invalid metadata in '{path}': {details}")]
    InvalidMetadata { path: PathBuf, details: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_error_display() {
        let err = ChecksumError::Read {
            path: PathBuf::from("/missing/file.md"),
            source: io::Error::new(io::ErrorKind::NotFound, "not found"),
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read"));
        assert!(msg.contains("/missing/file.md"));
    }

    #[test]
    fn test_invalid_metadata_display() {
        let err = DocumentError::InvalidMetadata {
            path: PathBuf::from("/doc.md"),
            details: "bad yaml".to_string(),
        };
        assert!(err.to_string().contains("Invalid metadata"));
    }
}
