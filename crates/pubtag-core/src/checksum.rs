//! Content-identity checksums
//!
//! A publication is named by a checksum of its document's bytes, so the
//! record survives renames and moves. The checksum is cheap content
//! identity, not tamper resistance; the trait keeps it pluggable so a
//! stronger hash can replace it without touching the store's contract.

use std::fs;
use std::path::Path;

use crate::error::ChecksumError;

/// A content-identity function: file bytes to a 64-bit identifier
///
/// Implementations must be deterministic and byte-exact across runs and
/// platforms.
pub trait ContentIdentity {
    /// Compute the identifier for the file at `path`
    fn compute(&self, path: &Path) -> Result<u64, ChecksumError>;
}

/// CRC32 content identity, widened to `u64`
///
/// The default identity function. CRC32 collisions are treated as
/// negligible for the collection sizes this tool targets.
#[derive(Debug, Clone, Copy, Default)]
pub struct Crc32Identity;

impl ContentIdentity for Crc32Identity {
    fn compute(&self, path: &Path) -> Result<u64, ChecksumError> {
        let bytes = fs::read(path).map_err(|source| ChecksumError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(u64::from(crc32fast::hash(&bytes)))
    }
}

/// Compute a file's identifier with the default identity function
pub fn compute(path: &Path) -> Result<u64, ChecksumError> {
    Crc32Identity.compute(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_identical_bytes_identical_identifier() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.md");
        let b = temp_dir.path().join("renamed elsewhere.md");
        fs::write(&a, b"the same content").unwrap();
        fs::write(&b, b"the same content").unwrap();

        assert_eq!(compute(&a).unwrap(), compute(&b).unwrap());
    }

    #[test]
    fn test_stable_across_reads() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("doc.md");
        fs::write(&path, b"stable content").unwrap();

        assert_eq!(compute(&path).unwrap(), compute(&path).unwrap());
    }

    #[test]
    fn test_no_collision_in_small_corpus() {
        let temp_dir = TempDir::new().unwrap();
        let corpus = [
            &b"alpha"[..],
            b"beta",
            b"gamma",
            b"alpha ",
            b"Alpha",
            b"a slightly longer document body",
        ];

        let mut seen = std::collections::HashSet::new();
        for (i, content) in corpus.iter().enumerate() {
            let path = temp_dir.path().join(format!("doc{}.md", i));
            fs::write(&path, content).unwrap();
            assert!(seen.insert(compute(&path).unwrap()));
        }
    }

    #[test]
    fn test_unreadable_file_is_an_error() {
        let result = compute(Path::new("/nonexistent/doc.md"));
        assert!(result.is_err());
    }

    #[test]
    fn test_identifier_fits_crc32_range() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("doc.md");
        fs::write(&path, b"content").unwrap();

        let id = compute(&path).unwrap();
        assert!(id <= u64::from(u32::MAX));
    }
}
