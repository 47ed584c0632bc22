//! File/record reconciliation
//!
//! Records outlive the files that produced them: documents get renamed and
//! moved, and the snapshot never stores paths. The synchronizer walks a
//! directory, checksums every document, and maps identifiers that already
//! exist in the store back to the paths currently holding their bytes.
//!
//! The resulting index is transient by design. It is rebuilt from scratch
//! on every run and is never serialized.

use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::checksum;
use crate::models::Publication;
use crate::scan;

/// Transient identifier → paths index
///
/// A record may reference several files when byte-identical copies exist.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    paths: HashMap<u64, BTreeSet<PathBuf>>,
}

impl ReferenceIndex {
    /// The paths currently believed to hold the bytes for `identifier`
    pub fn paths_for(&self, identifier: u64) -> Option<&BTreeSet<PathBuf>> {
        self.paths.get(&identifier)
    }

    /// Number of identifiers with at least one reference
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    fn add(&mut self, identifier: u64, path: PathBuf) {
        self.paths.entry(identifier).or_default().insert(path);
    }
}

/// Re-associate file-system paths with existing records
///
/// Walks `directory` recursively, checksums each document, and records the
/// path under its identifier when that identifier is already a key in
/// `records`. Unknown checksums are ignored: synchronization never creates
/// records. Per-file checksum failures are swallowed and the file skipped.
pub fn scan_references(records: &HashMap<u64, Publication>, directory: &Path) -> ReferenceIndex {
    let mut index = ReferenceIndex::default();
    for path in scan::documents_under(directory) {
        match checksum::compute(&path) {
            Ok(identifier) => {
                if records.contains_key(&identifier) {
                    index.add(identifier, path);
                }
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "skipping unreadable document");
            }
        }
    }
    index
}
