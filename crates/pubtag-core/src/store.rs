//! The record store
//!
//! `Store` owns the identifier → publication mapping and its lifecycle:
//!
//! - **Snapshot mode** (`open_from_snapshot`): the mapping is deserialized
//!   from a JSON snapshot and every mutation rewrites the whole snapshot.
//! - **Derived mode** (`open_from_files`): the mapping is built by scanning
//!   documents and extracting their metadata; mutations stay in memory for
//!   the process lifetime.
//!
//! Load failures degrade to an empty store, and per-file failures during a
//! scan are swallowed; see the crate docs for the error-handling tiers.

use std::collections::{BTreeSet, HashMap};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::checksum;
use crate::document::DocumentFields;
use crate::metadata;
use crate::models::Publication;
use crate::scan;
use crate::sync::{self, ReferenceIndex};

/// What the mapping is backed by
#[derive(Debug, Clone)]
enum Backing {
    /// Persisted snapshot; mutations commit the full mapping to this path
    Snapshot(PathBuf),
    /// Built by scanning documents; mutations are in-memory only
    Derived,
}

/// The publication record store
#[derive(Debug)]
pub struct Store {
    mapping: HashMap<u64, Publication>,
    backing: Backing,
    references: ReferenceIndex,
}

impl Store {
    /// Open a persistent store from a snapshot file
    ///
    /// A missing snapshot or one that fails to deserialize yields an empty
    /// store; no error is surfaced. The store stays bound to `path` and
    /// commits the full mapping there on every mutation.
    pub fn open_from_snapshot(path: &Path) -> Self {
        let mapping = load_snapshot(path);
        Self {
            mapping,
            backing: Backing::Snapshot(path.to_path_buf()),
            references: ReferenceIndex::default(),
        }
    }

    /// Build a derived store by scanning documents
    ///
    /// `path` is a single document or a directory (searched recursively,
    /// case-insensitive extension match). The first file seen for a given
    /// checksum populates the record; byte-identical duplicates are
    /// silently skipped, as is any file that cannot be read or extracted.
    pub fn open_from_files(path: &Path) -> Self {
        let mut mapping = HashMap::new();
        if path.is_dir() {
            for file in scan::documents_under(path) {
                scan_into(&mut mapping, &file);
            }
        } else {
            scan_into(&mut mapping, path);
        }
        Self {
            mapping,
            backing: Backing::Derived,
            references: ReferenceIndex::default(),
        }
    }

    /// Number of records in the store
    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    /// Whether the store is backed by a snapshot file
    pub fn is_persistent(&self) -> bool {
        matches!(self.backing, Backing::Snapshot(_))
    }

    /// Insert or replace a record at its identifier key
    ///
    /// Replacement is a full overwrite, not a merge. In snapshot mode the
    /// whole mapping is committed afterwards; a failed commit leaves the
    /// in-memory state correct and the on-disk snapshot stale.
    pub fn update(&mut self, publication: Publication) {
        self.mapping.insert(publication.identifier, publication);
        self.commit();
    }

    /// Remove a record by its identifier; a no-op when absent
    pub fn remove(&mut self, publication: &Publication) {
        self.mapping.remove(&publication.identifier);
        self.commit();
    }

    /// Look up a record by identifier
    pub fn get(&self, identifier: u64) -> Option<&Publication> {
        self.mapping.get(&identifier)
    }

    /// The sole record, when the store holds exactly one
    ///
    /// Returns the blank publication for 0 or ≥2 records. Used when the
    /// caller knows the store was derived from a single document.
    pub fn get_single(&self) -> Publication {
        if self.mapping.len() == 1 {
            self.mapping.values().next().cloned().unwrap_or_else(Publication::blank)
        } else {
            Publication::blank()
        }
    }

    /// Iterate over all records
    pub fn publications(&self) -> impl Iterator<Item = &Publication> {
        self.mapping.values()
    }

    /// Rebuild the transient reference index from a directory
    ///
    /// Recomputes checksums for every document under `directory` and maps
    /// existing records to the paths currently holding their bytes. Never
    /// creates records; replaces any previous index wholesale.
    pub fn synchronize(&mut self, directory: &Path) {
        self.references = sync::scan_references(&self.mapping, directory);
    }

    /// The current file references for a record
    ///
    /// Empty until `synchronize` has run in this process.
    pub fn references(&self, identifier: u64) -> BTreeSet<PathBuf> {
        self.references
            .paths_for(identifier)
            .cloned()
            .unwrap_or_default()
    }

    // ==================== Document Operations ====================

    /// Extract a record from a document, preferring the stored one
    ///
    /// When the document's checksum is already a key in the store, the
    /// stored record wins over freshly extracted metadata. Returns the
    /// blank publication when the document cannot be identified.
    pub fn extract_from_document(&self, file: &Path) -> Publication {
        match checksum::compute(file) {
            Ok(identifier) => match self.mapping.get(&identifier) {
                Some(publication) => publication.clone(),
                None => metadata::extract(file),
            },
            Err(e) => {
                debug!(path = %file.display(), error = %e, "document unidentifiable");
                Publication::blank()
            }
        }
    }

    /// Write the stored record's metadata into a "(tagged)" sibling copy
    ///
    /// Fails (returns `false`) when the file's checksum has no record in
    /// the store or the copy cannot be produced.
    pub fn write_tagged_copy(&self, file: &Path) -> bool {
        let Ok(identifier) = checksum::compute(file) else {
            return false;
        };
        let Some(publication) = self.mapping.get(&identifier) else {
            return false;
        };
        let fields = metadata::fields_for(publication);
        metadata::write_copy(file, &metadata::tagged_sibling(file), &fields)
    }

    /// Write an "(untagged)" sibling copy with an empty metadata dictionary
    pub fn write_untagged_copy(file: &Path) -> bool {
        metadata::write_copy(
            file,
            &metadata::untagged_sibling(file),
            &DocumentFields::default(),
        )
    }

    /// Commit the full mapping to the snapshot location, when persistent
    ///
    /// Serialization failures are swallowed with a warning; the in-memory
    /// mapping remains authoritative for the rest of the run.
    fn commit(&self) {
        let Backing::Snapshot(path) = &self.backing else {
            return;
        };
        if let Err(e) = save_snapshot(path, &self.mapping) {
            warn!(path = %path.display(), error = %e, "snapshot commit failed, on-disk copy is stale");
        }
    }
}

/// Extract one file into the mapping, first-seen checksum wins
fn scan_into(mapping: &mut HashMap<u64, Publication>, file: &Path) {
    let identifier = match checksum::compute(file) {
        Ok(id) => id,
        Err(e) => {
            debug!(path = %file.display(), error = %e, "skipping unreadable document");
            return;
        }
    };
    if mapping.contains_key(&identifier) {
        debug!(path = %file.display(), identifier, "skipping byte-identical duplicate");
        return;
    }
    let publication = metadata::extract(file);
    if publication.is_blank() {
        // Extraction failed; leave the file out rather than storing a blank.
        // An empty file also lands here: CRC32 of zero bytes is 0, the blank
        // identifier, so empty documents are indistinguishable from failures.
        return;
    }
    mapping.insert(identifier, publication);
}

/// Deserialize the snapshot mapping, degrading to empty on any failure
///
/// Loaded records are re-sanitized so a hand-edited snapshot cannot smuggle
/// un-normalized tags or padded text past exact-match search.
fn load_snapshot(path: &Path) -> HashMap<u64, Publication> {
    if !path.exists() {
        return HashMap::new();
    }
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "snapshot unreadable, starting empty");
            return HashMap::new();
        }
    };
    match serde_json::from_str::<HashMap<u64, Publication>>(&content) {
        Ok(mut mapping) => {
            for publication in mapping.values_mut() {
                publication.sanitize();
                publication.clean_collections();
            }
            mapping
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "snapshot corrupt, starting empty");
            HashMap::new()
        }
    }
}

/// Serialize the full mapping to the snapshot location
///
/// Writes to a temp file in the same directory, then renames, so the
/// snapshot is never left half-written.
fn save_snapshot(path: &Path, mapping: &HashMap<u64, Publication>) -> anyhow::Result<()> {
    use anyhow::Context;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }
    }

    let data = serde_json::to_vec_pretty(mapping).context("Failed to serialize snapshot")?;
    let temp_path = path.with_extension("tmp");

    let mut file = File::create(&temp_path)
        .with_context(|| format!("Failed to create temp file {:?}", temp_path))?;
    file.write_all(&data)
        .with_context(|| format!("Failed to write to temp file {:?}", temp_path))?;
    file.sync_all()
        .with_context(|| format!("Failed to sync temp file {:?}", temp_path))?;

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename {:?} to {:?}", temp_path, path))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn publication(id: u64, title: &str, authors: &str, tags: &str) -> Publication {
        let mut p = Publication::new(id);
        p.title = title.to_string();
        p.set_authors_from_str(authors);
        p.set_tags_from_str(tags);
        p
    }

    fn write_doc(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_missing_snapshot_yields_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::open_from_snapshot(&temp_dir.path().join("absent.json"));
        assert!(store.is_empty());
        assert!(store.is_persistent());
    }

    #[test]
    fn test_corrupt_snapshot_yields_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("catalog.json");
        fs::write(&path, "definitely { not json").unwrap();

        let store = Store::open_from_snapshot(&path);
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_then_get_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open_from_snapshot(&temp_dir.path().join("catalog.json"));

        let p = publication(42, "A Title", "Ana; Bob", "ml; theory");
        store.update(p.clone());

        let got = store.get(42).unwrap();
        assert_eq!(got.title, "A Title");
        assert_eq!(got.authors, p.authors);
        assert_eq!(got.tags, p.tags);
    }

    #[test]
    fn test_update_replaces_not_merges() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open_from_snapshot(&temp_dir.path().join("catalog.json"));

        store.update(publication(1, "Old", "Ana", "ml"));
        store.update(publication(1, "New", "", ""));

        assert_eq!(store.len(), 1);
        let got = store.get(1).unwrap();
        assert_eq!(got.title, "New");
        assert!(got.tags.is_empty());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open_from_snapshot(&temp_dir.path().join("catalog.json"));

        let p = publication(7, "T", "", "");
        store.update(p.clone());
        assert_eq!(store.len(), 1);

        store.remove(&p);
        assert_eq!(store.len(), 0);

        // Second remove: no-op, no error
        store.remove(&p);
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_mutations_persist_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let snapshot = temp_dir.path().join("catalog.json");

        {
            let mut store = Store::open_from_snapshot(&snapshot);
            store.update(publication(42, "Persisted", "Ana", "ml"));
        }

        let store = Store::open_from_snapshot(&snapshot);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(42).unwrap().title, "Persisted");
    }

    #[test]
    fn test_snapshot_round_trip_all_fields() {
        let temp_dir = TempDir::new().unwrap();
        let snapshot = temp_dir.path().join("catalog.json");

        let p = publication(9, "Title", "Ana Lima; Bob Reis", "ml; adaptive automata");
        {
            let mut store = Store::open_from_snapshot(&snapshot);
            store.update(p.clone());
        }

        let store = Store::open_from_snapshot(&snapshot);
        let got = store.get(9).unwrap();
        assert_eq!(got.identifier, p.identifier);
        assert_eq!(got.title, p.title);
        assert_eq!(got.authors, p.authors);
        assert_eq!(got.tags, p.tags);
    }

    #[test]
    fn test_get_single() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open_from_snapshot(&temp_dir.path().join("catalog.json"));

        // Empty store: blank
        assert!(store.get_single().is_blank());

        store.update(publication(1, "Only", "", ""));
        assert_eq!(store.get_single().title, "Only");

        store.update(publication(2, "Second", "", ""));
        assert!(store.get_single().is_blank());
    }

    #[test]
    fn test_derived_load_from_directory() {
        let temp_dir = TempDir::new().unwrap();
        write_doc(
            temp_dir.path(),
            "a.md",
            "---\ntitle: First\nauthors: Ana\nkeywords: ml\n---\nBody A\n",
        );
        write_doc(
            temp_dir.path(),
            "b.md",
            "---\ntitle: Second\nauthors: Bob\nkeywords: theory\n---\nBody B\n",
        );

        let store = Store::open_from_files(temp_dir.path());
        assert_eq!(store.len(), 2);
        assert!(!store.is_persistent());

        let titles: Vec<_> = store.publications().map(|p| p.title.as_str()).collect();
        assert!(titles.contains(&"First"));
        assert!(titles.contains(&"Second"));
    }

    #[test]
    fn test_derived_load_single_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_doc(temp_dir.path(), "only.md", "---\ntitle: Solo\n---\nBody\n");

        let store = Store::open_from_files(&path);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_single().title, "Solo");
    }

    #[test]
    fn test_derived_load_skips_byte_identical_duplicates() {
        let temp_dir = TempDir::new().unwrap();
        let content = "---\ntitle: Duplicated\n---\nSame bytes\n";
        write_doc(temp_dir.path(), "a.md", content);
        write_doc(temp_dir.path(), "z.md", content);

        let store = Store::open_from_files(temp_dir.path());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_derived_load_swallows_bad_files() {
        let temp_dir = TempDir::new().unwrap();
        write_doc(temp_dir.path(), "good.md", "---\ntitle: Good\n---\nBody\n");
        write_doc(temp_dir.path(), "bad.md", "---\ntitle: [unclosed\n---\nBody\n");

        let store = Store::open_from_files(temp_dir.path());
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_single().title, "Good");
    }

    #[test]
    fn test_derived_load_skips_empty_documents() {
        let temp_dir = TempDir::new().unwrap();
        write_doc(temp_dir.path(), "good.md", "---\ntitle: Good\n---\nBody\n");
        let empty = write_doc(temp_dir.path(), "empty.md", "");

        // CRC32 of zero bytes is 0, the blank identifier
        assert_eq!(checksum::compute(&empty).unwrap(), 0);

        let store = Store::open_from_files(temp_dir.path());
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_single().title, "Good");
        assert!(store.extract_from_document(&empty).is_blank());
    }

    #[test]
    fn test_loaded_snapshot_is_sanitized() {
        let temp_dir = TempDir::new().unwrap();
        let snapshot = temp_dir.path().join("catalog.json");
        fs::write(
            &snapshot,
            r#"{"42": {"identifier": 42, "title": "  Hand   Edited ", "authors": [" Ana  Lima ", "  "], "tags": ["ML", " Theory "]}}"#,
        )
        .unwrap();

        let store = Store::open_from_snapshot(&snapshot);
        let got = store.get(42).unwrap();
        assert_eq!(got.title, "Hand Edited");
        assert_eq!(got.authors, vec!["Ana Lima"]);
        assert!(got.has_tag("ml"));
        assert!(got.has_tag("theory"));
        assert_eq!(got.tags.len(), 2);
    }

    #[test]
    fn test_derived_mutations_do_not_touch_disk() {
        let temp_dir = TempDir::new().unwrap();
        write_doc(temp_dir.path(), "a.md", "---\ntitle: T\n---\nBody\n");

        let mut store = Store::open_from_files(temp_dir.path());
        store.update(publication(999, "In Memory", "", ""));

        // No snapshot file appears anywhere in the scanned directory
        let extra: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|x| x == "json"))
            .collect();
        assert!(extra.is_empty());
    }

    #[test]
    fn test_synchronize_builds_references() {
        let temp_dir = TempDir::new().unwrap();
        let docs = temp_dir.path().join("docs");
        fs::create_dir(&docs).unwrap();
        let a = write_doc(&docs, "paper.md", "reference me");
        let b = write_doc(&docs, "paper copy.md", "reference me");
        let id = checksum::compute(&a).unwrap();

        let mut store = Store::open_from_snapshot(&temp_dir.path().join("catalog.json"));
        store.update(publication(id, "Referenced", "", ""));

        assert!(store.references(id).is_empty());
        store.synchronize(&docs);

        let refs = store.references(id);
        assert_eq!(refs.len(), 2);
        assert!(refs.contains(&a));
        assert!(refs.contains(&b));
    }

    #[test]
    fn test_synchronize_never_creates_records() {
        let temp_dir = TempDir::new().unwrap();
        write_doc(temp_dir.path(), "stranger.md", "unknown bytes");

        let mut store = Store::open_from_snapshot(&temp_dir.path().join("catalog.json"));
        store.synchronize(temp_dir.path());
        assert!(store.is_empty());
    }

    #[test]
    fn test_extract_from_document_prefers_stored_record() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_doc(
            temp_dir.path(),
            "paper.md",
            "---\ntitle: On Disk\n---\nBody\n",
        );
        let id = checksum::compute(&path).unwrap();

        let mut store = Store::open_from_snapshot(&temp_dir.path().join("catalog.json"));
        store.update(publication(id, "In Store", "Ana", "ml"));

        let got = store.extract_from_document(&path);
        assert_eq!(got.title, "In Store");
    }

    #[test]
    fn test_extract_from_document_falls_back_to_extraction() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_doc(
            temp_dir.path(),
            "paper.md",
            "---\ntitle: Fresh\n---\nBody\n",
        );

        let store = Store::open_from_snapshot(&temp_dir.path().join("catalog.json"));
        let got = store.extract_from_document(&path);
        assert_eq!(got.title, "Fresh");
    }

    #[test]
    fn test_extract_from_document_unidentifiable_is_blank() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::open_from_snapshot(&temp_dir.path().join("catalog.json"));
        let got = store.extract_from_document(Path::new("/nonexistent/paper.md"));
        assert!(got.is_blank());
    }

    #[test]
    fn test_write_tagged_copy() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_doc(
            temp_dir.path(),
            "paper.md",
            "---\ntitle: Stale\n---\nThe body.\n",
        );
        let id = checksum::compute(&path).unwrap();

        let mut store = Store::open_from_snapshot(&temp_dir.path().join("catalog.json"));
        store.update(publication(id, "Fresh Title", "Ana", "ml"));

        assert!(store.write_tagged_copy(&path));

        let tagged = temp_dir.path().join("paper (tagged).md");
        assert!(tagged.exists());
        let copy = metadata::extract(&tagged);
        assert_eq!(copy.title, "Fresh Title");
        assert_eq!(copy.authors, vec!["Ana"]);
        assert!(copy.has_tag("ml"));
    }

    #[test]
    fn test_write_tagged_copy_requires_record() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_doc(temp_dir.path(), "paper.md", "no record for me");

        let store = Store::open_from_snapshot(&temp_dir.path().join("catalog.json"));
        assert!(!store.write_tagged_copy(&path));
    }

    #[test]
    fn test_write_untagged_copy() {
        let temp_dir = TempDir::new().unwrap();
        let path = write_doc(
            temp_dir.path(),
            "paper.md",
            "---\ntitle: Secret\nauthors: Ana\nkeywords: private\n---\nBody.\n",
        );

        assert!(Store::write_untagged_copy(&path));

        let untagged = temp_dir.path().join("paper (untagged).md");
        let copy = metadata::extract(&untagged);
        assert!(copy.title.is_empty());
        assert!(copy.authors.is_empty());
        assert!(copy.tags.is_empty());
    }
}
