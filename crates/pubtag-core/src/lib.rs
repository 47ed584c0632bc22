//! pubtag Core Library
//!
//! This crate provides the core functionality for pubtag, a metadata
//! manager for a collection of documents identified by content checksum
//! rather than by filename or path.
//!
//! # Architecture
//!
//! A `Store` owns the identifier → `Publication` mapping. It is loaded
//! either from a persisted JSON snapshot (mutations commit the whole
//! mapping back) or derived by scanning documents and extracting their
//! frontmatter metadata (mutations stay in memory). The synchronizer
//! rebuilds a transient identifier → paths index per run so records follow
//! files across renames and moves.
//!
//! # Error handling
//!
//! Three tiers, none fatal:
//! - extraction/identity failures become a blank record or a skipped file,
//! - snapshot load failures degrade to an empty store,
//! - writer failures are reported as a boolean for the caller to surface.
//!
//! # Quick Start
//!
//! ```text
//! let mut store = Store::open_from_snapshot(&config.snapshot_path());
//!
//! let mut record = store.extract_from_document(&path);
//! record.add_tag("ml");
//! store.update(record);
//!
//! store.synchronize(&collection_dir);
//! ```
//!
//! # Modules
//!
//! - `store`: the record store (main entry point)
//! - `models`: the `Publication` record
//! - `checksum`: content-identity functions
//! - `document`: Markdown frontmatter plumbing
//! - `metadata`: extraction and sibling-copy writing
//! - `search`: tag/author predicates
//! - `sync`: file/record reconciliation
//! - `config`: application configuration

pub mod checksum;
pub mod config;
pub mod document;
pub mod error;
pub mod metadata;
pub mod models;
pub mod scan;
pub mod search;
pub mod store;
pub mod sync;

pub use checksum::{ContentIdentity, Crc32Identity};
pub use config::Config;
pub use document::DocumentFields;
pub use error::{ChecksumError, DocumentError};
pub use models::Publication;
pub use store::Store;
pub use sync::ReferenceIndex;
