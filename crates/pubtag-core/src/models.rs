//! Data models for pubtag
//!
//! Defines the `Publication` record: a title, an ordered author list and a
//! tag set, keyed by the checksum of the source document's bytes.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Delimiter between entries in flattened author/keyword strings
pub const LIST_DELIMITER: char = ';';

/// A publication record
///
/// Identified by the checksum of its source document. Two publications are
/// equal iff their identifiers match; title, authors and tags never
/// participate in equality or hashing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Publication {
    /// Checksum of the source document's bytes at extraction time
    pub identifier: u64,
    /// Display title
    pub title: String,
    /// Ordered author list (duplicates permitted)
    pub authors: Vec<String>,
    /// Tag set, stored lowercase and trimmed
    pub tags: BTreeSet<String>,
}

impl Publication {
    /// Create a new publication with the given identifier
    pub fn new(identifier: u64) -> Self {
        Self {
            identifier,
            title: String::new(),
            authors: Vec::new(),
            tags: BTreeSet::new(),
        }
    }

    /// The blank publication: identifier 0, empty fields
    ///
    /// Returned wherever metadata extraction fails; callers decide whether
    /// a blank record is acceptable.
    pub fn blank() -> Self {
        Self::new(0)
    }

    /// Check whether this is the blank publication
    pub fn is_blank(&self) -> bool {
        self.identifier == 0
            && self.title.is_empty()
            && self.authors.is_empty()
            && self.tags.is_empty()
    }

    /// Check whether the publication carries the given tag (exact, stored form)
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Add a tag, normalized to lowercase and trimmed
    ///
    /// Returns `true` if the tag was not already present.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        self.tags.insert(normalize_tag(tag))
    }

    /// Remove a tag
    pub fn remove_tag(&mut self, tag: &str) -> bool {
        self.tags.remove(&normalize_tag(tag))
    }

    /// Check whether the publication lists the given author (exact)
    pub fn has_author(&self, author: &str) -> bool {
        self.authors.iter().any(|a| a == author)
    }

    /// Append an author
    pub fn add_author(&mut self, author: &str) {
        self.authors.push(author.trim().to_string());
    }

    /// Remove the first occurrence of an author
    pub fn remove_author(&mut self, author: &str) -> bool {
        if let Some(pos) = self.authors.iter().position(|a| a == author) {
            self.authors.remove(pos);
            true
        } else {
            false
        }
    }

    /// Replace the tag set from a `;`-delimited string
    pub fn set_tags_from_str(&mut self, text: &str) {
        self.tags = text.split(LIST_DELIMITER).map(normalize_tag).collect();
    }

    /// Replace the author list from a `;`-delimited string
    pub fn set_authors_from_str(&mut self, text: &str) {
        self.authors = text
            .split(LIST_DELIMITER)
            .map(|a| a.trim().to_string())
            .collect();
    }

    /// The author list as a single `; `-joined string
    pub fn flattened_authors(&self) -> String {
        if self.authors.is_empty() {
            "<no authors given>".to_string()
        } else {
            self.authors.join("; ")
        }
    }

    /// The tag set as a single `; `-joined string
    pub fn flattened_tags(&self) -> String {
        if self.tags.is_empty() {
            "<no tags given>".to_string()
        } else {
            self.tags.iter().cloned().collect::<Vec<_>>().join("; ")
        }
    }

    /// Check whether any stored tag equals any normalized query term
    ///
    /// Exact match after lowercase, whitespace collapse and trim; never a
    /// substring match.
    pub fn has_any_tags(&self, query: &BTreeSet<String>) -> bool {
        let query: BTreeSet<String> = query.iter().map(|t| normalize_tag(t)).collect();
        self.tags.iter().any(|t| query.contains(t))
    }

    /// Check whether any author contains any query term as a substring
    ///
    /// Case-insensitive and whitespace-normalized on both sides. Authors
    /// are intentionally matched fuzzily where tags are matched exactly.
    pub fn has_any_authors(&self, query: &BTreeSet<String>) -> bool {
        self.authors.iter().any(|author| {
            let author = collapse_whitespace(author).to_lowercase();
            query
                .iter()
                .any(|term| author.contains(&term.trim().to_lowercase()))
        })
    }

    /// Normalize all text fields in place
    ///
    /// Collapses whitespace and trims the title and every author; tags are
    /// additionally lowercased.
    pub fn sanitize(&mut self) {
        self.title = collapse_whitespace(&self.title);
        self.authors = self.authors.iter().map(|a| collapse_whitespace(a)).collect();
        self.tags = self.tags.iter().map(|t| normalize_tag(t)).collect();
    }

    /// Drop blank entries from the author list and tag set
    pub fn clean_collections(&mut self) {
        self.authors.retain(|a| !a.trim().is_empty());
        self.tags.retain(|t| !t.trim().is_empty());
    }
}

impl PartialEq for Publication {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier
    }
}

impl Eq for Publication {}

impl Hash for Publication {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identifier.hash(state);
    }
}

impl fmt::Display for Publication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_blank() {
            return write!(f, "<empty publication>");
        }
        writeln!(
            f,
            "TITLE: {}",
            if self.title.is_empty() {
                "<no title given>"
            } else {
                &self.title
            }
        )?;
        if self.authors.is_empty() {
            writeln!(f, "AUTHORS: <no authors given>")?;
        } else {
            writeln!(f, "AUTHORS:")?;
            for author in &self.authors {
                writeln!(f, "- {}", author)?;
            }
        }
        if self.tags.is_empty() {
            write!(f, "TAGS: <no tags given>")?;
        } else {
            write!(f, "TAGS:")?;
            for tag in &self.tags {
                write!(f, "\n- {}", tag)?;
            }
        }
        Ok(())
    }
}

/// Collapse runs of whitespace to single spaces and trim
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize a tag: collapse whitespace, trim, lowercase
pub fn normalize_tag(tag: &str) -> String {
    collapse_whitespace(tag).to_lowercase()
}
