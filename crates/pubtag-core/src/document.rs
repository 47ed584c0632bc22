//! Markdown document plumbing
//!
//! A document's metadata dictionary is its YAML frontmatter block:
//!
//! ```markdown
//! ---
//! title: Adaptive Devices
//! authors: Ana Lima; Bob Reis
//! keywords: ml; adaptive automata
//! ---
//!
//! Document body...
//! ```
//!
//! Author and keyword lists are flat strings delimited by `;`. A document
//! without a frontmatter block simply has empty metadata.

use std::fmt::Write as _;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DocumentError;

const FENCE: &str = "---";

/// The metadata dictionary of a document
///
/// Flat string fields; `authors` and `keywords` are `;`-delimited lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentFields {
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub authors: String,

    #[serde(default)]
    pub keywords: String,
}

/// Split a document into its frontmatter block and body
///
/// Returns `(Some(yaml), body)` when a `---`-fenced block opens the
/// document, `(None, content)` otherwise. The opening fence must be the
/// very first line.
pub fn split_frontmatter(content: &str) -> (Option<&str>, &str) {
    let Some(rest) = content.strip_prefix(FENCE) else {
        return (None, content);
    };
    let Some(rest) = rest.strip_prefix('\n') else {
        return (None, content);
    };
    match rest.find("\n---") {
        Some(end) => {
            let yaml = &rest[..end + 1];
            let body = rest[end + 4..].trim_start_matches('\n');
            (Some(yaml), body)
        }
        None => (None, content),
    }
}

/// Parse a document's metadata dictionary
///
/// Unknown frontmatter keys are tolerated and ignored. A missing block
/// yields default (empty) fields; an unparsable block is an error.
pub fn parse_fields(path: &Path, content: &str) -> Result<(DocumentFields, String), DocumentError> {
    let (frontmatter, body) = split_frontmatter(content);
    let fields = match frontmatter {
        Some(yaml) => {
            serde_yml::from_str(yaml).map_err(|e| DocumentError::InvalidMetadata {
                path: path.to_path_buf(),
                details: e.to_string(),
            })?
        }
        None => DocumentFields::default(),
    };
    Ok((fields, body.to_string()))
}

/// Assemble a document from metadata fields and a body
///
/// The emitted frontmatter contains exactly the three conventional fields,
/// replacing whatever dictionary the source carried.
pub fn assemble(fields: &DocumentFields, body: &str) -> String {
    let mut out = String::new();
    // Values are quoted through serde_yml so delimiters and colons survive
    let yaml = serde_yml::to_string(fields).unwrap_or_default();
    let _ = write!(out, "{}\n{}{}\n", FENCE, yaml, FENCE);
    if !body.is_empty() {
        let _ = write!(out, "\n{}", body);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_split_frontmatter_present() {
        let content = "---\ntitle: A Title\n---\n\nBody text.\n";
        let (frontmatter, body) = split_frontmatter(content);
        assert_eq!(frontmatter, Some("title: A Title\n"));
        assert_eq!(body, "Body text.\n");
    }

    #[test]
    fn test_split_frontmatter_absent() {
        let content = "# Just a heading\n\nBody.\n";
        let (frontmatter, body) = split_frontmatter(content);
        assert!(frontmatter.is_none());
        assert_eq!(body, content);
    }

    #[test]
    fn test_split_frontmatter_unterminated() {
        let content = "---\ntitle: never closed\n";
        let (frontmatter, body) = split_frontmatter(content);
        assert!(frontmatter.is_none());
        assert_eq!(body, content);
    }

    #[test]
    fn test_parse_fields() {
        let content = "---\ntitle: Adaptive Devices\nauthors: Ana Lima; Bob Reis\nkeywords: ml; automata\n---\n\nBody.\n";
        let (fields, body) = parse_fields(&PathBuf::from("doc.md"), content).unwrap();
        assert_eq!(fields.title, "Adaptive Devices");
        assert_eq!(fields.authors, "Ana Lima; Bob Reis");
        assert_eq!(fields.keywords, "ml; automata");
        assert_eq!(body, "Body.\n");
    }

    #[test]
    fn test_parse_fields_missing_block() {
        let content = "No metadata here.\n";
        let (fields, body) = parse_fields(&PathBuf::from("doc.md"), content).unwrap();
        assert_eq!(fields, DocumentFields::default());
        assert_eq!(body, content);
    }

    #[test]
    fn test_parse_fields_unknown_keys_tolerated() {
        let content = "---\ntitle: T\nsubject: dropped on write\n---\nBody\n";
        let (fields, _) = parse_fields(&PathBuf::from("doc.md"), content).unwrap();
        assert_eq!(fields.title, "T");
    }

    #[test]
    fn test_parse_fields_invalid_yaml() {
        let content = "---\ntitle: [unclosed\n---\nBody\n";
        assert!(parse_fields(&PathBuf::from("doc.md"), content).is_err());
    }

    #[test]
    fn test_assemble_round_trip() {
        let fields = DocumentFields {
            title: "A Title: with a colon".to_string(),
            authors: "Ana; Bob".to_string(),
            keywords: "ml; theory".to_string(),
        };
        let assembled = assemble(&fields, "The body.\n");
        let (parsed, body) = parse_fields(&PathBuf::from("doc.md"), &assembled).unwrap();
        assert_eq!(parsed, fields);
        assert_eq!(body, "The body.\n");
    }

    #[test]
    fn test_assemble_empty_body() {
        let assembled = assemble(&DocumentFields::default(), "");
        assert!(assembled.starts_with("---\n"));
        assert!(assembled.trim_end().ends_with("---"));
    }
}
