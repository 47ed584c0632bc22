//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use std::collections::HashSet;

use pubtag_core::{Publication, Store};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a single publication, with its file references when known
    pub fn print_publication(&self, store: &Store, publication: &Publication) {
        match self.format {
            OutputFormat::Human => {
                println!("{}", "-".repeat(70));
                println!("{}", publication);
                let references = store.references(publication.identifier);
                if !references.is_empty() {
                    println!("FILE REFERENCES:");
                    for path in &references {
                        println!("- {}", path.display());
                    }
                }
                println!("{}", "-".repeat(70));
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(publication).unwrap());
            }
            OutputFormat::Quiet => {
                println!("{}", publication.identifier);
            }
        }
    }

    /// Print a set of search results
    pub fn print_results(&self, store: &Store, results: &HashSet<Publication>) {
        match self.format {
            OutputFormat::Human => {
                if results.is_empty() {
                    println!("No publications found.");
                    return;
                }
                // Stable order for humans
                let mut sorted: Vec<_> = results.iter().collect();
                sorted.sort_by_key(|p| p.identifier);
                for publication in sorted {
                    self.print_publication(store, publication);
                }
                println!("\n{} publication(s)", results.len());
            }
            OutputFormat::Json => {
                let mut sorted: Vec<_> = results.iter().collect();
                sorted.sort_by_key(|p| p.identifier);
                println!("{}", serde_json::to_string_pretty(&sorted).unwrap());
            }
            OutputFormat::Quiet => {
                for publication in results {
                    println!("{}", publication.identifier);
                }
            }
        }
    }

    /// Print a status message (suppressed in quiet mode)
    pub fn message(&self, text: &str) {
        if !self.is_quiet() {
            println!("{}", text);
        }
    }
}
