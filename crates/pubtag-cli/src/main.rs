//! pubtag CLI
//!
//! Command-line interface for pubtag - checksum-identified publication
//! metadata management.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use pubtag_core::Config;

mod commands;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "pubtag")]
#[command(about = "pubtag - publication metadata by content checksum")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Snapshot file (defaults to the configured location)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display records extracted from a document or directory
    Show {
        /// Document file or directory
        entry: PathBuf,
    },
    /// Update a document's record and write its "(tagged)" copy
    Tag {
        /// Document file
        entry: PathBuf,
        /// New title
        #[arg(short = 'T', long)]
        title: Option<String>,
        /// Authors, separated by ';'
        #[arg(short, long)]
        authors: Option<String>,
        /// Tags, separated by ';'
        #[arg(short, long)]
        tags: Option<String>,
    },
    /// Write an "(untagged)" copy of a document with wiped metadata
    Untag {
        /// Document file
        entry: PathBuf,
    },
    /// Remove a document's record from the database
    #[command(alias = "rm")]
    Remove {
        /// Document file
        entry: PathBuf,
    },
    /// Search the database by tags and/or authors
    Search {
        /// Tag terms, separated by ';'
        #[arg(short, long)]
        tags: Option<String>,
        /// Author terms, separated by ';'
        #[arg(short, long)]
        authors: Option<String>,
        /// Directory to synchronize file references against
        #[arg(short, long)]
        sync: Option<PathBuf>,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, collection_dir)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands don't need the store
    if let Commands::Config { command } = &cli.command {
        return match command.clone() {
            Some(ConfigCommands::Show) | None => commands::config::show(&output),
            Some(ConfigCommands::Set { key, value }) => commands::config::set(key, value, &output),
        };
    }

    let config = Config::load()?;
    let snapshot = cli
        .database
        .clone()
        .unwrap_or_else(|| config.snapshot_path());

    match cli.command {
        Commands::Show { entry } => commands::show::run(&snapshot, &entry, &output),
        Commands::Tag {
            entry,
            title,
            authors,
            tags,
        } => commands::tag::run(&snapshot, &entry, title, authors, tags, &output),
        Commands::Untag { entry } => commands::untag::run(&entry, &output),
        Commands::Remove { entry } => commands::remove::run(&snapshot, &entry, &output),
        Commands::Search { tags, authors, sync } => {
            let sync_dir = sync.or(config.collection_dir);
            commands::search::run(&snapshot, tags, authors, sync_dir, &output)
        }
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}
