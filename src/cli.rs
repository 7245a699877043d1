//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for terse using clap's derive macros.

use clap::{Parser, Subcommand};

use crate::models::{RedirectType, WriteOperation};

/// Terse - console for a Terse URL shortener
#[derive(Parser)]
#[command(name = "terse")]
#[command(version)]
#[command(about = "Manage shortened URLs on a Terse server", long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./config.toml when present)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show the table of shortened URLs
    List {
        /// Print the table as HTML
        #[arg(long)]
        html: bool,
    },

    /// Show one full record as JSON
    Show {
        /// Shortened URL
        key: String,
    },

    /// Create or change a shortened URL
    ///
    /// Usage: write <insert|update|upsert> <ORIGINAL_URL> [--short KEY]
    /// - Without --short the server assigns a key
    Write {
        /// insert, update or upsert
        operation: WriteOperation,

        /// Target URL
        original_url: String,

        /// Shortened URL to use
        #[arg(long, short = 's')]
        short: Option<String>,

        /// direct, meta or js
        #[arg(long, short = 'r', default_value = "direct")]
        redirect: RedirectType,

        /// Enable JavaScript tracking on the interstitial page
        #[arg(long)]
        js_tracking: bool,

        /// Preview title (meta/js redirects)
        #[arg(long)]
        title: Option<String>,

        /// OpenGraph entry, repeatable: --og og:image=https://...
        #[arg(long = "og", value_name = "KEY=VALUE")]
        og: Vec<String>,

        /// Twitter-card entry, repeatable: --twitter twitter:card=summary
        #[arg(long = "twitter", value_name = "KEY=VALUE")]
        twitter: Vec<String>,

        /// Fill unset preview fields from the original page
        #[arg(long)]
        inherit: bool,
    },

    /// Delete one or more shortened URLs
    Delete {
        /// Shortened URLs
        #[arg(required = true, num_args = 1..)]
        keys: Vec<String>,
    },

    /// Delete all data on the server
    DeleteAll {
        /// Confirm the purge
        #[arg(long)]
        yes: bool,
    },

    /// Export records to a JSON file
    ///
    /// One key → KEY.json, anything else → export.json
    Export {
        /// Shortened URLs (default: everything)
        keys: Vec<String>,

        /// Output directory (default: export.dir from config)
        #[arg(long)]
        dir: Option<String>,

        /// Print the document to stdout instead of writing a file
        #[arg(long)]
        stdout: bool,
    },

    /// Import records from an exported JSON file
    Import {
        /// Input file path
        file_path: String,

        /// Delete existing data before importing
        #[arg(long)]
        wipe: bool,
    },

    /// Search the server's corpus
    Search {
        /// Query text
        query: String,

        /// Print results as HTML table rows
        #[arg(long, conflicts_with = "markdown")]
        html: bool,

        /// Print results as a Markdown table
        #[arg(long)]
        markdown: bool,
    },

    /// Show the host prefix of shortened URLs
    Prefix,

    /// Show the preview metadata the server extracts from a page
    Meta {
        /// Original URL
        original_url: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Start TUI mode
    #[cfg(feature = "tui")]
    Tui,
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Force overwrite without confirmation
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

/// Split `key=value`; the value may itself contain `=`.
pub fn parse_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("Expected KEY=VALUE, got '{}'", raw)),
    }
}
