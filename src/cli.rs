//! Command-line interface definitions for DirDupe.
//!
//! This module defines all CLI arguments, subcommands, and options using the clap derive API.
//! The CLI follows standard conventions with global options (verbosity, color) and
//! a subcommand for the scan.
//!
//! # Example
//!
//! ```bash
//! # Find duplicated directory trees under ~/Backups
//! dirdupe scan ~/Backups
//!
//! # JSON output for scripting
//! dirdupe scan ~/Backups --output json
//!
//! # Also skip build output, only report trees at least two levels deep
//! dirdupe scan ~/src --ignore target --ignore node_modules --min-depth 2
//!
//! # Verbose mode for debugging
//! dirdupe -v scan ~/Backups
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Find directories whose whole recursive structure is duplicated.
///
/// DirDupe fingerprints every directory by the names of its entries and the
/// structure below it, then reports the outermost sets of identical trees.
#[derive(Debug, Parser)]
#[command(name = "dirdupe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors and results
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Report errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands for DirDupe.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Find structurally duplicated directories under a root
    Scan(ScanArgs),
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Root directory to scan
    #[arg(value_name = "ROOT")]
    pub path: PathBuf,

    /// Output format (text for people, json/csv for scripting)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Entry names to ignore (can be specified multiple times)
    ///
    /// Matched exactly against file and directory names at every level.
    /// Added to the configured ignore list.
    #[arg(short, long = "ignore", value_name = "NAME")]
    pub ignore_names: Vec<String>,

    /// Do not ignore version-control directories (.git, .hg, .svn, ...)
    #[arg(long)]
    pub no_default_ignores: bool,

    /// Number of threads used to list directories (default: 4)
    #[arg(long, value_name = "N")]
    pub io_threads: Option<usize>,

    /// Only report groups whose directories are at least N levels deep
    #[arg(long, value_name = "N")]
    pub min_depth: Option<usize>,

    /// Configuration file to use instead of the default location
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable list of groups
    #[default]
    Text,
    /// JSON output for scripting
    Json,
    /// CSV output for spreadsheets
    Csv,
}

impl OutputFormat {
    /// Whether the format is meant for machines (no progress spinner).
    #[must_use]
    pub fn is_machine_readable(self) -> bool {
        !matches!(self, Self::Text)
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
