//! DirDupe - duplicated directory tree finder
//!
//! Scans a directory tree in parallel, fingerprints every directory by its
//! entry names and the structure beneath it, and reports the outermost sets
//! of structurally identical directories.
//!
//! # Example
//!
//! ```no_run
//! use dirdupe::duplicates::DirectoryFinder;
//! use std::path::Path;
//!
//! let (groups, _summary) = DirectoryFinder::with_defaults()
//!     .find_duplicates(Path::new("/backups"))
//!     .unwrap();
//! for group in groups {
//!     println!("{:?}", group.paths);
//! }
//! ```

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;

use std::io::{self, IsTerminal};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cli::{Cli, Commands, ScanArgs};
use crate::config::{Config, ConfigOverrides};
use crate::duplicates::{DirectoryFinder, FinderConfig};
use crate::error::ExitCode;
use crate::progress::Progress;

/// Run the application for parsed command-line arguments.
///
/// Nothing is written to stdout unless the scan completes.
///
/// # Errors
///
/// Returns an error for invalid configuration, any filesystem failure during
/// the scan, or a failure writing the report.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);
    output::text::set_color(!cli.no_color && io::stdout().is_terminal());

    match cli.command {
        Commands::Scan(args) => run_scan(&args, cli.quiet),
    }
}

fn run_scan(args: &ScanArgs, quiet: bool) -> Result<ExitCode> {
    let config = Config::load(args.config.as_deref(), &ConfigOverrides::from(args))?;
    let scan_config = config.scan_config(&args.ignore_names, args.no_default_ignores);
    log::debug!(
        "Ignoring {} names, {} io threads",
        scan_config.ignore.len(),
        scan_config.io_threads
    );

    let mut finder_config = FinderConfig::default()
        .with_scan_config(scan_config)
        .with_min_depth(config.min_depth);

    let show_progress =
        !quiet && !config.output.is_machine_readable() && io::stderr().is_terminal();
    if show_progress {
        finder_config = finder_config.with_progress_callback(Arc::new(Progress::new()));
    }

    let (groups, summary) = DirectoryFinder::new(finder_config)
        .find_duplicates(&args.path)
        .with_context(|| format!("Scan of {} failed", args.path.display()))?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    output::write_report(&mut handle, config.output, &groups, &summary)
        .context("Failed to write report")?;

    Ok(ExitCode::Success)
}
