//! Output formatters for scan results.
//!
//! - [`text`] for people, with optional colors
//! - [`json`] for automation and scripting
//! - [`csv`] for spreadsheet import
//!
//! # Example
//!
//! ```no_run
//! use dirdupe::duplicates::DirectoryFinder;
//! use dirdupe::error::ExitCode;
//! use dirdupe::output::JsonOutput;
//! use std::path::Path;
//!
//! let (groups, summary) = DirectoryFinder::with_defaults()
//!     .find_duplicates(Path::new("."))
//!     .unwrap();
//!
//! let output = JsonOutput::new(&groups, &summary, ExitCode::Success);
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

pub mod csv;
pub mod json;
pub mod text;

use std::io::Write;

use anyhow::Result;

use crate::cli::OutputFormat;
use crate::duplicates::{DuplicateGroup, ScanSummary};
use crate::error::ExitCode;

pub use self::csv::CsvOutput;
pub use self::json::JsonOutput;
pub use self::text::TextOutput;

/// Write a finished scan in the requested format.
///
/// # Errors
///
/// Returns an error if formatting or writing fails.
pub fn write_report<W: Write>(
    writer: &mut W,
    format: OutputFormat,
    groups: &[DuplicateGroup],
    summary: &ScanSummary,
) -> Result<()> {
    match format {
        OutputFormat::Text => TextOutput::new(groups, summary).write_to(writer)?,
        OutputFormat::Json => {
            JsonOutput::new(groups, summary, ExitCode::Success).write_to(writer, true)?;
        }
        OutputFormat::Csv => CsvOutput::new(groups).write_to(&mut *writer)?,
    }
    writer.flush()?;
    Ok(())
}
