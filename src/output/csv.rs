//! CSV output formatter for scan results.
//!
//! One row is written per duplicated directory.
//!
//! # Columns
//!
//! - `group_id`: 1-based group number, in report order
//! - `fingerprint`: BLAKE3 structural fingerprint (hexadecimal)
//! - `depth`: nesting depth of the directory
//! - `entry_count`: number of immediate entries
//! - `path`: absolute directory path

use std::io;

use serde::Serialize;
use thiserror::Error;

use crate::duplicates::DuplicateGroup;

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    group_id: usize,
    fingerprint: &'a str,
    depth: usize,
    entry_count: usize,
    path: String,
}

/// CSV output formatter.
pub struct CsvOutput<'a> {
    groups: &'a [DuplicateGroup],
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter.
    #[must_use]
    pub fn new(groups: &'a [DuplicateGroup]) -> Self {
        Self { groups }
    }

    /// Write the header and one row per directory.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        for (idx, group) in self.groups.iter().enumerate() {
            let fingerprint = group.fingerprint_hex();
            for path in &group.paths {
                csv_writer.serialize(CsvRow {
                    group_id: idx + 1,
                    fingerprint: &fingerprint,
                    depth: group.depth,
                    entry_count: group.entry_count,
                    path: path.to_string_lossy().into_owned(),
                })?;
            }
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Render the CSV document into a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
