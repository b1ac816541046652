//! JSON output formatter for scan results.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "duplicates": [
//!     {
//!       "fingerprint": "ab12...",
//!       "depth": 2,
//!       "entry_count": 3,
//!       "directories": ["/backup/photos", "/old/photos"]
//!     }
//!   ],
//!   "summary": {
//!     "directories_scanned": 120,
//!     "max_depth": 6,
//!     "duplicate_groups": 1,
//!     "duplicate_directories": 1,
//!     ...
//!   }
//! }
//! ```

use std::io::Write;

use serde::Serialize;

use crate::duplicates::{DuplicateGroup, ScanSummary};
use crate::error::ExitCode;
use crate::scanner::fingerprint_to_hex;

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateGroup {
    /// BLAKE3 fingerprint as hexadecimal (64 characters)
    pub fingerprint: String,
    /// Nesting depth shared by every member
    pub depth: usize,
    /// Number of entries directly inside each member
    pub entry_count: usize,
    /// Absolute member paths, in scan order
    pub directories: Vec<String>,
}

impl From<&DuplicateGroup> for JsonDuplicateGroup {
    fn from(group: &DuplicateGroup) -> Self {
        Self {
            fingerprint: group.fingerprint_hex(),
            depth: group.depth,
            entry_count: group.entry_count,
            directories: group
                .paths
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect(),
        }
    }
}

/// A directory left out of a group because only its fingerprint matched.
#[derive(Debug, Clone, Serialize)]
pub struct JsonCollision {
    pub fingerprint: String,
    pub representative: String,
    pub candidate: String,
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    pub directories_scanned: usize,
    pub max_depth: usize,
    pub raw_groups: usize,
    pub dominated_groups: usize,
    pub hidden_by_depth: usize,
    pub duplicate_groups: usize,
    pub duplicate_directories: usize,
    pub collisions: Vec<JsonCollision>,
    pub build_duration_ms: u64,
    pub scan_duration_ms: u64,
    pub exit_code: i32,
    /// Machine-readable exit code name (e.g. "DD000")
    pub exit_code_name: String,
}

impl JsonSummary {
    /// Create a JSON summary from a [`ScanSummary`] and an exit code.
    #[must_use]
    pub fn from_scan_summary(summary: &ScanSummary, exit_code: ExitCode) -> Self {
        Self {
            directories_scanned: summary.directories_scanned,
            max_depth: summary.max_depth,
            raw_groups: summary.raw_groups,
            dominated_groups: summary.dominated_groups,
            hidden_by_depth: summary.hidden_by_depth,
            duplicate_groups: summary.duplicate_groups,
            duplicate_directories: summary.duplicate_directories,
            collisions: summary
                .collision_mismatches
                .iter()
                .map(|m| JsonCollision {
                    fingerprint: fingerprint_to_hex(&m.fingerprint),
                    representative: m.representative.to_string_lossy().into_owned(),
                    candidate: m.candidate.to_string_lossy().into_owned(),
                })
                .collect(),
            build_duration_ms: summary.build_duration.as_millis() as u64,
            scan_duration_ms: summary.scan_duration.as_millis() as u64,
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    pub duplicates: Vec<JsonDuplicateGroup>,
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Create the JSON document for one scan.
    ///
    /// # Example
    ///
    /// ```
    /// use dirdupe::duplicates::{DuplicateGroup, ScanSummary};
    /// use dirdupe::error::ExitCode;
    /// use dirdupe::output::json::JsonOutput;
    /// use std::path::PathBuf;
    ///
    /// let groups = vec![DuplicateGroup::new(
    ///     [0u8; 32],
    ///     1,
    ///     2,
    ///     vec![PathBuf::from("/a"), PathBuf::from("/b")],
    /// )];
    /// let output = JsonOutput::new(&groups, &ScanSummary::default(), ExitCode::Success);
    /// assert_eq!(output.duplicates[0].directories.len(), 2);
    /// ```
    #[must_use]
    pub fn new(groups: &[DuplicateGroup], summary: &ScanSummary, exit_code: ExitCode) -> Self {
        Self {
            duplicates: groups.iter().map(JsonDuplicateGroup::from).collect(),
            summary: JsonSummary::from_scan_summary(summary, exit_code),
        }
    }

    /// Serialize to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error during JSON output: {0}")]
    Io(#[from] std::io::Error),
}
