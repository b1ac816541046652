//! Structured error handling and exit codes.

use serde::Serialize;

use crate::scanner::ScanError;

/// Exit codes for the DirDupe application.
///
/// - 0: Success (scan completed, with or without duplicates)
/// - 1: General error (bad configuration, output failure)
/// - 2: Filesystem error (root missing or a directory could not be listed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: Scan completed normally.
    Success = 0,
    /// General error: An unexpected error occurred.
    GeneralError = 1,
    /// Filesystem error: The scan was aborted.
    FilesystemError = 2,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DD000",
            Self::GeneralError => "DD001",
            Self::FilesystemError => "DD002",
        }
    }

    /// Pick the exit code for an application error.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        if err.chain().any(|cause| cause.is::<ScanError>()) {
            Self::FilesystemError
        } else {
            Self::GeneralError
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DD002")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Path involved, for filesystem errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        let path = err
            .chain()
            .find_map(|cause| cause.downcast_ref::<ScanError>())
            .map(|scan| scan.path().display().to_string());

        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
            path,
        }
    }
}
