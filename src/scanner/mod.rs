//! Scanner module for directory traversal and fingerprinting.
//!
//! This module provides functionality for:
//! - Recursive, parallel directory listing into an immutable tree
//! - Structural fingerprints with BLAKE3
//! - Name-based ignore sets (version-control metadata by default)
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Recursive tree builder
//! - [`hasher`]: BLAKE3 directory fingerprints
//! - [`tree`]: The resulting [`DirectoryTree`] and structural equality
//!
//! # Example
//!
//! ```no_run
//! use dirdupe::scanner::{build_tree, ScanConfig};
//! use std::path::Path;
//!
//! let config = ScanConfig::default().with_io_threads(8);
//! let tree = build_tree(Path::new("."), &config).unwrap();
//! println!("{} directories, depth {}", tree.len(), tree.root().depth);
//! ```

pub mod hasher;
pub mod tree;
pub mod walker;

use std::collections::BTreeSet;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

// Re-export main types
pub use hasher::{fingerprint, fingerprint_to_hex, Fingerprint};
pub use tree::{DirectoryNode, DirectoryTree, NodeId};
pub use walker::{build_tree, Walker};

/// Entry names ignored by default: version-control metadata directories.
pub const DEFAULT_IGNORE: &[&str] = &[".git", ".hg", ".svn", ".bzr", "_darcs", "CVS"];

/// Default number of worker threads for the tree builder.
pub const DEFAULT_IO_THREADS: usize = 4;

/// Configuration for a single scan.
///
/// Each scan receives its own configuration, so scans with different
/// ignore policies can run side by side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    /// Entry names that are dropped at listing time.
    ///
    /// Matching is exact on the file name, at any level of the tree.
    pub ignore: BTreeSet<OsString>,

    /// Number of worker threads used to list sibling directories.
    pub io_threads: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            ignore: DEFAULT_IGNORE.iter().map(OsString::from).collect(),
            io_threads: DEFAULT_IO_THREADS,
        }
    }
}

impl ScanConfig {
    /// Create a configuration with an explicit ignore set.
    ///
    /// # Arguments
    ///
    /// * `ignore` - Entry names to drop
    /// * `io_threads` - Worker threads (clamped to at least 1)
    #[must_use]
    pub fn new<I, S>(ignore: I, io_threads: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            ignore: ignore.into_iter().map(Into::into).collect(),
            io_threads: io_threads.max(1),
        }
    }

    /// Replace the ignore set.
    #[must_use]
    pub fn with_ignore<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.ignore = names.into_iter().map(Into::into).collect();
        self
    }

    /// Add names to the ignore set.
    #[must_use]
    pub fn ignoring<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.ignore.extend(names.into_iter().map(Into::into));
        self
    }

    /// Set the worker thread count.
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Whether an entry name is ignored.
    #[must_use]
    pub fn is_ignored(&self, name: &OsStr) -> bool {
        self.ignore.contains(name)
    }
}

/// Errors that can occur during directory scanning.
///
/// Any of these aborts the whole scan.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when listing a directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while listing a directory.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::PermissionDenied(path) | Self::NotFound(path) | Self::NotADirectory(path) => {
                path
            }
            Self::Io { path, .. } => path,
        }
    }
}
