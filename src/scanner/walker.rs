//! Recursive tree builder with parallel sibling traversal.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct, which lists a directory, sorts
//! and filters its entries, descends into every subdirectory and returns a
//! [`DirectoryTree`] with fingerprints already computed.
//!
//! The walk proceeds one nesting level at a time: every directory of a level
//! is listed in parallel, then the next level is formed from their
//! subdirectories. Depth and fingerprints are folded bottom-up afterwards.
//! Neither step recurses, so arbitrarily deep trees use a bounded stack.
//!
//! # Features
//!
//! - Directories of one level are listed on a bounded rayon thread pool
//! - Children are always combined in sorted-name order, so fingerprints do
//!   not depend on scheduling
//! - Name-based ignore set applied at listing time
//! - Symlinks are listed as plain entries and never followed
//! - Fail-fast: the first unreadable directory aborts the scan
//!
//! # Example
//!
//! ```no_run
//! use dirdupe::scanner::{ScanConfig, Walker};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Photos"), ScanConfig::default());
//! let tree = walker.build().unwrap();
//! for (_, node) in tree.iter() {
//!     println!("{} ({} entries)", node.path.display(), node.size());
//! }
//! ```

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use super::hasher::fingerprint;
use super::tree::{DirectoryNode, DirectoryTree, NodeId};
use super::{ScanConfig, ScanError};
use crate::progress::ProgressCallback;

/// Build the directory tree rooted at `root`.
///
/// Convenience wrapper around [`Walker::build`].
///
/// # Errors
///
/// Returns [`ScanError`] if the root is missing or not a directory, or if
/// any directory below it cannot be listed.
pub fn build_tree(root: &Path, config: &ScanConfig) -> Result<DirectoryTree, ScanError> {
    Walker::new(root, config.clone()).build()
}

/// Recursive directory tree builder.
pub struct Walker {
    /// Root path to scan
    root: PathBuf,
    /// Scan configuration
    config: ScanConfig,
    /// Optional progress callback
    progress_callback: Option<Arc<dyn ProgressCallback>>,
    /// Directories listed so far
    scanned: AtomicUsize,
}

impl std::fmt::Debug for Walker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Walker")
            .field("root", &self.root)
            .field("config", &self.config)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .field("scanned", &self.scanned)
            .finish()
    }
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Arguments
    ///
    /// * `path` - Root directory to scan
    /// * `config` - Scan configuration
    #[must_use]
    pub fn new(path: &Path, config: ScanConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
            progress_callback: None,
            scanned: AtomicUsize::new(0),
        }
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Number of directories listed so far.
    #[must_use]
    pub fn directories_scanned(&self) -> usize {
        self.scanned.load(Ordering::Relaxed)
    }

    /// Scan the root and build the tree.
    ///
    /// The root path is made absolute (without resolving symlinks) before the
    /// scan starts, so every node carries an absolute path.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError`] on the first filesystem failure. No partial tree
    /// is returned.
    pub fn build(&self) -> Result<DirectoryTree, ScanError> {
        let root = self.validate_root()?;

        log::debug!(
            "Building tree for {} with {} threads, ignoring {:?}",
            root.display(),
            self.config.io_threads,
            self.config.ignore
        );

        let listed = match rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.io_threads)
            .build()
        {
            Ok(pool) => pool.install(|| self.list_levels(root))?,
            Err(e) => {
                log::warn!(
                    "Failed to create custom thread pool ({}), using global pool with {} threads",
                    e,
                    rayon::current_num_threads()
                );
                self.list_levels(root)?
            }
        };

        let tree = DirectoryTree::from_nodes(fold_tree(listed));
        log::debug!(
            "Tree complete: {} directories, depth {}",
            tree.len(),
            tree.root().depth
        );
        Ok(tree)
    }

    /// Check that the root exists and is a directory, and make it absolute.
    fn validate_root(&self) -> Result<PathBuf, ScanError> {
        let metadata = fs::metadata(&self.root).map_err(|e| handle_io_error(&self.root, e))?;
        if !metadata.is_dir() {
            return Err(ScanError::NotADirectory(self.root.clone()));
        }

        std::path::absolute(&self.root).map_err(|e| handle_io_error(&self.root, e))
    }

    /// List every directory below `root`, one nesting level at a time.
    ///
    /// The result is in breadth-first order with the root first. Each entry
    /// knows its parent and, once the next level is listed, its children in
    /// sorted-name order.
    fn list_levels(&self, root: PathBuf) -> Result<Vec<ListedDir>, ScanError> {
        let mut listed: Vec<ListedDir> = Vec::new();
        let mut level = vec![(root, None)];

        while !level.is_empty() {
            // Indexed parallel iterator: collect keeps the level order.
            let dirs: Vec<ListedDir> = level
                .into_par_iter()
                .map(|(path, parent)| self.list_one(path, parent))
                .collect::<Result<_, ScanError>>()?;

            let mut next = Vec::new();
            for dir in dirs {
                let index = listed.len();
                if let Some(parent) = dir.parent {
                    listed[parent].children.push(index);
                }
                next.extend(
                    dir.subdirs
                        .iter()
                        .map(|name| (dir.path.join(name), Some(index))),
                );
                listed.push(dir);
            }

            log::trace!("Level done: {} directories listed", listed.len());
            level = next;
        }

        Ok(listed)
    }

    /// List a single directory and report progress for it.
    fn list_one(&self, path: PathBuf, parent: Option<usize>) -> Result<ListedDir, ScanError> {
        log::trace!("Opening: {}", path.display());

        let listing = self.list_dir(&path)?;

        let count = self.scanned.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(ref callback) = self.progress_callback {
            callback.on_progress(count, path.to_string_lossy().as_ref());
        }

        let mut entries = Vec::with_capacity(listing.len());
        let mut subdirs = Vec::new();
        for (name, is_dir) in listing {
            if is_dir {
                subdirs.push(name.clone());
            }
            entries.push(name);
        }

        Ok(ListedDir {
            path,
            parent,
            entries,
            subdirs,
            children: Vec::new(),
        })
    }

    /// List the immediate entries of a directory.
    ///
    /// Returns `(name, is_dir)` pairs sorted by name with ignored names
    /// removed. `is_dir` comes from the directory listing and is `false` for
    /// symlinks, even when they point at a directory.
    fn list_dir(&self, path: &Path) -> Result<Vec<(OsString, bool)>, ScanError> {
        let read_dir = fs::read_dir(path).map_err(|e| handle_io_error(path, e))?;

        let mut listing = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| handle_io_error(path, e))?;
            let name = entry.file_name();

            if self.config.is_ignored(&name) {
                log::trace!("Ignoring entry: {}", entry.path().display());
                continue;
            }

            let file_type = entry
                .file_type()
                .map_err(|e| handle_io_error(&entry.path(), e))?;
            listing.push((name, file_type.is_dir()));
        }

        listing.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(listing)
    }
}

/// A listed directory, before it is placed in the tree.
#[derive(Debug)]
struct ListedDir {
    path: PathBuf,
    parent: Option<usize>,
    entries: Vec<OsString>,
    /// Subdirectory names, sorted
    subdirs: Vec<OsString>,
    /// Indices of the listed subdirectories, parallel to `subdirs`
    children: Vec<usize>,
}

/// Lay breadth-first listings out in pre-order and compute depth and
/// fingerprints bottom-up.
fn fold_tree(mut listed: Vec<ListedDir>) -> Vec<DirectoryNode> {
    // Pre-order position of every listing.
    let mut order = Vec::with_capacity(listed.len());
    let mut stack = vec![0];
    while let Some(index) = stack.pop() {
        order.push(index);
        stack.extend(listed[index].children.iter().rev());
    }

    let mut position = vec![0; listed.len()];
    for (pos, &index) in order.iter().enumerate() {
        position[index] = pos;
    }

    let mut nodes: Vec<DirectoryNode> = Vec::with_capacity(order.len());
    for &index in &order {
        let dir = &mut listed[index];
        let subdirectories: BTreeMap<OsString, NodeId> = std::mem::take(&mut dir.subdirs)
            .into_iter()
            .zip(dir.children.iter().map(|&child| NodeId(position[child])))
            .collect();

        nodes.push(DirectoryNode {
            path: std::mem::take(&mut dir.path),
            entries: std::mem::take(&mut dir.entries),
            subdirectories,
            parent: dir.parent.map(|parent| NodeId(position[parent])),
            depth: 0,
            fingerprint: [0; 32],
        });
    }

    // Children always follow their parent in pre-order.
    for index in (0..nodes.len()).rev() {
        let node = &nodes[index];
        let depth = node
            .subdirectories
            .values()
            .map(|child| nodes[child.index()].depth + 1)
            .max()
            .unwrap_or(0);
        let fp = fingerprint(
            &node.entries,
            node.subdirectories
                .values()
                .map(|child| &nodes[child.index()].fingerprint),
        );

        nodes[index].depth = depth;
        nodes[index].fingerprint = fp;
    }

    nodes
}

/// Map an I/O error to a [`ScanError`].
fn handle_io_error(path: &Path, error: std::io::Error) -> ScanError {
    use std::io::ErrorKind;

    match error.kind() {
        ErrorKind::PermissionDenied => {
            log::warn!("Permission denied: {}", path.display());
            ScanError::PermissionDenied(path.to_path_buf())
        }
        ErrorKind::NotFound => {
            log::debug!("Path not found: {}", path.display());
            ScanError::NotFound(path.to_path_buf())
        }
        _ => {
            log::warn!("I/O error for {}: {}", path.display(), error);
            ScanError::Io {
                path: path.to_path_buf(),
                source: error,
            }
        }
    }
}
