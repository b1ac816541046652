//! Duplicate directory finder.
//!
//! # Overview
//!
//! This module orchestrates the detection pipeline:
//! 1. **Build** - Scan the root into a fingerprinted [`DirectoryTree`]
//! 2. **Collect** - Bucket directories by fingerprint and verify structure
//!    (see [`crate::duplicates::groups`])
//! 3. **Dominance** - Drop groups nested inside other duplicate groups
//!    (see [`crate::duplicates::dominance`])
//!
//! # Example
//!
//! ```no_run
//! use dirdupe::duplicates::{DirectoryFinder, FinderConfig};
//! use dirdupe::scanner::ScanConfig;
//! use std::path::Path;
//!
//! let config = FinderConfig::default().with_scan_config(ScanConfig::default().with_io_threads(8));
//! let finder = DirectoryFinder::new(config);
//!
//! let (groups, summary) = finder.find_duplicates(Path::new("/some/path")).unwrap();
//! println!("Scanned {} directories", summary.directories_scanned);
//! for group in &groups {
//!     println!("{:?}", group.paths);
//! }
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::progress::ProgressCallback;
use crate::scanner::{DirectoryTree, ScanConfig, ScanError, Walker};

use super::dominance::filter_dominated;
use super::groups::{collect_groups, CollisionMismatch, DuplicateGroup};

/// Configuration for the duplicate finder.
#[derive(Clone, Default)]
pub struct FinderConfig {
    /// Scan configuration (ignore set, worker threads).
    pub scan: ScanConfig,
    /// Hide reported groups whose directories are shallower than this.
    /// Applied after dominance filtering; 0 shows everything.
    pub min_depth: usize,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("scan", &self.scan)
            .field("min_depth", &self.min_depth)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl FinderConfig {
    /// Set the scan configuration.
    #[must_use]
    pub fn with_scan_config(mut self, scan: ScanConfig) -> Self {
        self.scan = scan;
        self
    }

    /// Set the minimum reported depth.
    #[must_use]
    pub fn with_min_depth(mut self, depth: usize) -> Self {
        self.min_depth = depth;
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Summary statistics from a directory scan.
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    /// Number of directories in the tree, root included
    pub directories_scanned: usize,
    /// Nesting depth of the root
    pub max_depth: usize,
    /// Verified groups before dominance filtering
    pub raw_groups: usize,
    /// Groups dropped because an ancestor is itself duplicated
    pub dominated_groups: usize,
    /// Maximal groups hidden by the minimum depth
    pub hidden_by_depth: usize,
    /// Groups reported
    pub duplicate_groups: usize,
    /// Reported directories beyond the first of each group
    pub duplicate_directories: usize,
    /// Directories excluded because of fingerprint collisions
    pub collision_mismatches: Vec<CollisionMismatch>,
    /// Time spent building the tree
    pub build_duration: Duration,
    /// Duration of the entire scan
    pub scan_duration: Duration,
}

/// Duplicate directory finder.
pub struct DirectoryFinder {
    config: FinderConfig,
}

impl DirectoryFinder {
    /// Create a new finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self { config }
    }

    /// Create a new finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Find all maximal duplicate directory groups below `path`.
    ///
    /// Groups are returned in ascending fingerprint order; paths within a
    /// group are in scan order.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError`] if the path is missing, not a directory, or any
    /// directory below it cannot be listed. Nothing is reported in that case.
    pub fn find_duplicates(
        &self,
        path: &Path,
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), ScanError> {
        let start_time = Instant::now();
        log::info!("Starting directory scan of {}", path.display());

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start("building", 0);
        }

        let mut walker = Walker::new(path, self.config.scan.clone());
        if let Some(ref callback) = self.config.progress_callback {
            walker = walker.with_progress_callback(callback.clone());
        }
        let built = walker.build();

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end("building");
        }
        let tree = built?;
        let build_duration = start_time.elapsed();

        log::info!(
            "Scanned {} directories in {:?}",
            tree.len(),
            build_duration
        );

        let (groups, mut summary) = self.find_in_tree(&tree);
        summary.build_duration = build_duration;
        summary.scan_duration = start_time.elapsed();

        Ok((groups, summary))
    }

    /// Run the grouping phases on an already built tree.
    #[must_use]
    pub fn find_in_tree(&self, tree: &DirectoryTree) -> (Vec<DuplicateGroup>, ScanSummary) {
        let mut summary = ScanSummary {
            directories_scanned: tree.len(),
            max_depth: tree.root().depth,
            ..Default::default()
        };

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start("grouping", tree.len());
        }

        let collected = collect_groups(tree);
        summary.raw_groups = collected.groups.len();
        summary.collision_mismatches = collected.mismatches;

        let (maximal, dominated) = filter_dominated(tree, collected.groups);
        summary.dominated_groups = dominated;

        let maximal_count = maximal.len();
        let groups: Vec<DuplicateGroup> = maximal
            .iter()
            .map(|raw| DuplicateGroup::from_raw(tree, raw))
            .filter(|group| group.depth >= self.config.min_depth)
            .collect();
        summary.hidden_by_depth = maximal_count - groups.len();

        summary.duplicate_groups = groups.len();
        summary.duplicate_directories = groups.iter().map(DuplicateGroup::duplicate_count).sum();

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end("grouping");
        }

        log::info!(
            "Found {} duplicate groups ({} nested groups suppressed, {} collisions)",
            summary.duplicate_groups,
            summary.dominated_groups,
            summary.collision_mismatches.len()
        );

        (groups, summary)
    }
}
