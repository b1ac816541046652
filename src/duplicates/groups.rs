//! Fingerprint bucketing and duplicate group types.
//!
//! # Overview
//!
//! [`collect_groups`] is the first grouping phase: every directory of a
//! [`DirectoryTree`] is bucketed by its fingerprint. Within a bucket the
//! first directory (in pre-order) becomes the representative, and later
//! directories join only if they are structurally equal to it. A bucket that
//! holds structurally different directories is a fingerprint collision; the
//! odd ones out are recorded as [`CollisionMismatch`] and left out.
//!
//! # Example
//!
//! ```no_run
//! use dirdupe::duplicates::collect_groups;
//! use dirdupe::scanner::{build_tree, ScanConfig};
//! use std::path::Path;
//!
//! let tree = build_tree(Path::new("."), &ScanConfig::default()).unwrap();
//! let collected = collect_groups(&tree);
//! for group in &collected.groups {
//!     println!("{} directories share one structure", group.len());
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::scanner::{fingerprint_to_hex, DirectoryTree, Fingerprint, NodeId};

/// Directories of one tree that share a fingerprint and a structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawGroup {
    /// Shared fingerprint
    pub fingerprint: Fingerprint,
    /// Members in pre-order; the first one is the representative
    pub members: Vec<NodeId>,
}

impl RawGroup {
    /// The first member encountered in pre-order.
    #[must_use]
    pub fn representative(&self) -> NodeId {
        self.members[0]
    }

    /// Number of directories in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// A directory that shares a fingerprint with a group representative but
/// differs from it structurally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollisionMismatch {
    /// The colliding fingerprint
    pub fingerprint: Fingerprint,
    /// Representative of the bucket
    pub representative: PathBuf,
    /// Directory that was excluded
    pub candidate: PathBuf,
}

/// Result of [`collect_groups`].
#[derive(Debug, Clone, Default)]
pub struct CollectedGroups {
    /// Groups with 2+ members, in ascending fingerprint order
    pub groups: Vec<RawGroup>,
    /// Directories excluded because of fingerprint collisions
    pub mismatches: Vec<CollisionMismatch>,
}

/// Bucket every directory of `tree` by fingerprint and keep verified
/// duplicate groups.
///
/// Buckets iterate in ascending fingerprint order and members stay in
/// pre-order, so the output is identical for identical trees.
#[must_use]
pub fn collect_groups(tree: &DirectoryTree) -> CollectedGroups {
    let mut buckets: BTreeMap<Fingerprint, Vec<NodeId>> = BTreeMap::new();
    let mut mismatches = Vec::new();

    for (id, node) in tree.iter() {
        match buckets.get_mut(&node.fingerprint) {
            None => {
                buckets.insert(node.fingerprint, vec![id]);
            }
            Some(members) => {
                let representative = members[0];
                if tree.same_structure(representative, id) {
                    members.push(id);
                } else {
                    let mismatch = CollisionMismatch {
                        fingerprint: node.fingerprint,
                        representative: tree.node(representative).path.clone(),
                        candidate: node.path.clone(),
                    };
                    log::warn!(
                        "Fingerprint collision {}: {} differs from {}",
                        fingerprint_to_hex(&mismatch.fingerprint),
                        mismatch.candidate.display(),
                        mismatch.representative.display()
                    );
                    mismatches.push(mismatch);
                }
            }
        }
    }

    let groups: Vec<RawGroup> = buckets
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .map(|(fingerprint, members)| {
            log::trace!(
                "Raw group {}: {} directories",
                fingerprint_to_hex(&fingerprint),
                members.len()
            );
            RawGroup {
                fingerprint,
                members,
            }
        })
        .collect();

    log::debug!(
        "Collected {} raw groups from {} directories ({} collisions)",
        groups.len(),
        tree.len(),
        mismatches.len()
    );

    CollectedGroups { groups, mismatches }
}

/// A reported group of structurally identical directories.
///
/// Unlike [`RawGroup`], this owns its paths and outlives the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    /// BLAKE3 structural fingerprint (32 bytes)
    pub fingerprint: Fingerprint,
    /// Nesting depth shared by every member
    pub depth: usize,
    /// Number of immediate entries shared by every member
    pub entry_count: usize,
    /// Absolute paths of the member directories, in scan order
    pub paths: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Create a new duplicate group.
    #[must_use]
    pub fn new(
        fingerprint: Fingerprint,
        depth: usize,
        entry_count: usize,
        paths: Vec<PathBuf>,
    ) -> Self {
        Self {
            fingerprint,
            depth,
            entry_count,
            paths,
        }
    }

    /// Resolve a raw group against its tree.
    #[must_use]
    pub fn from_raw(tree: &DirectoryTree, raw: &RawGroup) -> Self {
        let representative = tree.node(raw.representative());
        Self {
            fingerprint: raw.fingerprint,
            depth: representative.depth,
            entry_count: representative.size(),
            paths: raw
                .members
                .iter()
                .map(|&id| tree.node(id).path.clone())
                .collect(),
        }
    }

    /// Number of directories in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Number of redundant copies (total - 1 original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.paths.len().saturating_sub(1)
    }

    /// The representative directory (first in scan order).
    #[must_use]
    pub fn representative(&self) -> Option<&Path> {
        self.paths.first().map(PathBuf::as_path)
    }

    /// Fingerprint as hexadecimal string.
    #[must_use]
    pub fn fingerprint_hex(&self) -> String {
        fingerprint_to_hex(&self.fingerprint)
    }
}
