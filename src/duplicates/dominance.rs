//! Removal of nested duplicate groups.
//!
//! When two directories are duplicates, everything inside them is mirrored
//! and would be reported again as smaller duplicate groups. A group is
//! *dominated* when any ancestor of its representative has the fingerprint
//! of another raw group; only undominated (maximal) groups are kept.

use std::collections::HashSet;

use crate::scanner::{fingerprint_to_hex, DirectoryTree, Fingerprint};

use super::groups::RawGroup;

/// Keep only the groups with no duplicate ancestor.
///
/// The decision for each group depends only on its representative's parent
/// chain and the set of raw group fingerprints, so the input order does not
/// matter. Surviving groups keep their relative order.
///
/// Returns the maximal groups and the number of groups that were dropped.
#[must_use]
pub fn filter_dominated(tree: &DirectoryTree, groups: Vec<RawGroup>) -> (Vec<RawGroup>, usize) {
    let keys: HashSet<Fingerprint> = groups.iter().map(|g| g.fingerprint).collect();

    let total = groups.len();
    let maximal: Vec<RawGroup> = groups
        .into_iter()
        .filter(|group| {
            let dominated = tree
                .ancestors(group.representative())
                .any(|ancestor| keys.contains(&tree.node(ancestor).fingerprint));
            if dominated {
                log::trace!(
                    "Dropping nested group {} ({})",
                    fingerprint_to_hex(&group.fingerprint),
                    tree.node(group.representative()).path.display()
                );
            }
            !dominated
        })
        .collect();

    let dropped = total - maximal.len();
    log::debug!(
        "Dominance filter: {} of {} groups are maximal",
        maximal.len(),
        total
    );

    (maximal, dropped)
}
