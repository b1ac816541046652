//! In-memory directory tree.
//!
//! # Overview
//!
//! A [`DirectoryTree`] owns every scanned [`DirectoryNode`] in a flat table
//! laid out in pre-order, with the root at index 0. Nodes refer to each other
//! through [`NodeId`] indices: parents list their subdirectories by name, and
//! every non-root node keeps a non-owning `parent` index for ancestor lookups.
//!
//! The tree is built once by [`build_tree`](super::walker::build_tree) and is
//! never mutated afterwards.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use super::hasher::Fingerprint;

/// Index of a node inside its [`DirectoryTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root node of every tree.
    pub const ROOT: NodeId = NodeId(0);

    /// Position in the node table.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One scanned directory.
#[derive(Debug, Clone)]
pub struct DirectoryNode {
    /// Absolute path of the directory
    pub path: PathBuf,
    /// Sorted names of all immediate children (files and directories)
    pub entries: Vec<OsString>,
    /// Subdirectories by entry name
    pub subdirectories: BTreeMap<OsString, NodeId>,
    /// Enclosing directory, `None` for the root
    pub parent: Option<NodeId>,
    /// Nesting depth of the deepest subtree below (0 for a leaf)
    pub depth: usize,
    /// Structural fingerprint
    pub fingerprint: Fingerprint,
}

impl DirectoryNode {
    /// Number of immediate entries.
    #[must_use]
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Whether the directory has no subdirectories.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.subdirectories.is_empty()
    }
}

/// Immutable tree of scanned directories.
#[derive(Debug, Clone)]
pub struct DirectoryTree {
    nodes: Vec<DirectoryNode>,
}

impl DirectoryTree {
    /// Wrap a node table laid out in pre-order with the root first.
    pub(crate) fn from_nodes(nodes: Vec<DirectoryNode>) -> Self {
        debug_assert!(!nodes.is_empty());
        Self { nodes }
    }

    /// The root directory.
    #[must_use]
    pub fn root(&self) -> &DirectoryNode {
        &self.nodes[0]
    }

    /// Look up a node by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &DirectoryNode {
        &self.nodes[id.0]
    }

    /// Number of directories in the tree, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A tree always contains at least its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All node ids in pre-order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// All nodes in pre-order, with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &DirectoryNode)> + '_ {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Number of immediate entries of a node.
    #[must_use]
    pub fn size(&self, id: NodeId) -> usize {
        self.node(id).size()
    }

    /// Walk the parent chain of `id`, nearest ancestor first.
    ///
    /// The node itself is not yielded.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.node(id).parent,
        }
    }

    /// Child of `id` named `name`, if it is a directory.
    #[must_use]
    pub fn subdirectory(&self, id: NodeId, name: &OsStr) -> Option<NodeId> {
        self.node(id).subdirectories.get(name).copied()
    }

    /// Find the node whose absolute path is `path`.
    #[must_use]
    pub fn find(&self, path: &Path) -> Option<NodeId> {
        let relative = path.strip_prefix(&self.root().path).ok()?;
        let mut current = NodeId::ROOT;
        for component in relative.components() {
            current = self.subdirectory(current, component.as_os_str())?;
        }
        Some(current)
    }

    /// Whether `candidate` is a directory anywhere below `ancestor`.
    ///
    /// A directory is not its own descendant.
    #[must_use]
    pub fn has_descendant(&self, ancestor: NodeId, candidate: &Path) -> bool {
        let base = &self.node(ancestor).path;
        if candidate == base.as_path() || !candidate.starts_with(base) {
            return false;
        }
        self.find(candidate)
            .is_some_and(|id| self.ancestors(id).any(|a| a == ancestor))
    }

    /// Structural equality of two nodes of this tree.
    #[must_use]
    pub fn same_structure(&self, a: NodeId, b: NodeId) -> bool {
        self.structurally_equal(a, self, b)
    }

    /// Structural equality of node `a` of this tree and node `b` of `other`.
    ///
    /// Two directories are equal when their entry lists match exactly and
    /// every subdirectory is present in both under the same name with a
    /// recursively equal subtree. Fingerprints are not consulted.
    #[must_use]
    pub fn structurally_equal(&self, a: NodeId, other: &DirectoryTree, b: NodeId) -> bool {
        let mut pending = vec![(a, b)];

        while let Some((a, b)) = pending.pop() {
            let left = self.node(a);
            let right = other.node(b);

            if left.entries != right.entries {
                return false;
            }
            if left.subdirectories.len() != right.subdirectories.len() {
                return false;
            }

            for (name, &child) in &left.subdirectories {
                match right.subdirectories.get(name) {
                    Some(&other_child) => pending.push((child, other_child)),
                    None => return false,
                }
            }
        }

        true
    }
}

impl PartialEq for DirectoryTree {
    /// Trees are equal when their roots are structurally equal.
    fn eq(&self, other: &Self) -> bool {
        self.structurally_equal(NodeId::ROOT, other, NodeId::ROOT)
    }
}

impl Eq for DirectoryTree {}

/// Iterator over the ancestors of a node.
#[derive(Debug)]
pub struct Ancestors<'a> {
    tree: &'a DirectoryTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.node(current).parent;
        Some(current)
    }
}
