//! Flattened configuration tree used for traversal.
//!
//! A [`ConfigTree`] is built once from owned [`ConfigNode`]s and is read-only
//! afterwards. Nodes live in a single arena in document pre-order; the
//! parent, first-child and next-sibling links are plain indices, so a walker
//! can backtrack through the parent chain without recursion and without any
//! node owning another.

use crate::error::TypeError;
use crate::node::{ConfigNode, NodeKind};

/// Index of a node inside a [`ConfigTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in document pre-order.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A node's own data, without its children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeNode {
    pub module: String,
    pub name: String,
    pub kind: NodeKind,
    pub value: Option<String>,
}

#[derive(Clone, Debug)]
struct Slot {
    node: TreeNode,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

/// Arena of configuration nodes with explicit structural links.
#[derive(Clone, Debug, Default)]
pub struct ConfigTree {
    slots: Vec<Slot>,
    first_root: Option<NodeId>,
}

impl ConfigTree {
    /// An empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from a single top-level node.
    pub fn from_root(root: ConfigNode) -> Result<Self, TypeError> {
        Self::from_roots(vec![root])
    }

    /// Build a tree from top-level nodes, in document order.
    ///
    /// Every module and node name must be a valid schema identifier; names
    /// end up verbatim in instance paths, so separators and quote characters
    /// are rejected here.
    pub fn from_roots(roots: Vec<ConfigNode>) -> Result<Self, TypeError> {
        let mut tree = Self::new();
        // Last child appended to each slot, and to the root level.
        let mut last_child: Vec<Option<NodeId>> = Vec::new();
        let mut last_root: Option<NodeId> = None;

        let mut pending: Vec<(ConfigNode, Option<NodeId>)> =
            roots.into_iter().rev().map(|n| (n, None)).collect();

        while let Some((node, parent)) = pending.pop() {
            validate_identifier(&node.module)?;
            validate_identifier(&node.name)?;

            let id = NodeId(tree.slots.len());
            let ConfigNode {
                module,
                name,
                kind,
                value,
                children,
            } = node;
            tree.slots.push(Slot {
                node: TreeNode {
                    module,
                    name,
                    kind,
                    value,
                },
                parent,
                first_child: None,
                next_sibling: None,
            });
            last_child.push(None);

            let previous = match parent {
                Some(p) => last_child[p.0].replace(id),
                None => last_root.replace(id),
            };
            match (previous, parent) {
                (Some(prev), _) => tree.slots[prev.0].next_sibling = Some(id),
                (None, Some(p)) => tree.slots[p.0].first_child = Some(id),
                (None, None) => tree.first_root = Some(id),
            }

            pending.extend(children.into_iter().rev().map(|c| (c, Some(id))));
        }

        Ok(tree)
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The first top-level node, if any.
    pub fn first_root(&self) -> Option<NodeId> {
        self.first_root
    }

    /// Top-level nodes in document order.
    pub fn roots(&self) -> Siblings<'_> {
        Siblings {
            tree: self,
            next: self.first_root,
        }
    }

    /// Children of `id` in document order.
    pub fn children(&self, id: NodeId) -> Siblings<'_> {
        Siblings {
            tree: self,
            next: self.first_child(id),
        }
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.slots[id.0].node
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots[id.0].parent
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.slots[id.0].first_child
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.slots[id.0].next_sibling
    }
}

/// Iterator over a run of siblings.
pub struct Siblings<'a> {
    tree: &'a ConfigTree,
    next: Option<NodeId>,
}

impl Iterator for Siblings<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.next_sibling(current);
        Some(current)
    }
}

/// YANG identifier: a letter or underscore, then letters, digits, `_`, `-`
/// or `.`.
fn validate_identifier(s: &str) -> Result<(), TypeError> {
    let mut chars = s.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        }
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(TypeError::InvalidName(s.to_string()))
    }
}
