//! Canonical instance path construction.
//!
//! The path is kept as one growable string plus the offset at which every
//! pushed segment starts. Going up a level truncates to the last offset, so
//! push/pop mirrors tree depth with no length ceiling.

use cfr_types::TreeNode;

use crate::error::{ReplaceError, ReplaceResult};

/// The instance path of the node currently being visited.
#[derive(Clone, Debug, Default)]
pub struct PathStack {
    path: String,
    marks: Vec<usize>,
}

impl PathStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a segment (including its leading `/`).
    pub fn push(&mut self, segment: &str) {
        self.marks.push(self.path.len());
        self.path.push_str(segment);
    }

    /// Truncate back to the position before the most recent push.
    ///
    /// Predicates appended to that segment go with it. Returns `false` if the
    /// stack was already empty.
    pub fn pop(&mut self) -> bool {
        match self.marks.pop() {
            Some(mark) => {
                self.path.truncate(mark);
                true
            }
            None => false,
        }
    }

    /// Append a `[key='value']` predicate to the top segment.
    pub fn push_predicate(&mut self, key: &str, value: &str) -> ReplaceResult<()> {
        if self.marks.is_empty() {
            return Err(ReplaceError::InvalidInput(format!(
                "key {key} has no list segment to qualify"
            )));
        }
        self.path.push_str(&predicate(key, value)?);
        Ok(())
    }

    pub fn current_path(&self) -> &str {
        &self.path
    }

    /// Number of pushed segments.
    pub fn depth(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }
}

/// Render the path segment for `node`.
///
/// Roots and nodes whose module differs from their parent's are qualified
/// with their module name; every other segment is bare.
pub fn segment(node: &TreeNode, parent: Option<&TreeNode>) -> String {
    match parent {
        Some(p) if p.module == node.module => format!("/{}", node.name),
        _ => format!("/{}:{}", node.module, node.name),
    }
}

/// Render a key predicate, quoting the value as an XPath literal.
pub fn predicate(key: &str, value: &str) -> ReplaceResult<String> {
    match (value.contains('\''), value.contains('"')) {
        (false, _) => Ok(format!("[{key}='{value}']")),
        (true, false) => Ok(format!("[{key}=\"{value}\"]")),
        (true, true) => Err(ReplaceError::InvalidInput(format!(
            "value of key {key} contains both quote characters"
        ))),
    }
}
