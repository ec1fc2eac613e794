//! Per-node action selection.

use cfr_types::{NodeKind, TreeNode, Value};

use crate::error::{ReplaceError, ReplaceResult};

/// What the walker does with a visited node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Non-presence container: extend the path and visit the children.
    Descend,
    /// Presence container or keyless list: write the marker, then descend.
    WriteAndDescend(Value),
    /// Keyed list: extend the path, collect `keys` key leaves, write later.
    DeferWrite { keys: usize },
    /// Key leaf of the list being collected: qualify the list segment.
    ConsumeKey,
    /// Leaf, leaf-list instance or opaque node: write, no children.
    Write(Value),
}

impl Action {
    /// Whether the node gets its own path segment.
    pub fn pushes_segment(&self) -> bool {
        !matches!(self, Self::ConsumeKey)
    }

    /// Whether the walker should visit the node's children.
    pub fn descends(&self) -> bool {
        matches!(
            self,
            Self::Descend | Self::WriteAndDescend(_) | Self::DeferWrite { .. }
        )
    }
}

/// Decide the action for `node`. `collecting_keys` is set while a list is
/// still waiting for key leaves.
pub fn classify(node: &TreeNode, collecting_keys: bool) -> ReplaceResult<Action> {
    if collecting_keys {
        return match node.kind {
            NodeKind::Leaf => Ok(Action::ConsumeKey),
            other => Err(ReplaceError::InvalidInput(format!(
                "expected a key leaf, found {} {}",
                other.name(),
                node.name
            ))),
        };
    }

    let action = match node.kind {
        NodeKind::Container { presence: false } => Action::Descend,
        NodeKind::Container { presence: true } => {
            Action::WriteAndDescend(Value::PresenceContainer)
        }
        NodeKind::Leaf => Action::Write(Value::Scalar(value_of(node)?)),
        NodeKind::LeafList => Action::Write(Value::LeafListEntry(value_of(node)?)),
        NodeKind::List { keys: 0 } => Action::WriteAndDescend(Value::ListInstance),
        NodeKind::List { keys } => Action::DeferWrite { keys },
        NodeKind::AnyOpaque => Action::Write(Value::Opaque(value_of(node)?)),
    };
    Ok(action)
}

fn value_of(node: &TreeNode) -> ReplaceResult<String> {
    node.value.clone().ok_or_else(|| {
        ReplaceError::InvalidInput(format!("{} {} has no value", node.kind.name(), node.name))
    })
}
