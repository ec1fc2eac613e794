//! List key collection.
//!
//! A list instance cannot be written until its full predicate is known. The
//! accumulator is armed when a keyed list is visited and consumes the list's
//! leading key leaves one at a time, appending each predicate to the list's
//! own path segment.

use cfr_types::{NodeId, TreeNode};

use crate::error::{ReplaceError, ReplaceResult};
use crate::path::PathStack;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PendingKeys {
    list: NodeId,
    remaining: usize,
}

/// Result of consuming one key leaf.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyProgress {
    /// More key leaves are needed.
    Pending { remaining: usize },
    /// The last key was consumed; the list instance path is complete.
    Complete { list: NodeId },
}

/// Tracks the key leaves still missing for the list being visited.
///
/// At most one list collects keys at a time: key leaves are leaves, so no
/// other list can start before the current one is complete.
#[derive(Clone, Debug, Default)]
pub struct KeyAccumulator {
    pending: Option<PendingKeys>,
}

impl KeyAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start collecting `keys` key leaves for `list`.
    pub fn arm(&mut self, list: NodeId, keys: usize) -> ReplaceResult<()> {
        if let Some(current) = self.pending {
            return Err(ReplaceError::InvalidInput(format!(
                "list started while {} keys of another list are pending",
                current.remaining
            )));
        }
        if keys > 0 {
            self.pending = Some(PendingKeys {
                list,
                remaining: keys,
            });
        }
        Ok(())
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns `true` if `list` is still waiting for key leaves.
    pub fn is_armed_for(&self, list: NodeId) -> bool {
        self.pending.is_some_and(|p| p.list == list)
    }

    /// Number of key leaves still missing, or 0 if disarmed.
    pub fn remaining(&self) -> usize {
        self.pending.map_or(0, |p| p.remaining)
    }

    /// Consume `key` as the next key leaf and qualify the list segment on
    /// top of `path` with its predicate.
    pub fn consume(&mut self, key: &TreeNode, path: &mut PathStack) -> ReplaceResult<KeyProgress> {
        let Some(mut pending) = self.pending else {
            return Err(ReplaceError::InvalidInput(format!(
                "leaf {} consumed as a key outside of a list",
                key.name
            )));
        };
        let value = key.value.as_deref().ok_or_else(|| {
            ReplaceError::InvalidInput(format!("key leaf {} has no value", key.name))
        })?;
        path.push_predicate(&key.name, value)?;

        pending.remaining -= 1;
        if pending.remaining == 0 {
            self.pending = None;
            Ok(KeyProgress::Complete { list: pending.list })
        } else {
            self.pending = Some(pending);
            Ok(KeyProgress::Pending {
                remaining: pending.remaining,
            })
        }
    }
}
