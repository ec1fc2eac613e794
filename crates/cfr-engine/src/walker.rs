//! Pre-order traversal that compiles a configuration tree into writes.
//!
//! The walk is a loop, not a recursion: after a node is handled the walker
//! moves to its first child (when the node's action descends), otherwise to
//! its next sibling, otherwise up the parent chain until an ancestor with a
//! next sibling is found. Every node that pushed a path segment pops it when
//! it is left; key leaves never push, so they never pop.

use cfr_store::Datastore;
use cfr_types::{ConfigTree, NodeId, Value};
use tracing::{debug, info};

use crate::classify::{classify, Action};
use crate::error::{ReplaceError, ReplaceResult};
use crate::keys::{KeyAccumulator, KeyProgress};
use crate::outcome::{Outcome, OutcomeCollector};
use crate::path::{self, PathStack};

/// Mutable state of one traversal.
#[derive(Debug, Default)]
pub struct TraversalState {
    pub path: PathStack,
    pub keys: KeyAccumulator,
    pub outcome: OutcomeCollector,
}

/// Walks a [`ConfigTree`] and writes every node into a datastore session.
pub struct TreeWalker<'a, S: Datastore + ?Sized> {
    tree: &'a ConfigTree,
    store: &'a S,
    state: TraversalState,
}

impl<'a, S: Datastore + ?Sized> TreeWalker<'a, S> {
    pub fn new(tree: &'a ConfigTree, store: &'a S) -> Self {
        Self {
            tree,
            store,
            state: TraversalState::default(),
        }
    }

    /// Run the traversal to completion or to the first fatal failure.
    pub fn run(mut self) -> Outcome {
        match self.walk() {
            Ok(()) => {
                info!(
                    written = self.state.outcome.written(),
                    denied = self.state.outcome.denied(),
                    "configuration tree applied"
                );
                self.state.outcome.finish()
            }
            Err(e) => Outcome::Aborted(e),
        }
    }

    fn walk(&mut self) -> ReplaceResult<()> {
        let tree = self.tree;
        let mut cursor = tree.first_root();

        while let Some(id) = cursor {
            let node = tree.node(id);
            let action = classify(node, self.state.keys.is_armed())?;

            let pushed = action.pushes_segment();
            if pushed {
                let parent = tree.parent(id).map(|p| tree.node(p));
                self.state.path.push(&path::segment(node, parent));
            }

            match &action {
                Action::Descend => {}
                Action::WriteAndDescend(value) | Action::Write(value) => self.write(value)?,
                Action::DeferWrite { keys } => self.state.keys.arm(id, *keys)?,
                Action::ConsumeKey => {
                    let progress = self.state.keys.consume(node, &mut self.state.path)?;
                    if let KeyProgress::Complete { .. } = progress {
                        self.write(&Value::ListInstance)?;
                    }
                }
            }

            if action.descends() {
                if let Some(child) = tree.first_child(id) {
                    cursor = Some(child);
                    continue;
                }
            }
            cursor = self.advance(id, pushed)?;
        }
        Ok(())
    }

    /// Leave `id` and find the next node in pre-order.
    fn advance(&mut self, mut id: NodeId, pushed: bool) -> ReplaceResult<Option<NodeId>> {
        self.leave(id, pushed)?;
        loop {
            if let Some(next) = self.tree.next_sibling(id) {
                return Ok(Some(next));
            }
            match self.tree.parent(id) {
                Some(parent) => {
                    // Ancestors are containers or lists, which always push.
                    self.leave(parent, true)?;
                    id = parent;
                }
                None => return Ok(None),
            }
        }
    }

    fn leave(&mut self, id: NodeId, pushed: bool) -> ReplaceResult<()> {
        if self.state.keys.is_armed_for(id) {
            return Err(ReplaceError::InvalidInput(format!(
                "list {} ends with {} of its key leaves missing",
                self.state.path.current_path(),
                self.state.keys.remaining()
            )));
        }
        if pushed {
            self.state.path.pop();
        }
        Ok(())
    }

    fn write(&mut self, value: &Value) -> ReplaceResult<()> {
        let path = self.state.path.current_path();
        debug!(path, %value, "set item");
        let result = self.store.set_item(path, value);
        self.state.outcome.record(path, result)
    }
}
