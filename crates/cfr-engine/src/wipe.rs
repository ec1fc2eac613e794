//! Module wipe: the "replace" half of replace semantics.

use std::collections::BTreeSet;

use cfr_store::Datastore;
use cfr_types::ConfigTree;
use tracing::{debug, error};

use crate::error::{ReplaceError, ReplaceResult};

/// The modules owning the top-level nodes of a configuration tree.
///
/// Applying the tree first deletes all existing content of these modules.
/// Modules are deduplicated and deleted in name order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModuleWipe<'a> {
    modules: BTreeSet<&'a str>,
}

impl<'a> ModuleWipe<'a> {
    /// Collect the modules touched by `tree`.
    pub fn plan(tree: &'a ConfigTree) -> Self {
        let modules = tree
            .roots()
            .map(|id| tree.node(id).module.as_str())
            .collect();
        Self { modules }
    }

    pub fn modules(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.modules.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Delete every planned module. Stops at the first failure.
    pub fn apply<S: Datastore + ?Sized>(&self, store: &S) -> ReplaceResult<()> {
        for module in &self.modules {
            let expr = wildcard(module);
            if let Err(source) = store.delete_item(&expr) {
                error!(module, error = %source, "module wipe failed");
                return Err(ReplaceError::Wipe {
                    module: module.to_string(),
                    source,
                });
            }
            debug!(module, "module wiped");
        }
        Ok(())
    }
}

/// Delete expression covering every top-level node of `module`.
pub fn wildcard(module: &str) -> String {
    format!("/{module}:*")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, RecordingStore};
    use cfr_types::ConfigNode;

    fn tree() -> ConfigTree {
        ConfigTree::from_roots(vec![
            ConfigNode::container("zeta", "a"),
            ConfigNode::leaf("alpha", "b", "1"),
            ConfigNode::container("zeta", "c")
                .with_child(ConfigNode::container("nested", "d")),
        ])
        .unwrap()
    }

    #[test]
    fn plan_dedups_root_modules_only() {
        let tree = tree();
        let wipe = ModuleWipe::plan(&tree);
        assert_eq!(wipe.modules().collect::<Vec<_>>(), ["alpha", "zeta"]);
        assert_eq!(wipe.len(), 2);
    }

    #[test]
    fn apply_deletes_each_module_once() {
        let tree = tree();
        let store = RecordingStore::new();
        ModuleWipe::plan(&tree).apply(&store).unwrap();
        assert_eq!(
            store.calls(),
            [Call::Delete("/alpha:*".into()), Call::Delete("/zeta:*".into())]
        );
    }

    #[test]
    fn apply_stops_at_first_failure() {
        let tree = tree();
        let store = RecordingStore::new().fail_delete("/alpha:*");
        let err = ModuleWipe::plan(&tree).apply(&store).unwrap_err();
        assert!(matches!(err, ReplaceError::Wipe { ref module, .. } if module == "alpha"));
        assert_eq!(store.calls(), [Call::Delete("/alpha:*".into())]);
    }

    #[test]
    fn empty_tree_plans_nothing() {
        let tree = ConfigTree::new();
        assert!(ModuleWipe::plan(&tree).is_empty());
    }
}
