//! In-memory datastore for testing, embedding and the command-line driver.
//!
//! [`InMemoryDatastore`] keeps the committed content of every datastore in a
//! `BTreeMap` behind a `RwLock`, together with the state of a single session:
//! the datastore it is bound to and its staged (uncommitted) edits.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use cfr_types::{DatastoreKind, Value};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::path::{self, DeleteTarget};
use crate::snapshot::DatastoreSnapshot;
use crate::traits::Datastore;

type Items = BTreeMap<String, Value>;

#[derive(Debug)]
struct State {
    committed: BTreeMap<DatastoreKind, Items>,
    session: DatastoreKind,
    /// Staged edits to `running`/`startup`. `None` means the session view is
    /// the committed content.
    working: Option<Items>,
    /// Path prefixes the session may not modify.
    denied: Vec<String>,
    unavailable: bool,
    /// Number of `set_item` calls that still succeed before an injected fault.
    sets_before_fault: Option<usize>,
}

impl State {
    fn view(&self) -> &Items {
        if let Some(working) = &self.working {
            return working;
        }
        // Every kind is populated at construction.
        &self.committed[&self.session]
    }

    fn view_mut(&mut self) -> &mut Items {
        if self.session.is_candidate() {
            return self.committed.entry(self.session).or_default();
        }
        let committed = &self.committed;
        let session = self.session;
        self.working
            .get_or_insert_with(|| committed.get(&session).cloned().unwrap_or_default())
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable {
            return Err(StoreError::Unavailable("datastore is offline".into()));
        }
        Ok(())
    }

    fn check_access(&self, path: &str) -> StoreResult<()> {
        if self.denied.iter().any(|prefix| path::is_within(path, prefix)) {
            return Err(StoreError::PermissionDenied {
                path: path.to_string(),
            });
        }
        Ok(())
    }
}

/// An in-memory implementation of [`Datastore`] with one session.
///
/// Data is lost when the store is dropped unless exported with
/// [`InMemoryDatastore::snapshot`].
#[derive(Debug)]
pub struct InMemoryDatastore {
    state: RwLock<State>,
}

impl InMemoryDatastore {
    /// Create an empty store with the session bound to `running`.
    pub fn new() -> Self {
        Self::from_snapshot(DatastoreSnapshot::default())
    }

    /// Create a store whose committed content is `snapshot`.
    pub fn from_snapshot(snapshot: DatastoreSnapshot) -> Self {
        let committed = DatastoreKind::ALL
            .iter()
            .map(|&kind| (kind, snapshot.items(kind)))
            .collect();
        Self {
            state: RwLock::new(State {
                committed,
                session: DatastoreKind::Running,
                working: None,
                denied: Vec::new(),
                unavailable: false,
                sets_before_fault: None,
            }),
        }
    }

    /// Export the committed content of every datastore.
    pub fn snapshot(&self) -> StoreResult<DatastoreSnapshot> {
        let state = self.read_state()?;
        let mut snapshot = DatastoreSnapshot::default();
        for (kind, items) in &state.committed {
            snapshot.set_items(*kind, items.clone());
        }
        Ok(snapshot)
    }

    /// Committed content of one datastore, ignoring staged edits.
    pub fn committed_items(&self, kind: DatastoreKind) -> StoreResult<Items> {
        let state = self.read_state()?;
        Ok(state.committed.get(&kind).cloned().unwrap_or_default())
    }

    /// Overwrite the committed content of one datastore.
    pub fn seed(
        &self,
        kind: DatastoreKind,
        items: impl IntoIterator<Item = (String, Value)>,
    ) -> StoreResult<()> {
        let mut state = self.write_state()?;
        state.committed.insert(kind, items.into_iter().collect());
        if state.session == kind {
            state.working = None;
        }
        Ok(())
    }

    /// Refuse every write to `prefix` and the paths beneath it.
    pub fn deny_writes_under(&self, prefix: impl Into<String>) -> StoreResult<()> {
        self.write_state()?.denied.push(prefix.into());
        Ok(())
    }

    /// Take the store offline (or back online).
    pub fn set_unavailable(&self, unavailable: bool) -> StoreResult<()> {
        self.write_state()?.unavailable = unavailable;
        Ok(())
    }

    /// Let `n` more writes succeed, then fail every following write as
    /// unavailable.
    pub fn fail_sets_after(&self, n: usize) -> StoreResult<()> {
        self.write_state()?.sets_before_fault = Some(n);
        Ok(())
    }

    /// Returns `true` if the session holds uncommitted edits.
    pub fn has_staged_changes(&self) -> StoreResult<bool> {
        let state = self.read_state()?;
        Ok(state
            .working
            .as_ref()
            .is_some_and(|w| Some(w) != state.committed.get(&state.session)))
    }

    fn read_state(&self) -> StoreResult<RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {e}")))
    }

    fn write_state(&self) -> StoreResult<RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {e}")))
    }
}

impl Default for InMemoryDatastore {
    fn default() -> Self {
        Self::new()
    }
}

impl Datastore for InMemoryDatastore {
    fn datastore(&self) -> StoreResult<DatastoreKind> {
        Ok(self.read_state()?.session)
    }

    fn switch_datastore(&self, kind: DatastoreKind) -> StoreResult<()> {
        let mut state = self.write_state()?;
        if state.session != kind {
            if state.working.is_some() {
                debug!(from = %state.session, to = %kind, "dropping staged edits on switch");
            }
            state.working = None;
            state.session = kind;
        }
        Ok(())
    }

    fn refresh(&self) -> StoreResult<()> {
        let mut state = self.write_state()?;
        state.check_available()?;
        if !state.session.is_candidate() {
            state.working = None;
        }
        Ok(())
    }

    fn set_item(&self, path: &str, value: &Value) -> StoreResult<()> {
        let mut state = self.write_state()?;
        state.check_available()?;
        if !path.starts_with('/') {
            return Err(StoreError::InvalidPath {
                path: path.to_string(),
                reason: "path must be absolute".into(),
            });
        }
        state.check_access(path)?;
        if let Some(remaining) = state.sets_before_fault.as_mut() {
            if *remaining == 0 {
                return Err(StoreError::Unavailable("injected fault".into()));
            }
            *remaining -= 1;
        }
        let key = match value {
            Value::LeafListEntry(entry) => path::leaf_list_entry(path, entry)?,
            _ => path.to_string(),
        };
        state.view_mut().insert(key, value.clone());
        Ok(())
    }

    fn delete_item(&self, path: &str) -> StoreResult<()> {
        let target = path::parse_delete_target(path)?;
        let mut state = self.write_state()?;
        state.check_available()?;

        let doomed: Vec<String> = state
            .view()
            .keys()
            .filter(|p| match &target {
                DeleteTarget::Module(module) => path::top_module(p) == Some(*module),
                DeleteTarget::Subtree(prefix) => path::is_within(p, prefix),
            })
            .cloned()
            .collect();
        for p in &doomed {
            state.check_access(p)?;
        }

        let view = state.view_mut();
        for p in &doomed {
            view.remove(p);
        }
        debug!(path, removed = doomed.len(), "deleted subtree");
        Ok(())
    }

    fn copy_config(&self, source: DatastoreKind, target: DatastoreKind) -> StoreResult<()> {
        let mut state = self.write_state()?;
        state.check_available()?;
        if source == target {
            return Ok(());
        }
        let content = state.committed.get(&source).cloned().unwrap_or_default();
        let count = content.len();
        state.committed.insert(target, content);
        if state.session == target {
            state.working = None;
        }
        debug!(%source, %target, items = count, "copied datastore");
        Ok(())
    }

    fn commit(&self) -> StoreResult<()> {
        let mut state = self.write_state()?;
        state.check_available()?;
        if state.session.is_candidate() {
            let candidate = state
                .committed
                .get(&DatastoreKind::Candidate)
                .cloned()
                .unwrap_or_default();
            state.committed.insert(DatastoreKind::Running, candidate);
            debug!("candidate committed to running");
        } else if let Some(working) = state.working.take() {
            let session = state.session;
            debug!(datastore = %session, items = working.len(), "committed staged edits");
            state.committed.insert(session, working);
        }
        Ok(())
    }

    fn get_item(&self, path: &str) -> StoreResult<Option<Value>> {
        let state = self.read_state()?;
        state.check_available()?;
        Ok(state.view().get(path).cloned())
    }

    fn list_items(&self, prefix: &str) -> StoreResult<Vec<(String, Value)>> {
        let state = self.read_state()?;
        state.check_available()?;
        Ok(state
            .view()
            .iter()
            .filter(|(p, _)| prefix.is_empty() || path::is_within(p, prefix))
            .map(|(p, v)| (p.clone(), v.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreErrorKind;

    fn scalar(s: &str) -> Value {
        Value::Scalar(s.to_string())
    }

    fn seeded() -> InMemoryDatastore {
        let store = InMemoryDatastore::new();
        store
            .seed(
                DatastoreKind::Running,
                [
                    ("/a:top".to_string(), Value::PresenceContainer),
                    ("/a:top/x".to_string(), scalar("1")),
                    ("/a:other".to_string(), scalar("2")),
                    ("/b:keep".to_string(), scalar("3")),
                ],
            )
            .unwrap();
        store
    }

    // -----------------------------------------------------------------------
    // Session staging
    // -----------------------------------------------------------------------

    #[test]
    fn edits_are_staged_until_commit() {
        let store = InMemoryDatastore::new();
        store.set_item("/m:a", &scalar("v")).unwrap();

        assert_eq!(store.get_item("/m:a").unwrap(), Some(scalar("v")));
        assert!(store.committed_items(DatastoreKind::Running).unwrap().is_empty());
        assert!(store.has_staged_changes().unwrap());

        store.commit().unwrap();
        assert_eq!(store.committed_items(DatastoreKind::Running).unwrap().len(), 1);
        assert!(!store.has_staged_changes().unwrap());
    }

    #[test]
    fn refresh_discards_staged_edits() {
        let store = seeded();
        store.set_item("/a:new", &scalar("n")).unwrap();
        store.refresh().unwrap();
        assert_eq!(store.get_item("/a:new").unwrap(), None);
        assert_eq!(store.list_items("").unwrap().len(), 4);
    }

    #[test]
    fn candidate_edits_land_in_candidate() {
        let store = InMemoryDatastore::new();
        store.switch_datastore(DatastoreKind::Candidate).unwrap();
        store.set_item("/m:a", &scalar("c")).unwrap();
        store.refresh().unwrap();

        let candidate = store.committed_items(DatastoreKind::Candidate).unwrap();
        assert_eq!(candidate.get("/m:a"), Some(&scalar("c")));
        assert!(store.committed_items(DatastoreKind::Running).unwrap().is_empty());
    }

    #[test]
    fn committing_candidate_publishes_to_running() {
        let store = InMemoryDatastore::new();
        store.switch_datastore(DatastoreKind::Candidate).unwrap();
        store.set_item("/m:a", &scalar("c")).unwrap();
        store.commit().unwrap();
        let running = store.committed_items(DatastoreKind::Running).unwrap();
        assert_eq!(running.get("/m:a"), Some(&scalar("c")));
    }

    #[test]
    fn switching_drops_staged_edits() {
        let store = InMemoryDatastore::new();
        store.set_item("/m:a", &scalar("v")).unwrap();
        store.switch_datastore(DatastoreKind::Startup).unwrap();
        assert_eq!(store.datastore().unwrap(), DatastoreKind::Startup);
        store.switch_datastore(DatastoreKind::Running).unwrap();
        assert_eq!(store.get_item("/m:a").unwrap(), None);
    }

    // -----------------------------------------------------------------------
    // Delete
    // -----------------------------------------------------------------------

    #[test]
    fn module_wildcard_delete() {
        let store = seeded();
        store.delete_item("/a:*").unwrap();
        let paths: Vec<String> = store.list_items("").unwrap().into_iter().map(|(p, _)| p).collect();
        assert_eq!(paths, ["/b:keep"]);
    }

    #[test]
    fn subtree_delete() {
        let store = seeded();
        store.delete_item("/a:top").unwrap();
        assert_eq!(store.get_item("/a:top/x").unwrap(), None);
        assert_eq!(store.get_item("/a:other").unwrap(), Some(scalar("2")));
    }

    #[test]
    fn delete_of_missing_path_is_ok() {
        let store = InMemoryDatastore::new();
        store.delete_item("/nothing:*").unwrap();
        store.delete_item("/m:absent").unwrap();
    }

    #[test]
    fn delete_touching_denied_path_fails_without_changes() {
        let store = seeded();
        store.deny_writes_under("/a:top/x").unwrap();
        let err = store.delete_item("/a:*").unwrap_err();
        assert!(err.is_permission_denied());
        assert_eq!(store.list_items("").unwrap().len(), 4);
    }

    // -----------------------------------------------------------------------
    // Access control and faults
    // -----------------------------------------------------------------------

    #[test]
    fn denied_prefix_blocks_set() {
        let store = InMemoryDatastore::new();
        store.deny_writes_under("/m:secret").unwrap();
        let err = store
            .set_item("/m:secret/key[id='1']", &Value::ListInstance)
            .unwrap_err();
        assert_eq!(err.kind(), StoreErrorKind::PermissionDenied);
        store.set_item("/m:secretive", &scalar("ok")).unwrap();
    }

    #[test]
    fn leaf_list_entries_are_all_kept() {
        let store = InMemoryDatastore::new();
        for server in ["a.example", "b.example", "a.example"] {
            store
                .set_item("/m:ntp/server", &Value::LeafListEntry(server.into()))
                .unwrap();
        }
        let items = store.list_items("/m:ntp/server").unwrap();
        assert_eq!(
            items,
            [
                (
                    "/m:ntp/server[.='a.example']".to_string(),
                    Value::LeafListEntry("a.example".into())
                ),
                (
                    "/m:ntp/server[.='b.example']".to_string(),
                    Value::LeafListEntry("b.example".into())
                ),
            ]
        );

        store.delete_item("/m:*").unwrap();
        assert!(store.list_items("").unwrap().is_empty());
    }

    #[test]
    fn relative_path_is_invalid() {
        let store = InMemoryDatastore::new();
        let err = store.set_item("m:a", &scalar("v")).unwrap_err();
        assert_eq!(err.kind(), StoreErrorKind::Other);
    }

    #[test]
    fn unavailable_store_fails_everything() {
        let store = seeded();
        store.set_unavailable(true).unwrap();
        assert_eq!(
            store.set_item("/m:a", &scalar("v")).unwrap_err().kind(),
            StoreErrorKind::Unavailable
        );
        assert!(store.commit().is_err());
        assert!(store.refresh().is_err());
        store.set_unavailable(false).unwrap();
        assert!(store.commit().is_ok());
    }

    #[test]
    fn injected_fault_after_n_sets() {
        let store = InMemoryDatastore::new();
        store.fail_sets_after(2).unwrap();
        store.set_item("/m:a", &scalar("1")).unwrap();
        store.set_item("/m:b", &scalar("2")).unwrap();
        let err = store.set_item("/m:c", &scalar("3")).unwrap_err();
        assert_eq!(err.kind(), StoreErrorKind::Unavailable);
    }

    // -----------------------------------------------------------------------
    // Copy and snapshots
    // -----------------------------------------------------------------------

    #[test]
    fn copy_config_replaces_target() {
        let store = seeded();
        store
            .seed(DatastoreKind::Startup, [("/z:old".to_string(), scalar("0"))])
            .unwrap();
        store
            .copy_config(DatastoreKind::Running, DatastoreKind::Startup)
            .unwrap();
        let startup = store.committed_items(DatastoreKind::Startup).unwrap();
        assert_eq!(startup, store.committed_items(DatastoreKind::Running).unwrap());
        assert!(!startup.contains_key("/z:old"));
    }

    #[test]
    fn snapshot_round_trip_preserves_content() {
        let store = seeded();
        let restored = InMemoryDatastore::from_snapshot(store.snapshot().unwrap());
        assert_eq!(
            restored.committed_items(DatastoreKind::Running).unwrap(),
            store.committed_items(DatastoreKind::Running).unwrap()
        );
    }

    #[test]
    fn list_items_filters_by_prefix() {
        let store = seeded();
        let items = store.list_items("/a:top").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].0, "/a:top");
    }
}
