//! Recording datastore for engine tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use cfr_store::{Datastore, StoreError, StoreResult};
use cfr_types::{DatastoreKind, Value};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Switch(DatastoreKind),
    Refresh,
    Set(String, Value),
    Delete(String),
    Copy(DatastoreKind, DatastoreKind),
    Commit,
}

/// A datastore that records every call and fails on request.
///
/// Failing calls are recorded too, so tests can assert exactly which
/// primitives were attempted.
pub struct RecordingStore {
    calls: Mutex<Vec<Call>>,
    items: Mutex<BTreeMap<String, Value>>,
    session: Mutex<DatastoreKind>,
    deny: Vec<String>,
    fail_set: Vec<String>,
    fail_delete: Vec<String>,
    fail_commit: bool,
    fail_refresh: bool,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            items: Mutex::new(BTreeMap::new()),
            session: Mutex::new(DatastoreKind::Running),
            deny: Vec::new(),
            fail_set: Vec::new(),
            fail_delete: Vec::new(),
            fail_commit: false,
            fail_refresh: false,
        }
    }

    /// Refuse `set_item` on exactly `path` with a permission error.
    pub fn deny(mut self, path: &str) -> Self {
        self.deny.push(path.to_string());
        self
    }

    /// Fail `set_item` on exactly `path` with a non-permission error.
    pub fn fail_set(mut self, path: &str) -> Self {
        self.fail_set.push(path.to_string());
        self
    }

    pub fn fail_delete(mut self, expr: &str) -> Self {
        self.fail_delete.push(expr.to_string());
        self
    }

    pub fn fail_commit(mut self) -> Self {
        self.fail_commit = true;
        self
    }

    pub fn fail_refresh(mut self) -> Self {
        self.fail_refresh = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Paths of the attempted writes, in order.
    pub fn set_paths(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Set(path, _) => Some(path),
                _ => None,
            })
            .collect()
    }

    /// Attempted writes, in order.
    pub fn sets(&self) -> Vec<(String, Value)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Set(path, value) => Some((path, value)),
                _ => None,
            })
            .collect()
    }

    fn log(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Datastore for RecordingStore {
    fn datastore(&self) -> StoreResult<DatastoreKind> {
        Ok(*self.session.lock().unwrap())
    }

    fn switch_datastore(&self, kind: DatastoreKind) -> StoreResult<()> {
        self.log(Call::Switch(kind));
        *self.session.lock().unwrap() = kind;
        Ok(())
    }

    fn refresh(&self) -> StoreResult<()> {
        self.log(Call::Refresh);
        if self.fail_refresh {
            return Err(StoreError::Unavailable("refresh refused".into()));
        }
        Ok(())
    }

    fn set_item(&self, path: &str, value: &Value) -> StoreResult<()> {
        self.log(Call::Set(path.to_string(), value.clone()));
        if self.deny.iter().any(|p| p == path) {
            return Err(StoreError::PermissionDenied {
                path: path.to_string(),
            });
        }
        if self.fail_set.iter().any(|p| p == path) {
            return Err(StoreError::InvalidPath {
                path: path.to_string(),
                reason: "rejected by test".into(),
            });
        }
        self.items
            .lock()
            .unwrap()
            .insert(path.to_string(), value.clone());
        Ok(())
    }

    fn delete_item(&self, path: &str) -> StoreResult<()> {
        self.log(Call::Delete(path.to_string()));
        if self.fail_delete.iter().any(|p| p == path) {
            return Err(StoreError::Unavailable("delete refused".into()));
        }
        Ok(())
    }

    fn copy_config(&self, source: DatastoreKind, target: DatastoreKind) -> StoreResult<()> {
        self.log(Call::Copy(source, target));
        Ok(())
    }

    fn commit(&self) -> StoreResult<()> {
        self.log(Call::Commit);
        if self.fail_commit {
            return Err(StoreError::Unavailable("commit refused".into()));
        }
        Ok(())
    }

    fn get_item(&self, path: &str) -> StoreResult<Option<Value>> {
        Ok(self.items.lock().unwrap().get(path).cloned())
    }

    fn list_items(&self, prefix: &str) -> StoreResult<Vec<(String, Value)>> {
        Ok(self
            .items
            .lock()
            .unwrap()
            .iter()
            .filter(|(p, _)| p.starts_with(prefix))
            .map(|(p, v)| (p.clone(), v.clone()))
            .collect())
    }
}
