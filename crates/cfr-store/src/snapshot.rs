//! JSON export of committed datastore content.

use std::collections::BTreeMap;
use std::path::Path;

use cfr_types::{DatastoreKind, Value};
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// Committed content of every datastore, keyed by datastore name and then
/// by instance path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatastoreSnapshot {
    #[serde(default)]
    pub datastores: BTreeMap<String, BTreeMap<String, Value>>,
}

impl DatastoreSnapshot {
    /// An empty snapshot with an entry for every datastore.
    pub fn empty() -> Self {
        let datastores = DatastoreKind::ALL
            .iter()
            .map(|k| (k.as_str().to_string(), BTreeMap::new()))
            .collect();
        Self { datastores }
    }

    /// Content of one datastore. Missing entries read as empty.
    pub fn items(&self, kind: DatastoreKind) -> BTreeMap<String, Value> {
        self.datastores
            .get(kind.as_str())
            .cloned()
            .unwrap_or_default()
    }

    /// Replace the content of one datastore.
    pub fn set_items(&mut self, kind: DatastoreKind, items: BTreeMap<String, Value>) {
        self.datastores.insert(kind.as_str().to_string(), items);
    }

    /// Reject datastore names that do not resolve.
    pub fn validate(&self) -> StoreResult<()> {
        for name in self.datastores.keys() {
            name.parse::<DatastoreKind>()
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
        }
        Ok(())
    }

    pub fn to_json(&self) -> StoreResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> StoreResult<Self> {
        let snapshot: Self =
            serde_json::from_str(json).map_err(|e| StoreError::Serialization(e.to_string()))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Write the snapshot to `path` as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> StoreResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: &Path) -> StoreResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
