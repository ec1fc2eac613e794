use cfr_types::{DatastoreKind, Value};

use crate::error::StoreResult;

/// A session on a path-addressable configuration datastore.
///
/// A session is bound to one datastore at a time and every read and edit
/// goes through that binding. Implementations must uphold:
/// - Edits to `running` or `startup` are visible to the issuing session
///   immediately, and to everyone else only after [`Datastore::commit`].
/// - Edits to `candidate` stay in the candidate; committing while bound to
///   the candidate publishes it to `running`.
/// - Failures are reported, never swallowed, and carry a
///   [`crate::StoreErrorKind`].
pub trait Datastore: Send + Sync {
    /// The datastore this session is currently bound to.
    fn datastore(&self) -> StoreResult<DatastoreKind>;

    /// Bind the session to another datastore.
    fn switch_datastore(&self, kind: DatastoreKind) -> StoreResult<()>;

    /// Reload the session's view from committed content.
    ///
    /// Uncommitted edits to `running`/`startup` are discarded.
    fn refresh(&self) -> StoreResult<()>;

    /// Create or overwrite the node at an instance path.
    ///
    /// A [`Value::LeafListEntry`] adds one instance to the leaf-list at
    /// `path`; entries with different values coexist.
    fn set_item(&self, path: &str, value: &Value) -> StoreResult<()>;

    /// Delete a subtree.
    ///
    /// Accepts an instance path (the node and everything beneath it) or a
    /// module wildcard `/module:*` (all of the module's top-level nodes).
    /// Deleting something that does not exist is not an error.
    fn delete_item(&self, path: &str) -> StoreResult<()>;

    /// Replace the whole content of `target` with that of `source`.
    fn copy_config(&self, source: DatastoreKind, target: DatastoreKind) -> StoreResult<()>;

    /// Publish the session's edits.
    fn commit(&self) -> StoreResult<()>;

    /// Read one instance path from the session's view.
    fn get_item(&self, path: &str) -> StoreResult<Option<Value>>;

    /// List every instance path under `prefix`, sorted by path.
    ///
    /// Pass `""` to list the whole datastore.
    fn list_items(&self, prefix: &str) -> StoreResult<Vec<(String, Value)>>;
}
