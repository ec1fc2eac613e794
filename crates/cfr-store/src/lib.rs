//! Path-addressable datastore interface for ConfigReplace.
//!
//! The replace engine never talks to a storage engine directly. It drives a
//! session-scoped [`Datastore`] through a handful of primitives: bind the
//! session to a datastore, delete a subtree, set one instance path, copy one
//! datastore over another, and finally commit or refresh.
//!
//! # Storage Backends
//!
//! - [`InMemoryDatastore`] -- `BTreeMap`-based store for tests, embedding and
//!   the `cfr` command-line driver; exports to a JSON [`DatastoreSnapshot`]
//!
//! # Design Rules
//!
//! 1. Instance paths are canonical strings (`/module:name/child[key='v']`);
//!    the store never parses values.
//! 2. Every failure carries a [`StoreErrorKind`] so callers can tell an
//!    access-control refusal from a broken store.
//! 3. Running and startup edits are staged per session until `commit`.
//! 4. The candidate datastore is itself a staging area; it is published to
//!    running by `commit`.

pub mod error;
pub mod memory;
pub mod path;
pub mod snapshot;
pub mod traits;

pub use error::{StoreError, StoreErrorKind, StoreResult};
pub use memory::InMemoryDatastore;
pub use snapshot::DatastoreSnapshot;
pub use traits::Datastore;
