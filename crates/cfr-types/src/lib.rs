//! Foundation types for ConfigReplace.
//!
//! This crate provides the data model shared by every other `cfr` crate: the
//! schema-typed configuration nodes delivered by a `<copy-config>` request,
//! the traversal arena built from them, the values written into a datastore,
//! and the identifiers of the well-known datastores.
//!
//! # Key Types
//!
//! - [`ConfigNode`]: Owned, nested node of an incoming configuration tree
//! - [`NodeKind`]: Closed set of schema node kinds (container, leaf, ...)
//! - [`ConfigTree`]: Flattened arena with parent/sibling links for traversal
//! - [`NodeId`]: Index of a node inside a [`ConfigTree`]
//! - [`Value`]: Value record written to the datastore for one instance path
//! - [`DatastoreKind`]: `running`, `startup` or `candidate`

pub mod datastore;
pub mod error;
pub mod node;
pub mod tree;
pub mod value;

pub use datastore::DatastoreKind;
pub use error::TypeError;
pub use node::{ConfigNode, NodeKind};
pub use tree::{ConfigTree, NodeId, Siblings, TreeNode};
pub use value::Value;
