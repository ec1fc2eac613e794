//! Config-tree replace engine.
//!
//! Applies a `<copy-config>` with an inline configuration to a datastore
//! session using replace semantics: every schema module touched by the new
//! tree is wiped, then the tree is compiled into a stream of canonical
//! instance paths and written node by node.
//!
//! # Pipeline
//!
//! ```text
//! ConfigTree -> ModuleWipe -> TreeWalker -> OutcomeCollector -> commit/refresh
//!                              |- PathStack       (current instance path)
//!                              |- KeyAccumulator  (list key predicates)
//!                              `- classify        (per-node action)
//! ```
//!
//! Permission failures on single writes are recorded and skipped; any other
//! failure aborts the operation. [`ReplaceEngine::replace`] always returns
//! exactly one [`OperationResult`].

pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod keys;
pub mod outcome;
pub mod path;
pub mod walker;
pub mod wipe;

#[cfg(test)]
pub(crate) mod testing;

pub use classify::{classify, Action};
pub use config::ReplaceConfig;
pub use engine::{ReplaceEngine, Source};
pub use error::{ErrorKind, ReplaceError, ReplaceResult};
pub use keys::{KeyAccumulator, KeyProgress};
pub use outcome::{OperationResult, Outcome, OutcomeCollector};
pub use path::PathStack;
pub use walker::{TraversalState, TreeWalker};
pub use wipe::ModuleWipe;
