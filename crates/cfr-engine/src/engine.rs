//! The replace operation.

use cfr_store::Datastore;
use cfr_types::{ConfigTree, DatastoreKind};
use tracing::{debug, error, info, warn};

use crate::config::ReplaceConfig;
use crate::error::{ErrorKind, ReplaceError, ReplaceResult};
use crate::outcome::{OperationResult, Outcome};
use crate::walker::TreeWalker;
use crate::wipe::ModuleWipe;

/// Where the new content of the target comes from.
#[derive(Clone, Debug)]
pub enum Source {
    /// Copy the whole content of another datastore.
    Datastore(DatastoreKind),
    /// Replace the touched modules with an inline configuration tree.
    Config(ConfigTree),
}

/// Applies copy-config operations to a datastore session.
#[derive(Clone, Debug, Default)]
pub struct ReplaceEngine {
    config: ReplaceConfig,
}

impl ReplaceEngine {
    pub fn new(config: ReplaceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReplaceConfig {
        &self.config
    }

    /// Replace the content of `target` with `source`.
    ///
    /// The session is bound to `target` first. An inline tree wipes every
    /// module owning one of its top-level nodes and then writes the tree; a
    /// datastore source is copied as a whole. On success the session is
    /// committed, or refreshed when `target` is the candidate.
    ///
    /// Writes refused by access control do not fail the operation; the first
    /// refused path is reported in [`OperationResult::OkWithError`].
    pub fn replace<S: Datastore + ?Sized>(
        &self,
        store: &S,
        target: DatastoreKind,
        source: Source,
    ) -> OperationResult {
        info!(%target, source = source_name(&source), "replace started");
        match self.try_replace(store, target, source) {
            Ok(None) => {
                info!(%target, "replace finished");
                OperationResult::Ok
            }
            Ok(Some(path)) => {
                warn!(%target, %path, "replace finished with denied writes");
                OperationResult::OkWithError {
                    path,
                    kind: ErrorKind::PermissionDenied,
                }
            }
            Err(e) => {
                error!(%target, error = %e, kind = ?e.kind(), "replace failed");
                e.into()
            }
        }
    }

    /// Returns the first path refused by access control, if any.
    fn try_replace<S: Datastore + ?Sized>(
        &self,
        store: &S,
        target: DatastoreKind,
        source: Source,
    ) -> ReplaceResult<Option<String>> {
        let denied = match source {
            Source::Config(tree) => {
                // An empty tree would commit without wiping anything.
                if tree.is_empty() {
                    return Err(ReplaceError::InvalidInput(
                        "configuration tree has no nodes".into(),
                    ));
                }
                self.prepare(store, target)?;
                ModuleWipe::plan(&tree).apply(store)?;
                match TreeWalker::new(&tree, store).run() {
                    Outcome::Applied => None,
                    Outcome::AppliedWithPermissionDenied(path) => Some(path),
                    Outcome::Aborted(e) => return Err(e),
                }
            }
            Source::Datastore(from) => {
                self.prepare(store, target)?;
                store
                    .copy_config(from, target)
                    .map_err(|source| ReplaceError::Copy {
                        from,
                        to: target,
                        source,
                    })?;
                None
            }
        };
        finalize(store, target)?;
        Ok(denied)
    }

    /// Bind the session to `target` and drop stale staged edits.
    fn prepare<S: Datastore + ?Sized>(&self, store: &S, target: DatastoreKind) -> ReplaceResult<()> {
        let session = |source| ReplaceError::Session {
            datastore: target,
            source,
        };
        if store.datastore().map_err(session)? != target {
            debug!(%target, "switching session");
            store.switch_datastore(target).map_err(session)?;
        }
        if self.config.refresh_before_replace && !target.is_candidate() {
            store.refresh().map_err(session)?;
        }
        Ok(())
    }
}

/// Make the applied content durable: commit `running`/`startup`, refresh the
/// session view of the candidate.
fn finalize<S: Datastore + ?Sized>(store: &S, target: DatastoreKind) -> ReplaceResult<()> {
    let (action, result) = if target.is_candidate() {
        ("refresh", store.refresh())
    } else {
        ("commit", store.commit())
    };
    result.map_err(|source| ReplaceError::Finalize { action, source })?;
    debug!(%target, action, "session finalized");
    Ok(())
}

fn source_name(source: &Source) -> &'static str {
    match source {
        Source::Datastore(kind) => kind.as_str(),
        Source::Config(_) => "config",
    }
}
