//! Write outcome policy.
//!
//! A write refused by access control is recorded and skipped so that one
//! forbidden node does not block the rest of a large configuration. Any
//! other write failure stops the traversal.

use cfr_store::StoreResult;
use tracing::{error, warn};

use crate::error::{ErrorKind, ReplaceError, ReplaceResult};

/// Result of one traversal.
#[derive(Debug)]
pub enum Outcome {
    /// Every write succeeded.
    Applied,
    /// At least one write was refused; carries the first refused path.
    AppliedWithPermissionDenied(String),
    /// The traversal stopped; no writes were attempted after the failure.
    Aborted(ReplaceError),
}

/// The single result of a replace operation, as seen by the protocol layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OperationResult {
    Ok,
    /// Applied, but the write at `path` failed with `kind`.
    OkWithError { path: String, kind: ErrorKind },
    /// Aborted. `path` names the instance path or wipe expression the
    /// failing store call addressed, when there was one.
    Failed {
        kind: ErrorKind,
        path: Option<String>,
        message: String,
    },
}

impl OperationResult {
    pub fn is_ok(&self) -> bool {
        !matches!(self, Self::Failed { .. })
    }
}

impl From<ReplaceError> for OperationResult {
    fn from(e: ReplaceError) -> Self {
        Self::Failed {
            kind: e.kind(),
            path: e.path(),
            message: e.to_string(),
        }
    }
}

/// Aggregates per-write results for one traversal.
#[derive(Debug, Default)]
pub struct OutcomeCollector {
    first_denied: Option<String>,
    denied: usize,
    written: usize,
}

impl OutcomeCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the result of writing `path`.
    ///
    /// Returns `Err` when the traversal must stop.
    pub fn record(&mut self, path: &str, result: StoreResult<()>) -> ReplaceResult<()> {
        match result {
            Ok(()) => {
                self.written += 1;
                Ok(())
            }
            Err(e) if e.is_permission_denied() => {
                warn!(path, "write denied, continuing");
                self.denied += 1;
                if self.first_denied.is_none() {
                    self.first_denied = Some(path.to_string());
                }
                Ok(())
            }
            Err(source) => {
                error!(path, error = %source, "write failed, aborting");
                Err(ReplaceError::Write {
                    path: path.to_string(),
                    source,
                })
            }
        }
    }

    /// Successful writes so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Refused writes so far.
    pub fn denied(&self) -> usize {
        self.denied
    }

    pub fn finish(self) -> Outcome {
        match self.first_denied {
            Some(path) => Outcome::AppliedWithPermissionDenied(path),
            None => Outcome::Applied,
        }
    }
}
