use cfr_store::{StoreError, StoreErrorKind};
use cfr_types::{DatastoreKind, TypeError};

use crate::wipe::wildcard;

/// Errors that stop a replace operation.
#[derive(Debug, thiserror::Error)]
pub enum ReplaceError {
    /// The configuration tree is malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Binding or refreshing the session failed before anything changed.
    #[error("failed to prepare {datastore} session: {source}")]
    Session {
        datastore: DatastoreKind,
        source: StoreError,
    },

    /// Deleting a module's prior content failed; no writes were attempted.
    #[error("failed to wipe module {module}: {source}")]
    Wipe { module: String, source: StoreError },

    /// A write failed for a reason other than access control.
    #[error("failed to set {path}: {source}")]
    Write { path: String, source: StoreError },

    /// The whole-datastore copy failed.
    #[error("failed to copy {from} to {to}: {source}")]
    Copy {
        from: DatastoreKind,
        to: DatastoreKind,
        source: StoreError,
    },

    /// Commit (or the candidate refresh) failed after the datastore was
    /// already modified; the target may be partially updated.
    #[error("{action} failed after changes were applied, datastore may be partially updated: {source}")]
    Finalize {
        action: &'static str,
        source: StoreError,
    },
}

/// Classification of a failure as reported to the protocol layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    PermissionDenied,
    InvalidInput,
    StoreUnavailable,
    OtherStoreFailure,
    CommitFailure,
}

impl ErrorKind {
    fn from_store(kind: StoreErrorKind) -> Self {
        match kind {
            StoreErrorKind::PermissionDenied => Self::PermissionDenied,
            StoreErrorKind::Unavailable => Self::StoreUnavailable,
            StoreErrorKind::Other => Self::OtherStoreFailure,
        }
    }
}

impl ReplaceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Session { source, .. }
            | Self::Wipe { source, .. }
            | Self::Write { source, .. }
            | Self::Copy { source, .. } => ErrorKind::from_store(source.kind()),
            Self::Finalize { .. } => ErrorKind::CommitFailure,
        }
    }

    /// The instance path or delete expression the failing call addressed.
    pub fn path(&self) -> Option<String> {
        match self {
            Self::Wipe { module, .. } => Some(wildcard(module)),
            Self::Write { path, .. } => Some(path.clone()),
            Self::InvalidInput(_)
            | Self::Session { .. }
            | Self::Copy { .. }
            | Self::Finalize { .. } => None,
        }
    }
}

impl From<TypeError> for ReplaceError {
    fn from(e: TypeError) -> Self {
        Self::InvalidInput(e.to_string())
    }
}

/// Result alias for replace operations.
pub type ReplaceResult<T> = Result<T, ReplaceError>;
