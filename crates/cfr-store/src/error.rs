/// Errors from datastore operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The session is not allowed to modify the path.
    #[error("access denied: {path}")]
    PermissionDenied { path: String },

    /// The backend cannot serve requests at the moment.
    #[error("datastore unavailable: {0}")]
    Unavailable(String),

    /// The path or delete expression could not be interpreted.
    #[error("invalid path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    /// The operation is not valid for the session's datastore.
    #[error("operation not supported: {0}")]
    Unsupported(String),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of a [`StoreError`], used to decide whether a
/// failed write may be skipped or must abort the operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StoreErrorKind {
    PermissionDenied,
    Unavailable,
    Other,
}

impl StoreError {
    pub fn kind(&self) -> StoreErrorKind {
        match self {
            Self::PermissionDenied { .. } => StoreErrorKind::PermissionDenied,
            Self::Unavailable(_) | Self::Io(_) => StoreErrorKind::Unavailable,
            Self::InvalidPath { .. } | Self::Unsupported(_) | Self::Serialization(_) => {
                StoreErrorKind::Other
            }
        }
    }

    pub fn is_permission_denied(&self) -> bool {
        self.kind() == StoreErrorKind::PermissionDenied
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
