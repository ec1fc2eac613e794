use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown datastore: {0}")]
    UnknownDatastore(String),

    #[error("invalid node name: {0:?}")]
    InvalidName(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
