use cfr_types::TypeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("unknown datastore: {0}")]
    UnknownDatastore(String),

    #[error("unsupported source: {0}")]
    UnsupportedSource(String),

    #[error("source and target are both {0}")]
    SameDatastore(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] TypeError),
}

pub type ProtocolResult<T> = Result<T, ProtocolError>;
