//! Protocol layer for `<copy-config>`.
//!
//! Turns a decoded request into a [`ReplaceEngine`](cfr_engine::ReplaceEngine)
//! call and the engine's single result into an `rpc-reply`.

pub mod error;
pub mod handler;
pub mod message;

pub use error::{ProtocolError, ProtocolResult};
pub use handler::{handle_copy_config, resolve_datastore};
pub use message::{CopyConfigRequest, ErrorMessage, ErrorTag, ErrorType, RpcError, RpcReply, SourceSpec};
