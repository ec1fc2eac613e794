//! `<copy-config>` request handler.

use cfr_engine::{ErrorKind, OperationResult, ReplaceEngine, Source};
use cfr_store::Datastore;
use cfr_types::{ConfigTree, DatastoreKind};
use tracing::{debug, warn};

use crate::error::{ProtocolError, ProtocolResult};
use crate::message::{CopyConfigRequest, ErrorTag, ErrorType, RpcError, RpcReply, SourceSpec};

/// Map a datastore name from a request to its kind.
pub fn resolve_datastore(name: &str) -> ProtocolResult<DatastoreKind> {
    name.parse()
        .map_err(|_| ProtocolError::UnknownDatastore(name.to_string()))
}

/// Execute a copy-config request against `store` and build the reply.
pub fn handle_copy_config<S: Datastore + ?Sized>(
    engine: &ReplaceEngine,
    store: &S,
    request: CopyConfigRequest,
) -> RpcReply {
    let lang = engine.config().error_language.as_str();
    let (target, source) = match decode(request) {
        Ok(decoded) => decoded,
        Err(e) => {
            warn!(error = %e, "copy-config rejected");
            return RpcReply::RpcError(rejection(&e, lang));
        }
    };
    debug!(%target, "copy-config accepted");
    reply(engine.replace(store, target, source), lang)
}

fn decode(request: CopyConfigRequest) -> ProtocolResult<(DatastoreKind, Source)> {
    let target = resolve_datastore(&request.target)?;
    let source = match request.source {
        SourceSpec::Datastore(name) => {
            let from = resolve_datastore(&name)?;
            if from == target {
                return Err(ProtocolError::SameDatastore(name));
            }
            Source::Datastore(from)
        }
        SourceSpec::Config(roots) => Source::Config(ConfigTree::from_roots(roots)?),
        SourceSpec::Url(url) => return Err(ProtocolError::UnsupportedSource(url)),
    };
    Ok((target, source))
}

/// Error for a request that never reached the engine.
fn rejection(e: &ProtocolError, lang: &str) -> RpcError {
    let (error_type, tag) = match e {
        ProtocolError::UnknownDatastore(_) | ProtocolError::SameDatastore(_) => {
            (ErrorType::Protocol, ErrorTag::InvalidValue)
        }
        ProtocolError::UnsupportedSource(_) => {
            (ErrorType::Protocol, ErrorTag::OperationNotSupported)
        }
        ProtocolError::InvalidConfig(_) => (ErrorType::Application, ErrorTag::InvalidValue),
    };
    RpcError::new(error_type, tag).with_message(lang, e.to_string())
}

fn reply(result: OperationResult, lang: &str) -> RpcReply {
    let error = match result {
        OperationResult::Ok => return RpcReply::Ok,
        OperationResult::OkWithError {
            path,
            kind: ErrorKind::PermissionDenied,
        } => RpcError::new(ErrorType::Protocol, ErrorTag::AccessDenied).with_path(path),
        OperationResult::OkWithError { path, kind } => {
            RpcError::new(ErrorType::Application, ErrorTag::OperationFailed)
                .with_path(path)
                .with_message(lang, format!("{kind:?}"))
        }
        OperationResult::Failed {
            kind: ErrorKind::InvalidInput,
            message,
            ..
        } => RpcError::new(ErrorType::Application, ErrorTag::InvalidValue)
            .with_message(lang, message),
        OperationResult::Failed {
            kind: ErrorKind::PermissionDenied,
            path,
            message,
        } => with_optional_path(
            RpcError::new(ErrorType::Protocol, ErrorTag::AccessDenied).with_message(lang, message),
            path,
        ),
        OperationResult::Failed { path, message, .. } => with_optional_path(
            RpcError::new(ErrorType::Application, ErrorTag::OperationFailed)
                .with_message(lang, message),
            path,
        ),
    };
    RpcReply::RpcError(error)
}

fn with_optional_path(error: RpcError, path: Option<String>) -> RpcError {
    match path {
        Some(path) => error.with_path(path),
        None => error,
    }
}
