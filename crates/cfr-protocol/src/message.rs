use cfr_types::ConfigNode;
use serde::{Deserialize, Serialize};

/// A decoded `<copy-config>` request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyConfigRequest {
    /// Name of the target datastore.
    pub target: String,
    pub source: SourceSpec,
}

/// The `<source>` element of a request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceSpec {
    /// A named datastore.
    Datastore(String),
    /// Inline top-level configuration nodes.
    Config(Vec<ConfigNode>),
    /// A remote or local URL.
    Url(String),
}

/// Reply to an rpc.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RpcReply {
    Ok,
    RpcError(RpcError),
}

impl RpcReply {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    pub fn error(&self) -> Option<&RpcError> {
        match self {
            Self::Ok => None,
            Self::RpcError(e) => Some(e),
        }
    }
}

/// Layer at which an error occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorType {
    Protocol,
    Application,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorTag {
    AccessDenied,
    InvalidValue,
    OperationFailed,
    OperationNotSupported,
}

impl ErrorTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccessDenied => "access-denied",
            Self::InvalidValue => "invalid-value",
            Self::OperationFailed => "operation-failed",
            Self::OperationNotSupported => "operation-not-supported",
        }
    }
}

/// Human-readable error text with its language tag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessage {
    pub lang: String,
    pub text: String,
}

/// The content of an `<rpc-error>` element.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RpcError {
    pub error_type: ErrorType,
    pub error_tag: ErrorTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<ErrorMessage>,
}

impl RpcError {
    pub fn new(error_type: ErrorType, error_tag: ErrorTag) -> Self {
        Self {
            error_type,
            error_tag,
            error_path: None,
            error_message: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.error_path = Some(path.into());
        self
    }

    pub fn with_message(mut self, lang: &str, text: impl Into<String>) -> Self {
        self.error_message = Some(ErrorMessage {
            lang: lang.to_string(),
            text: text.into(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_json_uses_kebab_case() {
        let reply = RpcReply::RpcError(
            RpcError::new(ErrorType::Protocol, ErrorTag::AccessDenied).with_path("/m:a"),
        );
        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "rpc-error": {
                    "error-type": "protocol",
                    "error-tag": "access-denied",
                    "error-path": "/m:a"
                }
            })
        );
        assert_eq!(serde_json::to_value(RpcReply::Ok).unwrap(), "ok");
    }

    #[test]
    fn error_message_carries_language() {
        let err = RpcError::new(ErrorType::Application, ErrorTag::OperationFailed)
            .with_message("en", "commit failed");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["error-message"]["lang"], "en");
        assert_eq!(json["error-message"]["text"], "commit failed");
        assert!(json.get("error-path").is_none());
    }

    #[test]
    fn tag_names_match_serde() {
        for tag in [
            ErrorTag::AccessDenied,
            ErrorTag::InvalidValue,
            ErrorTag::OperationFailed,
            ErrorTag::OperationNotSupported,
        ] {
            assert_eq!(serde_json::to_value(tag).unwrap(), tag.as_str());
        }
    }

    #[test]
    fn request_from_json() {
        let json = r#"{
            "target": "running",
            "source": { "config": [
                { "module": "m", "name": "x", "kind": { "type": "leaf" }, "value": "1" }
            ] }
        }"#;
        let request: CopyConfigRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.target, "running");
        assert_eq!(
            request.source,
            SourceSpec::Config(vec![ConfigNode::leaf("m", "x", "1")])
        );
    }
}
