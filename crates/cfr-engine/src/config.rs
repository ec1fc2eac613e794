use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ReplaceError, ReplaceResult};

/// Configuration for the replace engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplaceConfig {
    /// Reload the session's view of `running`/`startup` before applying, so
    /// stale staged edits are not committed along with the new content.
    pub refresh_before_replace: bool,
    /// Language tag attached to error messages in protocol replies.
    pub error_language: String,
}

impl Default for ReplaceConfig {
    fn default() -> Self {
        Self {
            refresh_before_replace: true,
            error_language: "en".into(),
        }
    }
}

impl ReplaceConfig {
    /// Parse a TOML document. Missing keys take their default values.
    pub fn from_toml_str(s: &str) -> ReplaceResult<Self> {
        toml::from_str(s).map_err(|e| ReplaceError::InvalidInput(format!("config: {e}")))
    }

    /// Load a TOML file.
    pub fn load(path: &Path) -> ReplaceResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            ReplaceError::InvalidInput(format!("config {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }
}
