use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// One of the well-known configuration datastores.
///
/// The protocol names are `running`, `startup` and `candidate`. The candidate
/// datastore is a staging area: edits made to it are not committed, they are
/// only published to `running` by an explicit commit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatastoreKind {
    Running,
    Startup,
    Candidate,
}

impl DatastoreKind {
    /// All datastores, in declaration order.
    pub const ALL: [DatastoreKind; 3] = [Self::Running, Self::Startup, Self::Candidate];

    /// The protocol-level name of this datastore.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Startup => "startup",
            Self::Candidate => "candidate",
        }
    }

    /// Returns `true` for the candidate (staging) datastore.
    pub fn is_candidate(&self) -> bool {
        matches!(self, Self::Candidate)
    }
}

impl fmt::Display for DatastoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatastoreKind {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(Self::Running),
            "startup" => Ok(Self::Startup),
            "candidate" => Ok(Self::Candidate),
            other => Err(TypeError::UnknownDatastore(other.to_string())),
        }
    }
}
