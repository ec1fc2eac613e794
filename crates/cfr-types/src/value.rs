use std::fmt;

use serde::{Deserialize, Serialize};

/// The value record written to the datastore for one instance path.
///
/// Interior nodes carry no data of their own: a presence container or a list
/// instance is recorded by its existence alone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum Value {
    /// Existence marker for a presence container.
    PresenceContainer,
    /// Existence marker for a list instance.
    ListInstance,
    /// Canonical string form of a leaf.
    Scalar(String),
    /// Canonical string form of one leaf-list instance. Several entries
    /// share the same path and are told apart by their value.
    LeafListEntry(String),
    /// Serialized anydata/anyxml content, stored uninterpreted.
    Opaque(String),
}

impl Value {
    /// Returns the textual payload, if this value carries one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) | Self::LeafListEntry(s) | Self::Opaque(s) => Some(s),
            Self::PresenceContainer | Self::ListInstance => None,
        }
    }

    /// Returns `true` for the data-less existence markers.
    pub fn is_marker(&self) -> bool {
        matches!(self, Self::PresenceContainer | Self::ListInstance)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PresenceContainer => f.write_str("(presence)"),
            Self::ListInstance => f.write_str("(list instance)"),
            Self::Scalar(s) => write!(f, "{s:?}"),
            Self::LeafListEntry(s) => write!(f, "{s:?} (leaf-list entry)"),
            Self::Opaque(s) => write!(f, "<opaque {} bytes>", s.len()),
        }
    }
}
