use serde::{Deserialize, Serialize};

/// The schema kind of a configuration node.
///
/// This is a closed set: every consumer matches it exhaustively, so a new
/// kind is a compile-time decision point everywhere it matters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum NodeKind {
    /// Interior node. A presence container is meaningful by its existence.
    Container {
        #[serde(default)]
        presence: bool,
    },
    /// Terminal node with a single value.
    Leaf,
    /// One instance of a leaf-list.
    LeafList,
    /// One list instance. Its first `keys` children are its key leaves.
    List { keys: usize },
    /// Anydata/anyxml node carrying an opaque serialized value.
    AnyOpaque,
}

impl NodeKind {
    /// Short lowercase name, used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Container { .. } => "container",
            Self::Leaf => "leaf",
            Self::LeafList => "leaf-list",
            Self::List { .. } => "list",
            Self::AnyOpaque => "anydata",
        }
    }

    /// Returns `true` for kinds that never have children.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Leaf | Self::LeafList | Self::AnyOpaque)
    }
}

/// A node of an incoming configuration tree.
///
/// The tree owns its nodes: children are held by value, in document order.
/// Schema validation has already happened upstream, so the kind, the owning
/// module and the key count are trusted as given.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigNode {
    /// Name of the schema module the node belongs to.
    pub module: String,
    /// Local (unqualified) schema name.
    pub name: String,
    pub kind: NodeKind,
    /// Canonical value for leaves, leaf-list instances and opaque nodes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ConfigNode>,
}

impl ConfigNode {
    fn new(module: &str, name: &str, kind: NodeKind, value: Option<String>) -> Self {
        Self {
            module: module.to_string(),
            name: name.to_string(),
            kind,
            value,
            children: Vec::new(),
        }
    }

    /// A non-presence container.
    pub fn container(module: &str, name: &str) -> Self {
        Self::new(module, name, NodeKind::Container { presence: false }, None)
    }

    /// A presence container.
    pub fn presence_container(module: &str, name: &str) -> Self {
        Self::new(module, name, NodeKind::Container { presence: true }, None)
    }

    pub fn leaf(module: &str, name: &str, value: impl Into<String>) -> Self {
        Self::new(module, name, NodeKind::Leaf, Some(value.into()))
    }

    pub fn leaf_list(module: &str, name: &str, value: impl Into<String>) -> Self {
        Self::new(module, name, NodeKind::LeafList, Some(value.into()))
    }

    /// A list instance whose first `keys` children will be its key leaves.
    pub fn list(module: &str, name: &str, keys: usize) -> Self {
        Self::new(module, name, NodeKind::List { keys }, None)
    }

    pub fn any_opaque(module: &str, name: &str, content: impl Into<String>) -> Self {
        Self::new(module, name, NodeKind::AnyOpaque, Some(content.into()))
    }

    /// Append a child and return `self`, for building trees inline.
    pub fn with_child(mut self, child: ConfigNode) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children in order.
    pub fn with_children(mut self, children: impl IntoIterator<Item = ConfigNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Number of nodes in the subtree rooted here, including `self`.
    pub fn subtree_len(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(node.children.iter());
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_set_kind_and_value() {
        let leaf = ConfigNode::leaf("m", "mtu", "1500");
        assert_eq!(leaf.kind, NodeKind::Leaf);
        assert_eq!(leaf.value.as_deref(), Some("1500"));

        let list = ConfigNode::list("m", "interface", 2);
        assert_eq!(list.kind, NodeKind::List { keys: 2 });
        assert!(list.value.is_none());

        let p = ConfigNode::presence_container("m", "enabled");
        assert_eq!(p.kind, NodeKind::Container { presence: true });
    }

    #[test]
    fn with_child_preserves_document_order() {
        let node = ConfigNode::list("m", "user", 1)
            .with_child(ConfigNode::leaf("m", "name", "alice"))
            .with_children([
                ConfigNode::leaf("m", "uid", "1000"),
                ConfigNode::leaf("m", "shell", "/bin/sh"),
            ]);
        let names: Vec<&str> = node.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["name", "uid", "shell"]);
        assert_eq!(node.subtree_len(), 4);
    }

    #[test]
    fn terminal_kinds() {
        assert!(NodeKind::Leaf.is_terminal());
        assert!(NodeKind::LeafList.is_terminal());
        assert!(NodeKind::AnyOpaque.is_terminal());
        assert!(!NodeKind::List { keys: 1 }.is_terminal());
        assert!(!NodeKind::Container { presence: true }.is_terminal());
    }

    #[test]
    fn deserializes_from_json() {
        let json = r#"{
            "module": "ietf-interfaces",
            "name": "interfaces",
            "kind": { "type": "container" },
            "children": [
                { "module": "ietf-interfaces", "name": "interface",
                  "kind": { "type": "list", "keys": 1 },
                  "children": [
                    { "module": "ietf-interfaces", "name": "name",
                      "kind": { "type": "leaf" }, "value": "eth0" }
                  ] }
            ]
        }"#;
        let node: ConfigNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.kind, NodeKind::Container { presence: false });
        assert_eq!(node.children[0].kind, NodeKind::List { keys: 1 });
        assert_eq!(node.children[0].children[0].value.as_deref(), Some("eth0"));
    }
}
