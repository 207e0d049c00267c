//! Node records.
//!
//! A node is a tagged union over its kind. Structural kinds carry sibling and
//! child links, named kinds carry a `NameRef`, valued kinds carry a `Value`.
//! All links are node keys into the page store, never references.

use crate::{Kind, NameKey, NodeKey, OrderLabel, PathNodeKey, Value};

/// Tree links of a structural node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StructLinks {
    pub first_child: Option<NodeKey>,
    pub left_sibling: Option<NodeKey>,
    pub right_sibling: Option<NodeKey>,
    pub child_count: u64,
    pub descendant_count: u64,
}

impl StructLinks {
    /// Links for a freshly created, childless node.
    pub fn between(left_sibling: Option<NodeKey>, right_sibling: Option<NodeKey>) -> Self {
        Self {
            first_child: None,
            left_sibling,
            right_sibling,
            child_count: 0,
            descendant_count: 0,
        }
    }
}

/// Dictionary keys of a node's qualified name plus its path summary entry.
///
/// Empty name parts have no dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NameRef {
    pub prefix: Option<NameKey>,
    pub local: Option<NameKey>,
    pub uri: Option<NameKey>,
    pub path_node: Option<PathNodeKey>,
}

impl NameRef {
    /// All dictionary keys held by this name.
    pub fn keys(&self) -> impl Iterator<Item = NameKey> {
        [self.prefix, self.local, self.uri].into_iter().flatten()
    }
}

/// Kind-specific payload of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document {
        links: StructLinks,
    },
    Element {
        links: StructLinks,
        name: NameRef,
        attributes: Vec<NodeKey>,
        namespaces: Vec<NodeKey>,
    },
    Text {
        links: StructLinks,
        value: Value,
    },
    Comment {
        links: StructLinks,
        value: Value,
    },
    ProcessingInstruction {
        links: StructLinks,
        name: NameRef,
        value: Value,
    },
    Attribute {
        name: NameRef,
        value: Value,
    },
    Namespace {
        name: NameRef,
    },
}

/// A node record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub key: NodeKey,
    /// Owning node. Only the document has none.
    pub parent: Option<NodeKey>,
    /// Subtree hash; zero when hashing is disabled.
    pub hash: u64,
    pub label: Option<OrderLabel>,
    pub kind: NodeKind,
}

impl Node {
    pub fn kind(&self) -> Kind {
        match &self.kind {
            NodeKind::Document { .. } => Kind::Document,
            NodeKind::Element { .. } => Kind::Element,
            NodeKind::Text { .. } => Kind::Text,
            NodeKind::Comment { .. } => Kind::Comment,
            NodeKind::ProcessingInstruction { .. } => Kind::ProcessingInstruction,
            NodeKind::Attribute { .. } => Kind::Attribute,
            NodeKind::Namespace { .. } => Kind::Namespace,
        }
    }

    pub fn is_structural(&self) -> bool {
        self.links().is_some()
    }

    pub fn links(&self) -> Option<&StructLinks> {
        match &self.kind {
            NodeKind::Document { links }
            | NodeKind::Element { links, .. }
            | NodeKind::Text { links, .. }
            | NodeKind::Comment { links, .. }
            | NodeKind::ProcessingInstruction { links, .. } => Some(links),
            NodeKind::Attribute { .. } | NodeKind::Namespace { .. } => None,
        }
    }

    pub fn links_mut(&mut self) -> Option<&mut StructLinks> {
        match &mut self.kind {
            NodeKind::Document { links }
            | NodeKind::Element { links, .. }
            | NodeKind::Text { links, .. }
            | NodeKind::Comment { links, .. }
            | NodeKind::ProcessingInstruction { links, .. } => Some(links),
            NodeKind::Attribute { .. } | NodeKind::Namespace { .. } => None,
        }
    }

    pub fn name(&self) -> Option<&NameRef> {
        match &self.kind {
            NodeKind::Element { name, .. }
            | NodeKind::ProcessingInstruction { name, .. }
            | NodeKind::Attribute { name, .. }
            | NodeKind::Namespace { name } => Some(name),
            _ => None,
        }
    }

    pub fn name_mut(&mut self) -> Option<&mut NameRef> {
        match &mut self.kind {
            NodeKind::Element { name, .. }
            | NodeKind::ProcessingInstruction { name, .. }
            | NodeKind::Attribute { name, .. }
            | NodeKind::Namespace { name } => Some(name),
            _ => None,
        }
    }

    pub fn value(&self) -> Option<&Value> {
        match &self.kind {
            NodeKind::Text { value, .. }
            | NodeKind::Comment { value, .. }
            | NodeKind::ProcessingInstruction { value, .. }
            | NodeKind::Attribute { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn value_mut(&mut self) -> Option<&mut Value> {
        match &mut self.kind {
            NodeKind::Text { value, .. }
            | NodeKind::Comment { value, .. }
            | NodeKind::ProcessingInstruction { value, .. }
            | NodeKind::Attribute { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Attribute keys in declaration order; empty for non-elements.
    pub fn attributes(&self) -> &[NodeKey] {
        match &self.kind {
            NodeKind::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    /// Namespace keys in declaration order; empty for non-elements.
    pub fn namespaces(&self) -> &[NodeKey] {
        match &self.kind {
            NodeKind::Element { namespaces, .. } => namespaces,
            _ => &[],
        }
    }

    pub fn attributes_mut(&mut self) -> Option<&mut Vec<NodeKey>> {
        match &mut self.kind {
            NodeKind::Element { attributes, .. } => Some(attributes),
            _ => None,
        }
    }

    pub fn namespaces_mut(&mut self) -> Option<&mut Vec<NodeKey>> {
        match &mut self.kind {
            NodeKind::Element { namespaces, .. } => Some(namespaces),
            _ => None,
        }
    }

    pub fn first_child(&self) -> Option<NodeKey> {
        self.links().and_then(|l| l.first_child)
    }

    pub fn left_sibling(&self) -> Option<NodeKey> {
        self.links().and_then(|l| l.left_sibling)
    }

    pub fn right_sibling(&self) -> Option<NodeKey> {
        self.links().and_then(|l| l.right_sibling)
    }

    pub fn child_count(&self) -> u64 {
        self.links().map(|l| l.child_count).unwrap_or(0)
    }

    pub fn descendant_count(&self) -> u64 {
        self.links().map(|l| l.descendant_count).unwrap_or(0)
    }

    /// Number of structural nodes in the subtree rooted here, zero for
    /// attributes and namespaces.
    pub fn subtree_size(&self) -> u64 {
        self.links().map(|l| 1 + l.descendant_count).unwrap_or(0)
    }
}
