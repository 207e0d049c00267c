//! Read-only access to node records.

use crate::{NameKey, NameRef, Node, NodeKey, QName};

/// Read access to the records and name dictionary of one revision.
pub trait NodeReader {
    /// Look up a node record.
    fn record(&self, key: NodeKey) -> Option<&Node>;

    /// Resolve a name dictionary key.
    fn name(&self, key: NameKey) -> Option<&str>;
}

/// Resolve the dictionary keys of `name` into a qualified name.
pub fn resolve_name<R: NodeReader + ?Sized>(reader: &R, name: &NameRef) -> QName {
    let part = |key: Option<NameKey>| {
        key.and_then(|k| reader.name(k))
            .unwrap_or_default()
            .to_string()
    };
    QName::qualified(part(name.prefix), part(name.local), part(name.uri))
}

/// Iterator over the structural children of a node, left to right.
pub struct Children<'a, R: NodeReader + ?Sized> {
    reader: &'a R,
    next: Option<NodeKey>,
}

impl<'a, R: NodeReader + ?Sized> Iterator for Children<'a, R> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.reader.record(self.next?)?;
        self.next = node.right_sibling();
        Some(node)
    }
}

/// Iterate the structural children of `key`.
pub fn children<R: NodeReader + ?Sized>(reader: &R, key: NodeKey) -> Children<'_, R> {
    Children {
        reader,
        next: reader.record(key).and_then(|n| n.first_child()),
    }
}

/// Keys of the subtree rooted at `root` in document order: each element is
/// followed by its namespaces, its attributes, then its children's subtrees.
pub fn subtree_keys<R: NodeReader + ?Sized>(reader: &R, root: NodeKey) -> Vec<NodeKey> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(key) = stack.pop() {
        let Some(node) = reader.record(key) else {
            continue;
        };
        out.push(key);
        out.extend_from_slice(node.namespaces());
        out.extend_from_slice(node.attributes());
        let kids: Vec<NodeKey> = children(reader, key).map(|c| c.key).collect();
        stack.extend(kids.into_iter().rev());
    }
    out
}

/// Ancestors of `key`, nearest first, ending with the document.
pub fn ancestors<R: NodeReader + ?Sized>(reader: &R, key: NodeKey) -> Vec<NodeKey> {
    let mut out = Vec::new();
    let mut current = reader.record(key).and_then(|n| n.parent);
    while let Some(parent) = current {
        out.push(parent);
        current = reader.record(parent).and_then(|n| n.parent);
    }
    out
}
