//! Path summary.
//!
//! Every distinct root-to-node path of named nodes gets one path node. Named
//! records store the key of their path node; the summary counts how many
//! records refer to each entry and drops entries nobody refers to.

use std::collections::HashMap;

use arbor_core::{resolve_name, Kind, NodeKey, NodeReader, PathNodeKey, QName};
use tracing::trace;

/// One entry of the path summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathNode {
    pub key: PathNodeKey,
    pub parent: Option<PathNodeKey>,
    pub kind: Kind,
    pub name: QName,
    pub level: u32,
    pub references: u64,
}

/// Writer side of the path summary.
pub trait PathSummary: Send {
    /// Path key for a node of `kind` named `name` below `parent`. Takes a reference.
    fn path_node_key(&mut self, parent: Option<PathNodeKey>, name: &QName, kind: Kind)
        -> PathNodeKey;

    /// Drop one reference.
    fn release(&mut self, key: PathNodeKey);

    fn get(&self, key: PathNodeKey) -> Option<&PathNode>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget every entry.
    fn clear(&mut self);

    /// Take a reference on an entry whose key is already stored in a record.
    fn restore(&mut self, key: PathNodeKey, parent: Option<PathNodeKey>, name: &QName, kind: Kind);

    /// Move a node's reference from `old` to the path matching its new parent or name.
    fn adapt_path_for_changed_node(
        &mut self,
        old: Option<PathNodeKey>,
        parent: Option<PathNodeKey>,
        name: &QName,
        kind: Kind,
    ) -> PathNodeKey {
        let fresh = self.path_node_key(parent, name, kind);
        if let Some(old) = old {
            self.release(old);
        }
        fresh
    }
}

/// Rebuild `summary` from the path keys stored in the tree.
pub fn rebuild<R: NodeReader + ?Sized>(summary: &mut dyn PathSummary, reader: &R) {
    summary.clear();
    let mut stack: Vec<(NodeKey, Option<PathNodeKey>)> = vec![(NodeKey::DOCUMENT, None)];
    while let Some((key, parent_path)) = stack.pop() {
        let Some(node) = reader.record(key) else {
            continue;
        };
        let mut own_path = parent_path;
        if let Some(name) = node.name() {
            if let Some(path) = name.path_node {
                summary.restore(path, parent_path, &resolve_name(reader, name), node.kind());
                if node.kind() == Kind::Element {
                    own_path = Some(path);
                }
            }
        }
        for &owned in node.namespaces().iter().chain(node.attributes()) {
            if let Some(child) = reader.record(owned) {
                if let Some(path) = child.name().and_then(|n| n.path_node) {
                    let name = child.name().map(|n| resolve_name(reader, n)).unwrap_or_default();
                    summary.restore(path, own_path, &name, child.kind());
                }
            }
        }
        let mut child = node.first_child();
        while let Some(child_key) = child {
            stack.push((child_key, own_path));
            child = reader.record(child_key).and_then(|c| c.right_sibling());
        }
    }
}

/// In-memory path summary.
#[derive(Debug)]
pub struct MemoryPathSummary {
    nodes: HashMap<PathNodeKey, PathNode>,
    lookup: HashMap<(Option<PathNodeKey>, Kind, QName), PathNodeKey>,
    next_key: u64,
}

impl Default for MemoryPathSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPathSummary {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            lookup: HashMap::new(),
            next_key: 1,
        }
    }

    pub fn paths(&self) -> impl Iterator<Item = &PathNode> {
        self.nodes.values()
    }

    fn level_below(&self, parent: Option<PathNodeKey>) -> u32 {
        parent
            .and_then(|p| self.nodes.get(&p))
            .map(|p| p.level + 1)
            .unwrap_or(1)
    }
}

impl PathSummary for MemoryPathSummary {
    fn path_node_key(
        &mut self,
        parent: Option<PathNodeKey>,
        name: &QName,
        kind: Kind,
    ) -> PathNodeKey {
        let lookup = (parent, kind, name.clone());
        if let Some(key) = self.lookup.get(&lookup).copied() {
            if let Some(node) = self.nodes.get_mut(&key) {
                node.references += 1;
                return key;
            }
        }
        let key = PathNodeKey::new(self.next_key);
        self.next_key += 1;
        let level = self.level_below(parent);
        trace!(%key, %name, %kind, "path node created");
        self.nodes.insert(
            key,
            PathNode {
                key,
                parent,
                kind,
                name: name.clone(),
                level,
                references: 1,
            },
        );
        self.lookup.insert(lookup, key);
        key
    }

    fn release(&mut self, key: PathNodeKey) {
        let Some(node) = self.nodes.get_mut(&key) else {
            return;
        };
        node.references = node.references.saturating_sub(1);
        if node.references == 0 {
            let lookup = (node.parent, node.kind, node.name.clone());
            self.nodes.remove(&key);
            self.lookup.remove(&lookup);
        }
    }

    fn get(&self, key: PathNodeKey) -> Option<&PathNode> {
        self.nodes.get(&key)
    }

    fn len(&self) -> usize {
        self.nodes.len()
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.lookup.clear();
        self.next_key = 1;
    }

    fn restore(&mut self, key: PathNodeKey, parent: Option<PathNodeKey>, name: &QName, kind: Kind) {
        self.next_key = self.next_key.max(key.raw() + 1);
        if let Some(node) = self.nodes.get_mut(&key) {
            node.references += 1;
            return;
        }
        let level = self.level_below(parent);
        self.nodes.insert(
            key,
            PathNode {
                key,
                parent,
                kind,
                name: name.clone(),
                level,
                references: 1,
            },
        );
        self.lookup.insert((parent, kind, name.clone()), key);
    }
}
