//! Content hashes and full recomputation.

use std::collections::HashMap;

use arbor_core::{resolve_name, subtree_keys, Kind, Node, NodeKey, NodeReader, QName};
use arbor_store::{StoreError, StoreResult};

/// Odd multiplier applied once per tree level.
pub const HASH_MULTIPLIER: u64 = 77081;

/// Hash of a node's own payload: its kind, name parts and value.
pub fn content_hash(kind: Kind, name: Option<&QName>, value: Option<&str>) -> u64 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&[kind.tag()]);
    if let Some(name) = name {
        for part in [name.prefix(), name.local(), name.uri()] {
            hasher.update(part.as_bytes());
            hasher.update(&[0]);
        }
    }
    if let Some(value) = value {
        hasher.update(value.as_bytes());
    }
    let digest = hasher.finalize();
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest.as_bytes()[..8]);
    u64::from_le_bytes(head)
}

/// Content hash of a stored node, with names resolved through `reader`.
pub fn own_hash<R: NodeReader + ?Sized>(reader: &R, node: &Node) -> StoreResult<u64> {
    let name = node.name().map(|n| resolve_name(reader, n));
    let value = node.value().map(|v| v.text()).transpose()?;
    Ok(content_hash(node.kind(), name.as_ref(), value.as_deref()))
}

/// Subtree hash from an own hash and the subtree hashes of everything the node owns.
pub fn combine(own: u64, owned: impl IntoIterator<Item = u64>) -> u64 {
    let sum = owned.into_iter().fold(0u64, |acc, h| acc.wrapping_add(h));
    own.wrapping_add(HASH_MULTIPLIER.wrapping_mul(sum))
}

/// Keys whose hashes feed into `node`'s hash.
pub(crate) fn owned_keys<R: NodeReader + ?Sized>(reader: &R, node: &Node) -> Vec<NodeKey> {
    let mut keys: Vec<NodeKey> = node
        .namespaces()
        .iter()
        .chain(node.attributes())
        .copied()
        .collect();
    keys.extend(arbor_core::children(reader, node.key).map(|c| c.key));
    keys
}

/// Recompute the hash of the subtree at `root` from scratch, writing nothing.
pub fn postorder_hash<R: NodeReader + ?Sized>(reader: &R, root: NodeKey) -> StoreResult<u64> {
    let mut computed: HashMap<NodeKey, u64> = HashMap::new();
    for key in subtree_keys(reader, root).into_iter().rev() {
        let node = reader.record(key).ok_or(StoreError::RecordNotFound(key))?;
        let owned = owned_keys(reader, node)
            .into_iter()
            .map(|k| computed.get(&k).copied().unwrap_or(0));
        let hash = combine(own_hash(reader, node)?, owned);
        computed.insert(key, hash);
    }
    computed
        .get(&root)
        .copied()
        .ok_or(StoreError::RecordNotFound(root))
}
