//! REMOVE of a subtree or an owned attribute / namespace.

use arbor_core::{subtree_keys, Kind, NodeKey};
use arbor_index::ChangeType;
use tracing::debug;

use crate::engine::MutationEngine;
use crate::error::{MutationError, MutationResult};
use crate::ops::link::{both_text, drop_record, merge_texts, unlink};

const OP: &str = "remove";

/// Remove `key`. Returns the new cursor: the right sibling, else the left
/// sibling, else the parent.
pub(crate) fn remove(engine: &mut MutationEngine, key: NodeKey) -> MutationResult<NodeKey> {
    match engine.node(key, OP)?.kind() {
        Kind::Document => Err(MutationError::RemoveDocument),
        Kind::Attribute | Kind::Namespace => remove_owned(engine, key),
        _ => remove_structural(engine, key),
    }
}

fn remove_owned(engine: &mut MutationEngine, key: NodeKey) -> MutationResult<NodeKey> {
    let node = engine.node(key, OP)?;
    let kind = node.kind();
    let owner = node
        .parent
        .ok_or_else(|| MutationError::node_not_found(key, OP))?;

    engine.notify(ChangeType::Delete, key)?;
    let record = drop_record(engine, key)?;
    let owner_node = engine.modify(owner)?;
    let list = match kind {
        Kind::Attribute => owner_node.attributes_mut(),
        _ => owner_node.namespaces_mut(),
    };
    if let Some(list) = list {
        list.retain(|&k| k != key);
    }
    engine.hashes.on_detach(&mut *engine.page, owner, record.hash, 0)?;
    engine.cursor = owner;
    Ok(owner)
}

fn remove_structural(engine: &mut MutationEngine, key: NodeKey) -> MutationResult<NodeKey> {
    let keys = subtree_keys(&*engine.page, key);
    // Children before their parents.
    for &k in keys.iter().rev() {
        engine.notify(ChangeType::Delete, k)?;
    }

    let at = unlink(engine, key)?;
    let node = engine.node(key, OP)?;
    let (hash, size) = (node.hash, node.subtree_size());
    for &k in keys.iter().rev() {
        drop_record(engine, k)?;
    }
    engine.hashes.on_detach(&mut *engine.page, at.parent, hash, size)?;

    let cursor = match (at.left, at.right) {
        (Some(left), Some(right)) if both_text(engine, left, right) => {
            merge_texts(engine, left, right)?;
            left
        }
        (left, right) => right.or(left).unwrap_or(at.parent),
    };
    engine.cursor = cursor;
    debug!(%key, removed = keys.len(), %cursor, "removed subtree");
    Ok(cursor)
}
