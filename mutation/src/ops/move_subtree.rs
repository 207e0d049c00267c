//! MOVE of a structural subtree to a new position.

use arbor_core::{subtree_keys, Kind, NodeKey};
use arbor_index::ChangeType;
use tracing::debug;

use crate::engine::MutationEngine;
use crate::error::{MutationError, MutationResult};
use crate::ops::link::{both_text, link, merge_texts, unlink};
use crate::ops::relabel::relabel;
use crate::ops::value::rederive_paths;
use crate::validation::{check_no_cycle, placement};
use crate::InsertPosition;

const OP: &str = "move subtree";

pub(crate) fn move_subtree(
    engine: &mut MutationEngine,
    key: NodeKey,
    anchor: NodeKey,
    position: InsertPosition,
) -> MutationResult<NodeKey> {
    let node = engine.node(key, OP)?;
    match node.kind() {
        Kind::Document => return Err(MutationError::MoveDocument),
        kind if !kind.is_structural() => return Err(MutationError::not_structural(key, kind, OP)),
        _ => {}
    }
    let current_parent = node.parent;
    if key == anchor {
        return Err(MutationError::MoveOntoSelf { key });
    }
    let at = placement(engine, anchor, position, OP)?;
    check_no_cycle(&*engine.page, key, at.parent)?;

    engine.cursor = key;
    if current_parent == Some(at.parent) && (at.left == Some(key) || at.right == Some(key)) {
        return Ok(key);
    }

    let keys = subtree_keys(&*engine.page, key);
    for &k in &keys {
        engine.notify(ChangeType::Delete, k)?;
    }

    let old = unlink(engine, key)?;
    let node = engine.node(key, OP)?;
    let (hash, size) = (node.hash, node.subtree_size());
    engine.hashes.on_detach(&mut *engine.page, old.parent, hash, size)?;
    if let (Some(left), Some(right)) = (old.left, old.right) {
        if both_text(engine, left, right) {
            // The anchor must survive so the destination stays valid.
            if right == anchor {
                merge_texts(engine, right, left)?;
            } else {
                merge_texts(engine, left, right)?;
            }
        }
    }

    // The old neighbours may have been the anchor's neighbours too.
    let at = placement(engine, anchor, position, OP)?;
    link(engine, key, at)?;
    engine.hashes.on_attach(&mut *engine.page, key)?;
    rederive_paths(engine, key)?;
    for &k in &keys {
        engine.notify(ChangeType::Insert, k)?;
    }
    relabel(engine, key)?;

    engine.cursor = key;
    debug!(%key, from = %old.parent, to = %at.parent, nodes = keys.len(), "moved subtree");
    Ok(key)
}
