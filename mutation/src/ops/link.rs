//! Sibling-chain plumbing shared by insert, remove and move.

use arbor_core::{Kind, Node, NodeKey};
use arbor_index::ChangeType;
use arbor_store::Placement;

use crate::engine::MutationEngine;
use crate::error::{MutationError, MutationResult};
use crate::ops::value::write_value;

/// Link `key` into the sibling chain at `at` and update the parent.
pub(crate) fn link(engine: &mut MutationEngine, key: NodeKey, at: Placement) -> MutationResult<()> {
    let node = engine.modify(key)?;
    node.parent = Some(at.parent);
    if let Some(links) = node.links_mut() {
        links.left_sibling = at.left;
        links.right_sibling = at.right;
    }
    if let Some(left) = at.left {
        if let Some(links) = engine.modify(left)?.links_mut() {
            links.right_sibling = Some(key);
        }
    }
    if let Some(right) = at.right {
        if let Some(links) = engine.modify(right)?.links_mut() {
            links.left_sibling = Some(key);
        }
    }
    if let Some(links) = engine.modify(at.parent)?.links_mut() {
        links.child_count += 1;
        if at.left.is_none() {
            links.first_child = Some(key);
        }
    }
    Ok(())
}

/// Take `key` out of its sibling chain. The node keeps its parent key and
/// its own subtree. Returns where it used to be.
pub(crate) fn unlink(engine: &mut MutationEngine, key: NodeKey) -> MutationResult<Placement> {
    let node = engine.node(key, "unlink")?;
    let parent = node.parent.ok_or(MutationError::RemoveDocument)?;
    let (left, right) = (node.left_sibling(), node.right_sibling());
    if let Some(left) = left {
        if let Some(links) = engine.modify(left)?.links_mut() {
            links.right_sibling = right;
        }
    }
    if let Some(right) = right {
        if let Some(links) = engine.modify(right)?.links_mut() {
            links.left_sibling = left;
        }
    }
    if let Some(links) = engine.modify(parent)?.links_mut() {
        links.child_count = links.child_count.saturating_sub(1);
        if links.first_child == Some(key) {
            links.first_child = right;
        }
    }
    if let Some(links) = engine.modify(key)?.links_mut() {
        links.left_sibling = None;
        links.right_sibling = None;
    }
    Ok(Placement { parent, left, right })
}

/// Delete a record and release its name references.
pub(crate) fn drop_record(engine: &mut MutationEngine, key: NodeKey) -> MutationResult<Node> {
    let record = engine.page.remove_entry(key)?;
    if let Some(name) = record.name() {
        engine.release_name(name, true)?;
    }
    Ok(record)
}

/// Whether both keys are text nodes.
pub(crate) fn both_text(engine: &MutationEngine, left: NodeKey, right: NodeKey) -> bool {
    let is_text = |key| engine.page.record(key).is_some_and(|n| n.kind() == Kind::Text);
    is_text(left) && is_text(right)
}

/// Merge two adjacent text siblings. `survivor` keeps its key and receives
/// the concatenated content in document order; `absorbed` is deleted.
pub(crate) fn merge_texts(
    engine: &mut MutationEngine,
    survivor: NodeKey,
    absorbed: NodeKey,
) -> MutationResult<()> {
    let survivor_is_left = engine.node(survivor, "merge text")?.right_sibling() == Some(absorbed);
    let kept = engine.text(survivor)?;
    let gone = engine.text(absorbed)?;
    let merged = if survivor_is_left {
        kept + &gone
    } else {
        gone + &kept
    };

    engine.notify(ChangeType::Delete, absorbed)?;
    let at = unlink(engine, absorbed)?;
    let record = drop_record(engine, absorbed)?;
    engine
        .hashes
        .on_detach(&mut *engine.page, at.parent, record.hash, 1)?;
    write_value(engine, survivor, &merged)
}
