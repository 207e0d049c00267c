//! COPY of subtrees and bulk insert of event streams.

use arbor_core::{Kind, NodeKey, NodeReader};
use tracing::debug;

use crate::engine::MutationEngine;
use crate::error::{MutationError, MutationResult};
use crate::event::{subtree_events, SubtreeEvent};
use crate::ops::attribute::{insert_attribute, insert_namespace};
use crate::ops::insert::{insert_structural, NewNode};
use crate::validation::validate_events;
use crate::InsertPosition;

const OP: &str = "copy subtree";

/// Capture the subtree at `key` of `source` as events. A document source
/// contributes its first child.
pub(crate) fn capture<R: NodeReader + ?Sized>(source: &R, key: NodeKey) -> MutationResult<Vec<SubtreeEvent>> {
    let node = source
        .record(key)
        .ok_or_else(|| MutationError::node_not_found(key, OP))?;
    let root = match node.kind() {
        Kind::Document => node
            .first_child()
            .ok_or_else(|| MutationError::malformed_subtree("source document is empty"))?,
        kind if !kind.is_structural() => return Err(MutationError::not_structural(key, kind, OP)),
        _ => key,
    };
    subtree_events(source, root)
}

/// Insert `events` in document order, the first top-level node at
/// `position` of `anchor` and every later one to the right of its
/// predecessor. Returns the first top-level node.
pub(crate) fn insert_events(
    engine: &mut MutationEngine,
    anchor: NodeKey,
    position: InsertPosition,
    events: &[SubtreeEvent],
    coalesce: bool,
) -> MutationResult<NodeKey> {
    validate_events(events, OP)?;
    let mut first: Option<NodeKey> = None;
    let mut last_top: Option<NodeKey> = None;
    // Open elements with the last child inserted into each.
    let mut open: Vec<(NodeKey, Option<NodeKey>)> = Vec::new();

    for event in events {
        let (target, at) = match open.last() {
            Some(&(element, None)) => (element, InsertPosition::AsFirstChild),
            Some(&(_, Some(last))) => (last, InsertPosition::AsRightSibling),
            None => match last_top {
                Some(last) => (last, InsertPosition::AsRightSibling),
                None => (anchor, position),
            },
        };
        let (key, is_element) = match event {
            SubtreeEvent::StartElement {
                name,
                namespaces,
                attributes,
            } => {
                let key = insert_structural(engine, target, at, NewNode::Element(name), false)?;
                for ns in namespaces {
                    insert_namespace(engine, key, ns)?;
                }
                for (attr, value) in attributes {
                    insert_attribute(engine, key, attr, value)?;
                }
                (key, true)
            }
            SubtreeEvent::EndElement => {
                open.pop();
                continue;
            }
            SubtreeEvent::Text(text) => {
                (insert_structural(engine, target, at, NewNode::Text(text), coalesce)?, false)
            }
            SubtreeEvent::Comment(text) => {
                (insert_structural(engine, target, at, NewNode::Comment(text), false)?, false)
            }
            SubtreeEvent::ProcessingInstruction { target: pi, content } => {
                let new = NewNode::ProcessingInstruction { target: pi, content };
                (insert_structural(engine, target, at, new, false)?, false)
            }
        };
        match open.last_mut() {
            Some((_, last)) => *last = Some(key),
            None => {
                last_top = Some(key);
                first.get_or_insert(key);
            }
        }
        if is_element {
            open.push((key, None));
        }
    }
    let first = first.ok_or_else(|| MutationError::malformed_subtree("no nodes"))?;
    engine.cursor = first;
    Ok(first)
}

/// Insert a stream with per-node hashing suppressed and settled once at the end.
pub(crate) fn insert_subtree(
    engine: &mut MutationEngine,
    anchor: NodeKey,
    position: InsertPosition,
    events: &[SubtreeEvent],
) -> MutationResult<NodeKey> {
    engine.hashes.begin_bulk();
    let inserted = insert_events(engine, anchor, position, events, true);
    let settled = engine.hashes.finish_bulk(&mut *engine.page);
    let key = inserted?;
    settled?;
    debug!(%key, events = events.len(), "bulk inserted subtree");
    Ok(key)
}
