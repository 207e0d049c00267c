//! Precondition checks shared by the operations.
//!
//! Everything here is read-only and runs before an operation writes.

use std::collections::HashSet;

use arbor_core::{ancestors, validate_comment, validate_pi_content, Kind, NodeKey, NodeReader, QName};
use arbor_store::Placement;

use crate::engine::MutationEngine;
use crate::error::{MutationError, MutationResult};
use crate::event::SubtreeEvent;
use crate::InsertPosition;

/// Resolve where a structural node inserted at `position` of `anchor` goes.
pub(crate) fn placement(
    engine: &MutationEngine,
    anchor: NodeKey,
    position: InsertPosition,
    operation: &'static str,
) -> MutationResult<Placement> {
    let node = engine.node(anchor, operation)?;
    let invalid = || MutationError::invalid_position(anchor, node.kind(), position, operation);
    match position {
        InsertPosition::AsFirstChild => {
            if !node.kind().accepts_children() {
                return Err(invalid());
            }
            Ok(Placement::first_child(anchor, node.first_child()))
        }
        InsertPosition::AsLeftSibling | InsertPosition::AsRightSibling => {
            // The document has no parent, attributes and namespaces have no siblings.
            let parent = match node.parent {
                Some(parent) if node.is_structural() => parent,
                _ => return Err(invalid()),
            };
            Ok(if position == InsertPosition::AsLeftSibling {
                Placement {
                    parent,
                    left: node.left_sibling(),
                    right: Some(anchor),
                }
            } else {
                Placement {
                    parent,
                    left: Some(anchor),
                    right: node.right_sibling(),
                }
            })
        }
    }
}

/// Reject moving `moving` below itself by walking from `destination` to the root.
pub(crate) fn check_no_cycle<R: NodeReader + ?Sized>(
    reader: &R,
    moving: NodeKey,
    destination: NodeKey,
) -> MutationResult<()> {
    if destination == moving || ancestors(reader, destination).contains(&moving) {
        return Err(MutationError::MoveIntoSubtree {
            key: moving,
            destination,
        });
    }
    Ok(())
}

/// Check leaf content for its kind.
pub(crate) fn validate_content(kind: Kind, content: &str, operation: &'static str) -> MutationResult<()> {
    match kind {
        Kind::Text if content.is_empty() => Err(MutationError::EmptyText { operation }),
        Kind::Comment => Ok(validate_comment(content)?),
        Kind::ProcessingInstruction => Ok(validate_pi_content(content)?),
        _ => Ok(()),
    }
}

/// Check a whole event stream: balanced, non-empty, valid names and content.
pub(crate) fn validate_events(events: &[SubtreeEvent], operation: &'static str) -> MutationResult<()> {
    if events.is_empty() {
        return Err(MutationError::malformed_subtree("no events"));
    }
    let mut depth = 0usize;
    for event in events {
        match event {
            SubtreeEvent::StartElement {
                name,
                namespaces,
                attributes,
            } => {
                name.validate_for(Kind::Element)?;
                let mut prefixes = HashSet::new();
                for ns in namespaces {
                    ns.validate_for(Kind::Namespace)?;
                    if !prefixes.insert(ns.prefix()) {
                        return Err(MutationError::malformed_subtree(format!(
                            "namespace prefix '{}' declared twice on {}",
                            ns.prefix(),
                            name
                        )));
                    }
                }
                let mut seen: HashSet<&QName> = HashSet::new();
                for (attr, _) in attributes {
                    attr.validate_for(Kind::Attribute)?;
                    if !seen.insert(attr) {
                        return Err(MutationError::malformed_subtree(format!(
                            "attribute {} declared twice on {}",
                            attr, name
                        )));
                    }
                }
                depth += 1;
            }
            SubtreeEvent::EndElement => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| MutationError::malformed_subtree("unbalanced end element"))?;
            }
            SubtreeEvent::Text(value) => validate_content(Kind::Text, value, operation)?,
            SubtreeEvent::Comment(value) => validate_content(Kind::Comment, value, operation)?,
            SubtreeEvent::ProcessingInstruction { target, content } => {
                target.validate_for(Kind::ProcessingInstruction)?;
                validate_content(Kind::ProcessingInstruction, content, operation)?;
            }
        }
    }
    if depth != 0 {
        return Err(MutationError::malformed_subtree("unclosed element"));
    }
    Ok(())
}
