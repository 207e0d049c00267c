//! REPLACE of a node by a copy of another.

use arbor_core::{resolve_name, Kind, NodeKey, NodeReader, QName};

use crate::engine::MutationEngine;
use crate::error::{MutationError, MutationResult};
use crate::event::SubtreeEvent;
use crate::ops::attribute::{insert_attribute, insert_namespace};
use crate::ops::copy::{capture, insert_events};
use crate::ops::link::{both_text, merge_texts};
use crate::ops::remove::remove;
use crate::ops::value::set_value;
use crate::InsertPosition;

pub(crate) const REPLACE: &str = "replace node";

/// Owned copy of the replacement, detached from its source revision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Replacement {
    Attribute { name: QName, value: String },
    Namespace { name: QName },
    Subtree(Vec<SubtreeEvent>),
}

impl Replacement {
    /// Read the replacement for a target of `target_kind` out of `source`.
    pub(crate) fn collect<R: NodeReader + ?Sized>(
        source: &R,
        source_key: NodeKey,
        target: NodeKey,
        target_kind: Kind,
    ) -> MutationResult<Self> {
        let node = source
            .record(source_key)
            .ok_or_else(|| MutationError::node_not_found(source_key, REPLACE))?;
        let found = node.kind();
        let mismatch = || MutationError::KindMismatch {
            key: target,
            kind: target_kind,
            found,
            operation: REPLACE,
        };
        match target_kind {
            Kind::Document => Err(MutationError::RemoveDocument),
            Kind::Attribute | Kind::Namespace if found != target_kind => Err(mismatch()),
            Kind::Attribute => {
                let name = node.name().map(|n| resolve_name(source, n)).unwrap_or_default();
                let value = match node.value() {
                    Some(value) => value.text()?,
                    None => String::new(),
                };
                Ok(Self::Attribute { name, value })
            }
            Kind::Namespace => {
                let name = node.name().map(|n| resolve_name(source, n)).unwrap_or_default();
                Ok(Self::Namespace { name })
            }
            _ if !found.is_structural() => Err(mismatch()),
            _ => Ok(Self::Subtree(capture(source, source_key)?)),
        }
    }
}

/// Put `replacement` where `target` is and remove `target`. Returns the key
/// now holding the replaced content.
pub(crate) fn replace(
    engine: &mut MutationEngine,
    target: NodeKey,
    replacement: Replacement,
) -> MutationResult<NodeKey> {
    let node = engine.node(target, REPLACE)?;
    let kind = node.kind();
    let owner = node.parent;
    match replacement {
        Replacement::Attribute { name, value } => {
            let owner = owner.ok_or_else(|| MutationError::node_not_found(target, REPLACE))?;
            let clash = engine
                .node(owner, REPLACE)?
                .attributes()
                .iter()
                .any(|&a| a != target && engine.name_of(a).as_ref() == Some(&name));
            if clash {
                return Err(MutationError::duplicate_attribute(owner, name.to_string()));
            }
            remove(engine, target)?;
            insert_attribute(engine, owner, &name, &value)
        }
        Replacement::Namespace { name } => {
            let owner = owner.ok_or_else(|| MutationError::node_not_found(target, REPLACE))?;
            let clash = engine.node(owner, REPLACE)?.namespaces().iter().any(|&n| {
                n != target && engine.name_of(n).is_some_and(|q| q.prefix() == name.prefix())
            });
            if clash {
                return Err(MutationError::duplicate_namespace(owner, name.prefix()));
            }
            remove(engine, target)?;
            insert_namespace(engine, owner, &name)
        }
        Replacement::Subtree(events) => {
            if let (Kind::Text, [SubtreeEvent::Text(text)]) = (kind, events.as_slice()) {
                set_value(engine, target, text)?;
                return Ok(target);
            }
            let key = insert_events(engine, target, InsertPosition::AsRightSibling, &events, false)?;
            let cursor = remove(engine, target)?;
            // The removal may have merged the new node into a text on its left.
            let survivor = match engine.page.record(key) {
                Some(_) => key,
                None => cursor,
            };
            let right = engine.page.record(survivor).and_then(|n| n.right_sibling());
            if let Some(right) = right {
                if both_text(engine, survivor, right) {
                    merge_texts(engine, survivor, right)?;
                }
            }
            engine.cursor = survivor;
            Ok(survivor)
        }
    }
}
