//! INSERT of attributes and namespace declarations.

use arbor_core::{Kind, NodeKey, QName};
use arbor_index::ChangeType;
use arbor_label::Region;
use tracing::trace;

use crate::engine::MutationEngine;
use crate::error::{MutationError, MutationResult};
use crate::ops::value::write_value;

/// Owner must be an element.
fn check_owner(engine: &MutationEngine, owner: NodeKey, operation: &'static str) -> MutationResult<()> {
    let kind = engine.node(owner, operation)?.kind();
    if kind != Kind::Element {
        return Err(MutationError::not_element(owner, kind, operation));
    }
    Ok(())
}

pub(crate) fn insert_attribute(
    engine: &mut MutationEngine,
    owner: NodeKey,
    name: &QName,
    value: &str,
) -> MutationResult<NodeKey> {
    const OP: &str = "insert attribute";
    check_owner(engine, owner, OP)?;
    name.validate_for(Kind::Attribute)?;

    let existing = engine.node(owner, OP)?.attributes().to_vec();
    for &attr in &existing {
        if engine.name_of(attr).as_ref() != Some(name) {
            continue;
        }
        if engine.text(attr)? == value {
            return Err(MutationError::duplicate_attribute(owner, name.to_string()));
        }
        write_value(engine, attr, value)?;
        engine.cursor = attr;
        return Ok(attr);
    }

    let label = engine.new_label(owner, Region::Attributes, existing.last().copied(), None)?;
    let parent_path = engine.element_path(owner);
    let name_ref = engine.named(name, Kind::Attribute, parent_path)?;
    let factory = engine.factory;
    let key = factory.create_attribute(&mut *engine.page, owner, name_ref, value, label)?;
    if let Some(list) = engine.modify(owner)?.attributes_mut() {
        list.push(key);
    }
    finish_owned(engine, key)
}

pub(crate) fn insert_namespace(
    engine: &mut MutationEngine,
    owner: NodeKey,
    name: &QName,
) -> MutationResult<NodeKey> {
    const OP: &str = "insert namespace";
    check_owner(engine, owner, OP)?;
    name.validate_for(Kind::Namespace)?;

    let existing = engine.node(owner, OP)?.namespaces().to_vec();
    let taken = existing
        .iter()
        .any(|&ns| engine.name_of(ns).is_some_and(|q| q.prefix() == name.prefix()));
    if taken {
        return Err(MutationError::duplicate_namespace(owner, name.prefix()));
    }

    let label = engine.new_label(owner, Region::Namespaces, existing.last().copied(), None)?;
    let parent_path = engine.element_path(owner);
    let name_ref = engine.named(name, Kind::Namespace, parent_path)?;
    let factory = engine.factory;
    let key = factory.create_namespace(&mut *engine.page, owner, name_ref, label)?;
    if let Some(list) = engine.modify(owner)?.namespaces_mut() {
        list.push(key);
    }
    finish_owned(engine, key)
}

fn finish_owned(engine: &mut MutationEngine, key: NodeKey) -> MutationResult<NodeKey> {
    engine.hashes.on_insert(&mut *engine.page, key)?;
    engine.notify(ChangeType::Insert, key)?;
    engine.cursor = key;
    trace!(%key, "inserted owned node");
    Ok(key)
}
