//! SET VALUE and SET NAME.

use arbor_core::{resolve_name, subtree_keys, Kind, NodeKey, QName};
use arbor_index::ChangeType;

use crate::engine::MutationEngine;
use crate::error::{MutationError, MutationResult};
use crate::ops::remove::remove;
use crate::validation::validate_content;

/// Store a new value on `key` with index notifications and hash update.
pub(crate) fn write_value(engine: &mut MutationEngine, key: NodeKey, text: &str) -> MutationResult<()> {
    let old_own = engine.hashes.own_hash(&*engine.page, key)?;
    engine.notify(ChangeType::Delete, key)?;
    let value = engine.factory.encode(text)?;
    if let Some(slot) = engine.modify(key)?.value_mut() {
        *slot = value;
    }
    engine.hashes.on_update(&mut *engine.page, key, old_own)?;
    engine.notify(ChangeType::Insert, key)
}

/// Set the value of a value node. An empty value removes the node.
pub(crate) fn set_value(engine: &mut MutationEngine, key: NodeKey, value: &str) -> MutationResult<()> {
    const OP: &str = "set value";
    let kind = engine.node(key, OP)?.kind();
    if !kind.has_value() {
        return Err(MutationError::not_value_node(key, kind, OP));
    }
    if value.is_empty() {
        remove(engine, key)?;
        return Ok(());
    }
    validate_content(kind, value, OP)?;
    engine.cursor = key;
    if engine.text(key)? == value {
        return Ok(());
    }
    write_value(engine, key, value)
}

/// Rename a named node, re-deriving path keys below it.
pub(crate) fn set_name(engine: &mut MutationEngine, key: NodeKey, name: &QName) -> MutationResult<()> {
    const OP: &str = "set name";
    let node = engine.node(key, OP)?;
    let kind = node.kind();
    let Some(current) = node.name().cloned() else {
        return Err(MutationError::not_name_node(key, kind, OP));
    };
    name.validate_for(kind)?;
    engine.cursor = key;
    if &resolve_name(&*engine.page, &current) == name {
        return Ok(());
    }
    check_sibling_names(engine, key, kind, name)?;

    let old_own = engine.hashes.own_hash(&*engine.page, key)?;
    let affected = if kind == Kind::Element {
        subtree_keys(&*engine.page, key)
    } else {
        vec![key]
    };
    for &k in &affected {
        engine.notify(ChangeType::Delete, k)?;
    }

    engine.release_name(&current, false)?;
    let mut fresh = engine.intern(name, kind)?;
    fresh.path_node = current.path_node;
    if let Some(slot) = engine.modify(key)?.name_mut() {
        *slot = fresh;
    }
    rederive_paths(engine, key)?;
    engine.hashes.on_update(&mut *engine.page, key, old_own)?;

    for &k in &affected {
        engine.notify(ChangeType::Insert, k)?;
    }
    Ok(())
}

/// Attributes and namespaces must stay unique on their owner.
fn check_sibling_names(
    engine: &MutationEngine,
    key: NodeKey,
    kind: Kind,
    name: &QName,
) -> MutationResult<()> {
    let Some(owner) = engine.node(key, "set name")?.parent else {
        return Ok(());
    };
    let owner_node = engine.node(owner, "set name")?;
    match kind {
        Kind::Attribute => {
            let taken = owner_node
                .attributes()
                .iter()
                .any(|&a| a != key && engine.name_of(a).as_ref() == Some(name));
            if taken {
                return Err(MutationError::duplicate_attribute(owner, name.to_string()));
            }
        }
        Kind::Namespace => {
            let taken = owner_node.namespaces().iter().any(|&n| {
                n != key && engine.name_of(n).is_some_and(|q| q.prefix() == name.prefix())
            });
            if taken {
                return Err(MutationError::duplicate_namespace(owner, name.prefix()));
            }
        }
        _ => {}
    }
    Ok(())
}

/// Recompute path keys for `root` and everything below it after a rename or move.
pub(crate) fn rederive_paths(engine: &mut MutationEngine, root: NodeKey) -> MutationResult<()> {
    if engine.paths.is_none() {
        return Ok(());
    }
    for key in subtree_keys(&*engine.page, root) {
        let node = engine.node(key, "derive path")?;
        let Some(name_ref) = node.name().cloned() else {
            continue;
        };
        let kind = node.kind();
        let parent_path = node.parent.and_then(|p| engine.element_path(p));
        let name = resolve_name(&*engine.page, &name_ref);
        let Some(paths) = engine.paths.as_mut() else {
            return Ok(());
        };
        let fresh = paths.adapt_path_for_changed_node(name_ref.path_node, parent_path, &name, kind);
        if name_ref.path_node != Some(fresh) {
            if let Some(slot) = engine.modify(key)?.name_mut() {
                slot.path_node = Some(fresh);
            }
        }
    }
    Ok(())
}
