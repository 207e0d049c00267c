//! INSERT of structural nodes (element, text, comment, processing instruction).

use arbor_core::{Kind, NodeKey, QName};
use arbor_index::ChangeType;
use arbor_label::Region;
use arbor_store::Placement;
use tracing::trace;

use crate::engine::MutationEngine;
use crate::error::MutationResult;
use crate::ops::link::link;
use crate::ops::value::write_value;
use crate::validation::{placement, validate_content};
use crate::InsertPosition;

/// Content of a structural node about to be created.
#[derive(Debug, Clone, Copy)]
pub(crate) enum NewNode<'a> {
    Element(&'a QName),
    Text(&'a str),
    Comment(&'a str),
    ProcessingInstruction { target: &'a QName, content: &'a str },
}

impl NewNode<'_> {
    fn kind(&self) -> Kind {
        match self {
            Self::Element(_) => Kind::Element,
            Self::Text(_) => Kind::Text,
            Self::Comment(_) => Kind::Comment,
            Self::ProcessingInstruction { .. } => Kind::ProcessingInstruction,
        }
    }

    fn operation(&self) -> &'static str {
        match self {
            Self::Element(_) => "insert element",
            Self::Text(_) => "insert text",
            Self::Comment(_) => "insert comment",
            Self::ProcessingInstruction { .. } => "insert processing instruction",
        }
    }

    fn validate(&self) -> MutationResult<()> {
        let operation = self.operation();
        match *self {
            Self::Element(name) => Ok(name.validate_for(Kind::Element)?),
            Self::Text(text) => validate_content(Kind::Text, text, operation),
            Self::Comment(text) => validate_content(Kind::Comment, text, operation),
            Self::ProcessingInstruction { target, content } => {
                target.validate_for(Kind::ProcessingInstruction)?;
                validate_content(Kind::ProcessingInstruction, content, operation)
            }
        }
    }
}

/// Insert a structural node at `position` relative to `anchor`.
///
/// With `coalesce`, text landing next to an existing text node is merged
/// into it and no node is created.
pub(crate) fn insert_structural(
    engine: &mut MutationEngine,
    anchor: NodeKey,
    position: InsertPosition,
    new: NewNode<'_>,
    coalesce: bool,
) -> MutationResult<NodeKey> {
    new.validate()?;
    let at = placement(engine, anchor, position, new.operation())?;
    if let (NewNode::Text(text), true) = (new, coalesce) {
        if let Some(key) = coalesce_text(engine, at, position, text)? {
            engine.cursor = key;
            return Ok(key);
        }
    }
    create_at(engine, at, new)
}

/// Merge `text` into a neighbouring text node. The anchor side is tried first.
fn coalesce_text(
    engine: &mut MutationEngine,
    at: Placement,
    position: InsertPosition,
    text: &str,
) -> MutationResult<Option<NodeKey>> {
    // (candidate, candidate lies left of the new text)
    let candidates = match position {
        InsertPosition::AsFirstChild => vec![(at.right, false)],
        InsertPosition::AsRightSibling => vec![(at.left, true), (at.right, false)],
        InsertPosition::AsLeftSibling => vec![(at.right, false), (at.left, true)],
    };
    for (candidate, on_left) in candidates {
        let Some(candidate) = candidate else {
            continue;
        };
        if engine.node(candidate, "insert text")?.kind() != Kind::Text {
            continue;
        }
        let existing = engine.text(candidate)?;
        let merged = if on_left {
            existing + text
        } else {
            format!("{text}{existing}")
        };
        write_value(engine, candidate, &merged)?;
        trace!(key = %candidate, "coalesced text");
        return Ok(Some(candidate));
    }
    Ok(None)
}

fn create_at(engine: &mut MutationEngine, at: Placement, new: NewNode<'_>) -> MutationResult<NodeKey> {
    let label = engine.new_label(at.parent, Region::Children, at.left, at.right)?;
    let parent_path = engine.element_path(at.parent);
    let factory = engine.factory;
    let key = match new {
        NewNode::Element(name) => {
            let name = engine.named(name, Kind::Element, parent_path)?;
            factory.create_element(&mut *engine.page, at, name, label)?
        }
        NewNode::Text(text) => factory.create_text(&mut *engine.page, at, text, label)?,
        NewNode::Comment(text) => factory.create_comment(&mut *engine.page, at, text, label)?,
        NewNode::ProcessingInstruction { target, content } => {
            let target = engine.named(target, Kind::ProcessingInstruction, parent_path)?;
            factory.create_processing_instruction(&mut *engine.page, at, target, content, label)?
        }
    };
    link(engine, key, at)?;
    engine.hashes.on_insert(&mut *engine.page, key)?;
    engine.notify(ChangeType::Insert, key)?;
    engine.cursor = key;
    trace!(%key, kind = %new.kind(), parent = %at.parent, "inserted");
    Ok(key)
}
