//! Owned subtree event streams.
//!
//! Copy and bulk insert work from a flat stream of start/end/leaf events, so
//! the source can be any revision (including the one being written) and the
//! stream can be validated completely before anything is inserted.

use arbor_core::{children, resolve_name, Kind, NodeKey, NodeReader, QName};

use crate::error::{MutationError, MutationResult};

/// One step of a subtree in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubtreeEvent {
    StartElement {
        name: QName,
        namespaces: Vec<QName>,
        attributes: Vec<(QName, String)>,
    },
    EndElement,
    Text(String),
    Comment(String),
    ProcessingInstruction {
        target: QName,
        content: String,
    },
}

impl SubtreeEvent {
    /// Start an element with no namespaces or attributes.
    pub fn start(local: &str) -> Self {
        Self::StartElement {
            name: QName::new(local),
            namespaces: Vec::new(),
            attributes: Vec::new(),
        }
    }

    pub fn text(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Capture the subtree at `root` as an owned event stream. A document root
/// contributes its children only.
pub fn subtree_events<R: NodeReader + ?Sized>(
    reader: &R,
    root: NodeKey,
) -> MutationResult<Vec<SubtreeEvent>> {
    const OP: &str = "capture subtree";
    let mut events = Vec::new();
    let mut stack = vec![(root, false)];
    while let Some((key, closing)) = stack.pop() {
        if closing {
            events.push(SubtreeEvent::EndElement);
            continue;
        }
        let node = reader
            .record(key)
            .ok_or_else(|| MutationError::node_not_found(key, OP))?;
        let text = || -> MutationResult<String> {
            match node.value() {
                Some(value) => Ok(value.text()?),
                None => Ok(String::new()),
            }
        };
        let name = || node.name().map(|n| resolve_name(reader, n)).unwrap_or_default();
        match node.kind() {
            Kind::Document => {}
            Kind::Element => {
                let mut namespaces = Vec::new();
                for &ns in node.namespaces() {
                    if let Some(ns) = reader.record(ns).and_then(|n| n.name()) {
                        namespaces.push(resolve_name(reader, ns));
                    }
                }
                let mut attributes = Vec::new();
                for &attr in node.attributes() {
                    let attr = reader
                        .record(attr)
                        .ok_or_else(|| MutationError::node_not_found(attr, OP))?;
                    let attr_name = attr.name().map(|n| resolve_name(reader, n)).unwrap_or_default();
                    let attr_value = match attr.value() {
                        Some(v) => v.text()?,
                        None => String::new(),
                    };
                    attributes.push((attr_name, attr_value));
                }
                events.push(SubtreeEvent::StartElement {
                    name: name(),
                    namespaces,
                    attributes,
                });
                stack.push((key, true));
            }
            Kind::Text => events.push(SubtreeEvent::Text(text()?)),
            Kind::Comment => events.push(SubtreeEvent::Comment(text()?)),
            Kind::ProcessingInstruction => events.push(SubtreeEvent::ProcessingInstruction {
                target: name(),
                content: text()?,
            }),
            kind @ (Kind::Attribute | Kind::Namespace) => {
                return Err(MutationError::not_structural(key, kind, OP));
            }
        }
        let kids: Vec<NodeKey> = children(reader, key).map(|c| c.key).collect();
        stack.extend(kids.into_iter().rev().map(|k| (k, false)));
    }
    Ok(events)
}
