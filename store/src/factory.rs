//! Node factory.
//!
//! One creation method per node kind. Callers compute the placement, name
//! keys and label beforehand; the factory issues the key, encodes the value
//! and stores the record. Linking into the tree is left to the caller.

use arbor_core::{NameRef, Node, NodeKey, NodeKind, OrderLabel, StructLinks, Value};

use crate::error::StoreResult;
use crate::trx::PageWriteTrx;

/// Where a new structural node sits relative to its neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub parent: NodeKey,
    pub left: Option<NodeKey>,
    pub right: Option<NodeKey>,
}

impl Placement {
    pub fn first_child(parent: NodeKey, current_first: Option<NodeKey>) -> Self {
        Self {
            parent,
            left: None,
            right: current_first,
        }
    }
}

/// The record of a resource's document root.
pub fn document_node(hash: u64, label: Option<OrderLabel>) -> Node {
    Node {
        key: NodeKey::DOCUMENT,
        parent: None,
        hash,
        label,
        kind: NodeKind::Document {
            links: StructLinks::default(),
        },
    }
}

/// Creates node records bound to the current page transaction.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeFactory {
    compress: bool,
}

impl NodeFactory {
    pub fn new(compress: bool) -> Self {
        Self { compress }
    }

    /// Encode a value the way this resource stores it.
    pub fn encode(&self, text: &str) -> StoreResult<Value> {
        Ok(Value::encode(text, self.compress)?)
    }

    pub fn create_element<P: PageWriteTrx + ?Sized>(
        &self,
        page: &mut P,
        at: Placement,
        name: NameRef,
        label: Option<OrderLabel>,
    ) -> StoreResult<NodeKey> {
        let kind = NodeKind::Element {
            links: StructLinks::between(at.left, at.right),
            name,
            attributes: Vec::new(),
            namespaces: Vec::new(),
        };
        store(page, at.parent, label, kind)
    }

    pub fn create_text<P: PageWriteTrx + ?Sized>(
        &self,
        page: &mut P,
        at: Placement,
        text: &str,
        label: Option<OrderLabel>,
    ) -> StoreResult<NodeKey> {
        let kind = NodeKind::Text {
            links: StructLinks::between(at.left, at.right),
            value: self.encode(text)?,
        };
        store(page, at.parent, label, kind)
    }

    pub fn create_comment<P: PageWriteTrx + ?Sized>(
        &self,
        page: &mut P,
        at: Placement,
        text: &str,
        label: Option<OrderLabel>,
    ) -> StoreResult<NodeKey> {
        let kind = NodeKind::Comment {
            links: StructLinks::between(at.left, at.right),
            value: self.encode(text)?,
        };
        store(page, at.parent, label, kind)
    }

    pub fn create_processing_instruction<P: PageWriteTrx + ?Sized>(
        &self,
        page: &mut P,
        at: Placement,
        target: NameRef,
        content: &str,
        label: Option<OrderLabel>,
    ) -> StoreResult<NodeKey> {
        let kind = NodeKind::ProcessingInstruction {
            links: StructLinks::between(at.left, at.right),
            name: target,
            value: self.encode(content)?,
        };
        store(page, at.parent, label, kind)
    }

    pub fn create_attribute<P: PageWriteTrx + ?Sized>(
        &self,
        page: &mut P,
        owner: NodeKey,
        name: NameRef,
        value: &str,
        label: Option<OrderLabel>,
    ) -> StoreResult<NodeKey> {
        let kind = NodeKind::Attribute {
            name,
            value: self.encode(value)?,
        };
        store(page, owner, label, kind)
    }

    pub fn create_namespace<P: PageWriteTrx + ?Sized>(
        &self,
        page: &mut P,
        owner: NodeKey,
        name: NameRef,
        label: Option<OrderLabel>,
    ) -> StoreResult<NodeKey> {
        store(page, owner, label, NodeKind::Namespace { name })
    }
}

fn store<P: PageWriteTrx + ?Sized>(
    page: &mut P,
    parent: NodeKey,
    label: Option<OrderLabel>,
    kind: NodeKind,
) -> StoreResult<NodeKey> {
    let key = page.next_node_key()?;
    page.create_entry(Node {
        key,
        parent: Some(parent),
        hash: 0,
        label,
        kind,
    })?;
    Ok(key)
}
