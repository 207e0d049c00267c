//! Fixtures for the unit tests in this crate.

use arbor_core::{children, resolve_name, Kind, NodeKey, NodeReader, OrderLabel, ResourceConfig};
use arbor_hash::content_hash;
use arbor_store::{document_node, RevisionStore};

use crate::MutationEngine;

pub(crate) fn engine() -> MutationEngine {
    engine_with(ResourceConfig::default())
}

pub(crate) fn engine_with(config: ResourceConfig) -> MutationEngine {
    let label = config.order_labels.then(OrderLabel::root);
    let hash = match config.hash_kind {
        arbor_core::HashKind::None => 0,
        _ => content_hash(Kind::Document, None, None),
    };
    let store = RevisionStore::create(document_node(hash, label));
    let page = store.begin_write().unwrap();
    MutationEngine::new(Box::new(page), config)
}

/// Render the tree as compact markup.
pub(crate) fn shape<R: NodeReader + ?Sized>(reader: &R) -> String {
    let mut out = String::new();
    render(reader, NodeKey::DOCUMENT, &mut out);
    out
}

fn render<R: NodeReader + ?Sized>(reader: &R, key: NodeKey, out: &mut String) {
    let Some(node) = reader.record(key) else {
        return;
    };
    let text = || node.value().and_then(|v| v.text().ok()).unwrap_or_default();
    let name = || node.name().map(|n| resolve_name(reader, n).to_string()).unwrap_or_default();
    match node.kind() {
        Kind::Document => {
            for child in children(reader, key) {
                render(reader, child.key, out);
            }
        }
        Kind::Element => {
            out.push('<');
            out.push_str(&name());
            for &owned in node.namespaces().iter().chain(node.attributes()) {
                if let Some(owned) = reader.record(owned) {
                    let owned_name = owned.name().map(|n| resolve_name(reader, n));
                    let owned_name = owned_name.unwrap_or_default();
                    let value = match owned.kind() {
                        Kind::Namespace => owned_name.uri().to_string(),
                        _ => owned.value().and_then(|v| v.text().ok()).unwrap_or_default(),
                    };
                    out.push_str(&format!(" {}=\"{}\"", owned_name, value));
                }
            }
            if node.first_child().is_none() {
                out.push_str("/>");
                return;
            }
            out.push('>');
            for child in children(reader, key) {
                render(reader, child.key, out);
            }
            out.push_str(&format!("</{}>", name()));
        }
        Kind::Text => out.push_str(&text()),
        Kind::Comment => out.push_str(&format!("<!--{}-->", text())),
        Kind::ProcessingInstruction => out.push_str(&format!("<?{} {}?>", name(), text())),
        Kind::Attribute | Kind::Namespace => {}
    }
}
