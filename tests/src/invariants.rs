//! Structural invariant checker.
//!
//! Walks the whole tree from the document and compares every stored field
//! with what the tree itself implies: sibling links, counts, owner links,
//! label order and hashes from a full bottom-up recomputation.

use arbor_core::{children, subtree_keys, HashKind, Kind, NodeKey, NodeReader, OrderLabel, ResourceConfig};
use arbor_hash::postorder_hash;

/// Every invariant violation found in the tree, empty when consistent.
pub fn violations<R: NodeReader + ?Sized>(reader: &R, config: &ResourceConfig) -> Vec<String> {
    let mut found = Vec::new();
    let Some(document) = reader.record(NodeKey::DOCUMENT) else {
        return vec!["document node is missing".to_string()];
    };
    if document.parent.is_some() {
        found.push("document has a parent".to_string());
    }
    descendants(reader, NodeKey::DOCUMENT, &mut found);

    let order = subtree_keys(reader, NodeKey::DOCUMENT);
    for &key in &order {
        let Some(node) = reader.record(key) else {
            found.push(format!("{key} is referenced but missing"));
            continue;
        };
        check_links(reader, key, &mut found);
        if config.hash_kind != HashKind::None {
            match postorder_hash(reader, key) {
                Ok(expected) if expected != node.hash => {
                    found.push(format!("{key} hash {} != recomputed {expected}", node.hash));
                }
                Ok(_) => {}
                Err(e) => found.push(format!("{key} hash recompute failed: {e}")),
            }
        }
    }
    if config.order_labels {
        check_labels(reader, &order, &mut found);
    }
    found
}

/// Panic with every violation listed.
#[track_caller]
pub fn assert_invariants<R: NodeReader + ?Sized>(reader: &R, config: &ResourceConfig) {
    let found = violations(reader, config);
    assert!(found.is_empty(), "invariant violations:\n  {}", found.join("\n  "));
}

/// Check descendant counts bottom-up; returns the subtree size below `key`.
fn descendants<R: NodeReader + ?Sized>(reader: &R, key: NodeKey, found: &mut Vec<String>) -> u64 {
    let mut total = 0;
    for child in children(reader, key) {
        total += 1 + descendants(reader, child.key, found);
    }
    if let Some(node) = reader.record(key) {
        if node.descendant_count() != total {
            found.push(format!(
                "{key} descendant_count {} != {total}",
                node.descendant_count()
            ));
        }
    }
    total
}

fn check_links<R: NodeReader + ?Sized>(reader: &R, key: NodeKey, found: &mut Vec<String>) {
    let Some(node) = reader.record(key) else {
        return;
    };
    let mut previous: Option<NodeKey> = None;
    let mut count = 0;
    for child in children(reader, key) {
        count += 1;
        if child.parent != Some(key) {
            found.push(format!("{} parent {:?} != {key}", child.key, child.parent));
        }
        if child.left_sibling() != previous {
            found.push(format!(
                "{} left sibling {:?} != {:?}",
                child.key,
                child.left_sibling(),
                previous
            ));
        }
        if !child.is_structural() {
            found.push(format!("{} ({}) is in a sibling chain", child.key, child.kind()));
        }
        previous = Some(child.key);
    }
    if node.child_count() != count {
        found.push(format!("{key} child_count {} != {count}", node.child_count()));
    }
    let owned = [(Kind::Namespace, node.namespaces()), (Kind::Attribute, node.attributes())];
    for (kind, keys) in owned {
        for &owned_key in keys {
            match reader.record(owned_key) {
                Some(owned) if owned.kind() == kind && owned.parent == Some(key) => {}
                Some(owned) => found.push(format!(
                    "{owned_key} ({}) owned by {key} has parent {:?}",
                    owned.kind(),
                    owned.parent
                )),
                None => found.push(format!("{owned_key} owned by {key} is missing")),
            }
        }
    }
}

/// Labels strictly increase in document order and nest under their parent's.
fn check_labels<R: NodeReader + ?Sized>(reader: &R, order: &[NodeKey], found: &mut Vec<String>) {
    let mut previous: Option<(NodeKey, &OrderLabel)> = None;
    for &key in order {
        let Some(node) = reader.record(key) else {
            continue;
        };
        let Some(label) = node.label.as_ref() else {
            found.push(format!("{key} has no order label"));
            continue;
        };
        if let Some((prev_key, prev_label)) = previous {
            if prev_label >= label {
                found.push(format!("{prev_key} label {prev_label} not before {key} label {label}"));
            }
        }
        if let Some(parent_label) = node.parent.and_then(|p| reader.record(p)).and_then(|p| p.label.as_ref()) {
            if !parent_label.is_ancestor_of(label) {
                found.push(format!("{key} label {label} not below parent label {parent_label}"));
            }
        }
        previous = Some((key, label));
    }
}
