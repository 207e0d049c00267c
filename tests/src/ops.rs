//! Random operation sequences for property tests.
//!
//! Operations pick their targets by index into the live node list at the
//! time they run, so any generated sequence applies to any tree.

use arbor_core::{subtree_keys, NodeKey, QName};
use arbor_mutation::{InsertPosition, MutationEngine, SubtreeEvent};
use arbor_transaction::{TransactionError, WriteTrx};
use proptest::prelude::*;

const NAMES: [&str; 4] = ["a", "b", "item", "x:y"];
const TEXTS: [&str; 4] = ["t", "hello", "42", " "];

/// One mutation with index-based targets.
#[derive(Debug, Clone)]
pub enum TreeOp {
    InsertElement { anchor: usize, position: u8, name: usize },
    InsertText { anchor: usize, position: u8, text: usize },
    InsertComment { anchor: usize, position: u8 },
    InsertAttribute { owner: usize, name: usize, text: usize },
    InsertSubtree { anchor: usize, position: u8 },
    Remove { target: usize },
    Move { target: usize, anchor: usize, position: u8 },
    Copy { source: usize, anchor: usize, position: u8 },
    Replace { target: usize, source: usize },
    SetValue { target: usize, text: usize },
    SetName { target: usize, name: usize },
    Commit,
    Rollback,
}

/// Strategy for a single operation, weighted towards inserts.
pub fn tree_op() -> impl Strategy<Value = TreeOp> {
    let pick = 0usize..64;
    let position = 0u8..3;
    prop_oneof![
        4 => (pick.clone(), position.clone(), 0..NAMES.len())
            .prop_map(|(anchor, position, name)| TreeOp::InsertElement { anchor, position, name }),
        3 => (pick.clone(), position.clone(), 0..TEXTS.len())
            .prop_map(|(anchor, position, text)| TreeOp::InsertText { anchor, position, text }),
        1 => (pick.clone(), position.clone())
            .prop_map(|(anchor, position)| TreeOp::InsertComment { anchor, position }),
        2 => (pick.clone(), 0..NAMES.len(), 0..TEXTS.len())
            .prop_map(|(owner, name, text)| TreeOp::InsertAttribute { owner, name, text }),
        1 => (pick.clone(), position.clone())
            .prop_map(|(anchor, position)| TreeOp::InsertSubtree { anchor, position }),
        2 => pick.clone().prop_map(|target| TreeOp::Remove { target }),
        3 => (pick.clone(), pick.clone(), position.clone())
            .prop_map(|(target, anchor, position)| TreeOp::Move { target, anchor, position }),
        1 => (pick.clone(), pick.clone(), position.clone())
            .prop_map(|(source, anchor, position)| TreeOp::Copy { source, anchor, position }),
        1 => (pick.clone(), pick.clone()).prop_map(|(target, source)| TreeOp::Replace { target, source }),
        2 => (pick.clone(), 0..TEXTS.len()).prop_map(|(target, text)| TreeOp::SetValue { target, text }),
        1 => (pick.clone(), 0..NAMES.len()).prop_map(|(target, name)| TreeOp::SetName { target, name }),
        1 => Just(TreeOp::Commit),
        1 => Just(TreeOp::Rollback),
    ]
}

/// Every live node key in document order.
pub fn live_keys(engine: &MutationEngine) -> Vec<NodeKey> {
    subtree_keys(engine, NodeKey::DOCUMENT)
}

fn position(raw: u8) -> InsertPosition {
    match raw % 3 {
        0 => InsertPosition::AsFirstChild,
        1 => InsertPosition::AsLeftSibling,
        _ => InsertPosition::AsRightSibling,
    }
}

fn name(index: usize) -> QName {
    QName::parse(NAMES[index % NAMES.len()]).unwrap_or_else(|_| QName::new("a"))
}

fn sample_events() -> Vec<SubtreeEvent> {
    vec![
        SubtreeEvent::start("s"),
        SubtreeEvent::text("in"),
        SubtreeEvent::start("t"),
        SubtreeEvent::EndElement,
        SubtreeEvent::EndElement,
    ]
}

/// Apply `op`. Usage errors are expected for many random picks and are
/// swallowed; any other error is returned.
pub fn apply(trx: &mut WriteTrx, op: &TreeOp) -> Result<(), TransactionError> {
    let keys = trx.read(live_keys)?;
    let at = |index: usize| keys[index % keys.len()];
    let text = |index: usize| TEXTS[index % TEXTS.len()];
    let result = match *op {
        TreeOp::InsertElement { anchor, position: p, name: n } => {
            trx.insert_element(at(anchor), position(p), name(n)).map(drop)
        }
        TreeOp::InsertText { anchor, position: p, text: t } => {
            trx.insert_text(at(anchor), position(p), text(t)).map(drop)
        }
        TreeOp::InsertComment { anchor, position: p } => {
            trx.insert_comment(at(anchor), position(p), "note").map(drop)
        }
        TreeOp::InsertAttribute { owner, name: n, text: t } => {
            trx.insert_attribute(at(owner), name(n), text(t)).map(drop)
        }
        TreeOp::InsertSubtree { anchor, position: p } => {
            trx.insert_subtree(at(anchor), position(p), &sample_events()).map(drop)
        }
        TreeOp::Remove { target } => trx.remove(at(target)).map(drop),
        TreeOp::Move { target, anchor, position: p } => {
            trx.move_subtree(at(target), at(anchor), position(p)).map(drop)
        }
        TreeOp::Copy { source, anchor, position: p } => {
            trx.copy_subtree_within(at(source), at(anchor), position(p)).map(drop)
        }
        TreeOp::Replace { target, source } => trx.replace_node_within(at(target), at(source)).map(drop),
        TreeOp::SetValue { target, text: t } => trx.set_value(at(target), text(t)),
        TreeOp::SetName { target, name: n } => trx.set_name(at(target), name(n)),
        TreeOp::Commit => trx.commit(None).map(drop),
        TreeOp::Rollback => trx.rollback().map(drop),
    };
    match result {
        Err(e) if e.is_usage() => Ok(()),
        other => other,
    }
}

