//! Order labels follow document order through moves and inserts.

use arbor_tests::prelude::*;
use proptest::prelude::*;

fn labels_in_order(trx: &WriteTrx) -> Vec<Vec<u32>> {
    trx.read(|engine| {
        live_keys(engine)
            .into_iter()
            .filter_map(|key| engine.record(key)?.label.clone())
            .map(|label| label.divisions().to_vec())
            .collect()
    })
    .unwrap()
}

fn assert_strictly_increasing(labels: &[Vec<u32>]) {
    for pair in labels.windows(2) {
        assert!(pair[0] < pair[1], "{:?} is not before {:?}", pair[0], pair[1]);
    }
}

/// `<root>` with `count` empty `<item>` children.
fn flat_tree(count: usize) -> (ResourceSession, WriteTrx, NodeKey, Vec<NodeKey>) {
    let (session, mut trx) = open(HashKind::Rolling);
    let root = trx
        .insert_element(NodeKey::DOCUMENT, InsertPosition::AsFirstChild, QName::new("root"))
        .unwrap();
    let mut items = Vec::new();
    let mut last = None;
    for _ in 0..count {
        let key = match last {
            None => trx.insert_element(root, InsertPosition::AsFirstChild, QName::new("item")),
            Some(left) => trx.insert_element(left, InsertPosition::AsRightSibling, QName::new("item")),
        }
        .unwrap();
        items.push(key);
        last = Some(key);
    }
    (session, trx, root, items)
}

#[test]
fn test_repeated_prepend_keeps_order() {
    // GIVEN
    let (_session, mut trx, root, _) = flat_tree(1);

    // WHEN a new first child is inserted many times
    for _ in 0..60 {
        trx.insert_element(root, InsertPosition::AsFirstChild, QName::new("front"))
            .unwrap();
    }

    // THEN
    assert_strictly_increasing(&labels_in_order(&trx));
    trx.read(|engine| assert_invariants(engine, &config(HashKind::Rolling)))
        .unwrap();
}

#[test]
fn test_moving_last_to_front_relabels_subtree() {
    // GIVEN items that each carry an attribute and a child
    let (_session, mut trx, root, items) = flat_tree(8);
    for &item in &items {
        trx.insert_attribute(item, QName::new("n"), "v").unwrap();
        trx.insert_element(item, InsertPosition::AsFirstChild, QName::new("leaf"))
            .unwrap();
    }

    // WHEN the current last item is moved to the front, over and over
    for round in 0..items.len() * 3 {
        let last = items[items.len() - 1 - round % items.len()];
        trx.move_subtree(last, root, InsertPosition::AsFirstChild).unwrap();
    }

    // THEN
    assert_strictly_increasing(&labels_in_order(&trx));
    trx.read(|engine| assert_invariants(engine, &config(HashKind::Rolling)))
        .unwrap();
}

#[test]
fn test_moved_subtree_nests_under_new_parent() {
    // GIVEN
    let (_session, mut trx, _root, items) = flat_tree(3);
    let leaf = trx
        .insert_element(items[0], InsertPosition::AsFirstChild, QName::new("leaf"))
        .unwrap();

    // WHEN
    trx.move_subtree(items[0], items[2], InsertPosition::AsFirstChild)
        .unwrap();

    // THEN
    let (parent, moved, child) = trx
        .read(|engine| {
            let label = |key| engine.record(key).unwrap().label.clone().unwrap();
            (label(items[2]), label(items[0]), label(leaf))
        })
        .unwrap();
    assert!(parent.is_ancestor_of(&moved));
    assert!(moved.is_ancestor_of(&child));
    assert!(parent < moved);
}

#[test]
fn test_labels_are_absent_when_disabled() {
    // GIVEN
    let mut resource = config(HashKind::Rolling);
    resource.order_labels = false;
    let (_session, mut trx) = open_with(resource, WriteTrxConfig::default());

    // WHEN
    trx.insert_element(NodeKey::DOCUMENT, InsertPosition::AsFirstChild, QName::new("root"))
        .unwrap();

    // THEN
    assert!(labels_in_order(&trx).is_empty());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_random_moves_keep_label_order(
        moves in prop::collection::vec((0usize..12, 0usize..13, 0u8..3), 1..30)
    ) {
        let (_session, mut trx, root, items) = flat_tree(12);
        let mut nodes = items.clone();
        nodes.push(root);
        for (target, anchor, position) in moves {
            let position = match position {
                0 => InsertPosition::AsFirstChild,
                1 => InsertPosition::AsLeftSibling,
                _ => InsertPosition::AsRightSibling,
            };
            match trx.move_subtree(items[target], nodes[anchor], position) {
                Ok(_) => {}
                Err(e) => prop_assert!(e.is_usage(), "unexpected error {}", e),
            }
        }
        let found = trx
            .read(|engine| violations(engine, &config(HashKind::Rolling)))
            .unwrap();
        prop_assert!(found.is_empty(), "{}", found.join("\n"));
    }
}
