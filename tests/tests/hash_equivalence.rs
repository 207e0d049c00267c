//! Rolling and postorder maintenance agree on every stored hash.

use arbor_tests::prelude::*;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn hashes(trx: &WriteTrx) -> Vec<(NodeKey, u64)> {
    trx.read(|engine| {
        live_keys(engine)
            .into_iter()
            .filter_map(|key| engine.record(key).map(|n| (key, n.hash)))
            .collect()
    })
    .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_rolling_equals_postorder(ops in prop::collection::vec(tree_op(), 1..40)) {
        let (_rolling_session, mut rolling) = open(HashKind::Rolling);
        let (_postorder_session, mut postorder) = open(HashKind::Postorder);
        for op in &ops {
            apply(&mut rolling, op).map_err(|e| TestCaseError::fail(e.to_string()))?;
            apply(&mut postorder, op).map_err(|e| TestCaseError::fail(e.to_string()))?;
        }
        prop_assert_eq!(hashes(&rolling), hashes(&postorder));
    }

    #[test]
    fn prop_hash_mode_does_not_change_shape(ops in prop::collection::vec(tree_op(), 1..30)) {
        let (_hashed_session, mut hashed) = open(HashKind::Rolling);
        let (_plain_session, mut plain) = open(HashKind::None);
        for op in &ops {
            apply(&mut hashed, op).map_err(|e| TestCaseError::fail(e.to_string()))?;
            apply(&mut plain, op).map_err(|e| TestCaseError::fail(e.to_string()))?;
        }
        prop_assert_eq!(hashed.read(shape).unwrap(), plain.read(shape).unwrap());
    }
}

#[test]
fn test_identical_subtrees_hash_identically() {
    // GIVEN two copies of the same element
    let (_session, mut trx) = open(HashKind::Rolling);
    let root = trx
        .insert_element(NodeKey::DOCUMENT, InsertPosition::AsFirstChild, QName::new("root"))
        .unwrap();
    let a = trx
        .insert_element(root, InsertPosition::AsFirstChild, QName::new("item"))
        .unwrap();
    trx.insert_attribute(a, QName::new("n"), "1").unwrap();
    trx.insert_text(a, InsertPosition::AsFirstChild, "body").unwrap();

    // WHEN
    let b = trx
        .copy_subtree_within(a, a, InsertPosition::AsRightSibling)
        .unwrap();

    // THEN
    let (hash_a, hash_b) = trx
        .read(|e| (e.record(a).unwrap().hash, e.record(b).unwrap().hash))
        .unwrap();
    assert_eq!(hash_a, hash_b);

    // WHEN one copy changes
    let attribute = trx.read(|e| e.record(b).unwrap().attributes()[0]).unwrap();
    trx.set_value(attribute, "2").unwrap();

    // THEN
    let hash_b = trx.read(|e| e.record(b).unwrap().hash).unwrap();
    assert_ne!(hash_a, hash_b);
}

#[test]
fn test_unhashed_resource_stores_zero() {
    let (_session, mut trx) = open(HashKind::None);
    trx.insert_element(NodeKey::DOCUMENT, InsertPosition::AsFirstChild, QName::new("root"))
        .unwrap();

    let hashes = hashes(&trx);

    assert!(hashes.iter().all(|&(_, hash)| hash == 0));
}
