//! Random operation sequences keep every structural invariant.

use arbor_tests::prelude::*;
use proptest::prelude::*;

fn run(hash_kind: HashKind, ops: &[TreeOp]) -> Result<(), TestCaseError> {
    let (_session, mut trx) = open(hash_kind);
    let config = config(hash_kind);
    for op in ops {
        apply(&mut trx, op).map_err(|e| TestCaseError::fail(format!("{op:?} failed: {e}")))?;
        let found = trx
            .read(|engine| violations(engine, &config))
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        prop_assert!(found.is_empty(), "after {:?}:\n{}", op, found.join("\n"));
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_rolling_mode_keeps_invariants(ops in prop::collection::vec(tree_op(), 1..40)) {
        run(HashKind::Rolling, &ops)?;
    }

    #[test]
    fn prop_postorder_mode_keeps_invariants(ops in prop::collection::vec(tree_op(), 1..40)) {
        run(HashKind::Postorder, &ops)?;
    }

    #[test]
    fn prop_unhashed_mode_keeps_counts_and_labels(ops in prop::collection::vec(tree_op(), 1..40)) {
        run(HashKind::None, &ops)?;
    }
}

#[test]
fn test_committed_revision_keeps_invariants() {
    // GIVEN
    let (session, mut trx) = open(HashKind::Rolling);
    let root = trx
        .insert_element(NodeKey::DOCUMENT, InsertPosition::AsFirstChild, QName::new("root"))
        .unwrap();
    trx.insert_attribute(root, QName::new("id"), "r").unwrap();
    let child = trx
        .insert_element(root, InsertPosition::AsFirstChild, QName::new("child"))
        .unwrap();
    trx.insert_text(child, InsertPosition::AsRightSibling, "tail").unwrap();

    // WHEN
    let revision = trx.commit(Some("snapshot")).unwrap();

    // THEN
    let snapshot = session.begin_read(revision).unwrap();
    assert_invariants(&*snapshot, &config(HashKind::Rolling));
    assert_eq!(shape(&*snapshot), "<root id=\"r\"><child/>tail</root>");
}
