//! End-to-end mutation scenarios through a write transaction.

use arbor_tests::prelude::*;
use pretty_assertions::assert_eq;

fn root(trx: &mut WriteTrx) -> NodeKey {
    trx.insert_element(NodeKey::DOCUMENT, InsertPosition::AsFirstChild, QName::new("root"))
        .unwrap()
}

fn check(trx: &WriteTrx, hash_kind: HashKind) {
    trx.read(|engine| assert_invariants(engine, &config(hash_kind)))
        .unwrap();
}

// ==================== Text coalescing ====================

#[test]
fn test_adjacent_text_inserts_coalesce() {
    // GIVEN
    let (_session, mut trx) = open(HashKind::Rolling);
    let root = root(&mut trx);
    let a = trx.insert_text(root, InsertPosition::AsFirstChild, "a").unwrap();

    // WHEN
    let b = trx.insert_text(a, InsertPosition::AsRightSibling, "b").unwrap();

    // THEN
    assert_eq!(a, b);
    assert_eq!(trx.read(shape).unwrap(), "<root>ab</root>");
    assert_eq!(trx.read(|e| e.value_of(a).unwrap()).unwrap().as_deref(), Some("ab"));
    check(&trx, HashKind::Rolling);
}

#[test]
fn test_remove_between_texts_merges_them() {
    // GIVEN <root>a<x/>b</root>
    let (_session, mut trx) = open(HashKind::Postorder);
    let root = root(&mut trx);
    let a = trx.insert_text(root, InsertPosition::AsFirstChild, "a").unwrap();
    let x = trx
        .insert_element(a, InsertPosition::AsRightSibling, QName::new("x"))
        .unwrap();
    trx.insert_text(x, InsertPosition::AsRightSibling, "b").unwrap();
    let before = trx
        .read(|e| e.record(NodeKey::DOCUMENT).unwrap().descendant_count())
        .unwrap();

    // WHEN
    let cursor = trx.remove(x).unwrap();

    // THEN
    assert_eq!(cursor, a);
    assert_eq!(trx.read(shape).unwrap(), "<root>ab</root>");
    let after = trx
        .read(|e| e.record(NodeKey::DOCUMENT).unwrap().descendant_count())
        .unwrap();
    assert_eq!(before - after, 2);
    check(&trx, HashKind::Postorder);
}

#[test]
fn test_compressed_text_keeps_logical_value() {
    // GIVEN
    let mut resource = config(HashKind::Rolling);
    resource.text_compression = true;
    let (_session, mut trx) = open_with(resource, WriteTrxConfig::default());
    let root = root(&mut trx);
    let long = "lorem ipsum ".repeat(64);

    // WHEN
    let text = trx.insert_text(root, InsertPosition::AsFirstChild, &long).unwrap();
    trx.insert_text(text, InsertPosition::AsRightSibling, "end").unwrap();

    // THEN
    let (value, compressed) = trx
        .read(|e| {
            let stored = e.record(text).unwrap().value().unwrap().clone();
            (e.value_of(text).unwrap(), stored.is_compressed())
        })
        .unwrap();
    assert_eq!(value, Some(format!("{long}end")));
    assert!(compressed);
}

#[test]
fn test_compression_does_not_change_hashes() {
    // GIVEN the same document with and without compression
    let build = |compress: bool| {
        let mut resource = config(HashKind::Rolling);
        resource.text_compression = compress;
        let (_session, mut trx) = open_with(resource, WriteTrxConfig::default());
        let root = root(&mut trx);
        trx.insert_attribute(root, QName::new("lang"), "en").unwrap();
        trx.insert_text(root, InsertPosition::AsFirstChild, "some text").unwrap();
        trx.read(|e| e.record(NodeKey::DOCUMENT).unwrap().hash).unwrap()
    };

    // WHEN / THEN
    assert_eq!(build(true), build(false));
}

// ==================== Usage errors ====================

#[test]
fn test_duplicate_attribute_is_rejected() {
    // GIVEN
    let (_session, mut trx) = open(HashKind::Rolling);
    let root = root(&mut trx);
    trx.insert_attribute(root, QName::new("id"), "1").unwrap();

    // WHEN
    let result = trx.insert_attribute(root, QName::new("id"), "1");

    // THEN
    assert!(matches!(
        result,
        Err(TransactionError::Mutation(MutationError::DuplicateAttribute { .. }))
    ));
    assert_eq!(trx.modification_count(), 2);
}

#[test]
fn test_moving_ancestor_into_descendant_is_rejected() {
    // GIVEN <root><a><b/></a></root>
    let (_session, mut trx) = open(HashKind::Rolling);
    let root = root(&mut trx);
    let a = trx
        .insert_element(root, InsertPosition::AsFirstChild, QName::new("a"))
        .unwrap();
    let b = trx
        .insert_element(a, InsertPosition::AsFirstChild, QName::new("b"))
        .unwrap();

    // WHEN
    let result = trx.move_subtree(a, b, InsertPosition::AsFirstChild);

    // THEN
    assert!(matches!(
        result,
        Err(TransactionError::Mutation(MutationError::MoveIntoSubtree { .. }))
    ));
    assert_eq!(trx.read(shape).unwrap(), "<root><a><b/></a></root>");
}

#[test]
fn test_document_cannot_be_removed() {
    let (_session, mut trx) = open(HashKind::Rolling);

    let result = trx.remove(NodeKey::DOCUMENT);

    assert!(matches!(
        result,
        Err(TransactionError::Mutation(MutationError::RemoveDocument))
    ));
}

// ==================== Copy and replace ====================

#[test]
fn test_copy_from_older_revision_restores_subtree() {
    // GIVEN a committed subtree that is later removed
    let (session, mut trx) = open(HashKind::Rolling);
    let root = root(&mut trx);
    let item = trx
        .insert_element(root, InsertPosition::AsFirstChild, QName::new("item"))
        .unwrap();
    trx.insert_attribute(item, QName::new("id"), "7").unwrap();
    trx.insert_text(item, InsertPosition::AsFirstChild, "kept").unwrap();
    let first = trx.commit(Some("with item")).unwrap();
    let committed = trx.read(shape).unwrap();
    trx.remove(item).unwrap();
    trx.commit(Some("without item")).unwrap();

    // WHEN
    let old = session.begin_read(first).unwrap();
    trx.copy_subtree(&*old, item, root, InsertPosition::AsFirstChild)
        .unwrap();

    // THEN
    assert_eq!(trx.read(shape).unwrap(), committed);
    let old_hash = old.record(NodeKey::DOCUMENT).unwrap().hash;
    let new_hash = trx.read(|e| e.record(NodeKey::DOCUMENT).unwrap().hash).unwrap();
    assert_eq!(old_hash, new_hash);
    check(&trx, HashKind::Rolling);
}

#[test]
fn test_replace_element_with_copy_of_sibling() {
    // GIVEN <root><a>one</a><b/></root>
    let (_session, mut trx) = open(HashKind::Postorder);
    let root = root(&mut trx);
    let a = trx
        .insert_element(root, InsertPosition::AsFirstChild, QName::new("a"))
        .unwrap();
    trx.insert_text(a, InsertPosition::AsFirstChild, "one").unwrap();
    let b = trx
        .insert_element(a, InsertPosition::AsRightSibling, QName::new("b"))
        .unwrap();

    // WHEN
    trx.replace_node_within(b, a).unwrap();

    // THEN
    assert_eq!(trx.read(shape).unwrap(), "<root><a>one</a><a>one</a></root>");
    check(&trx, HashKind::Postorder);
}

#[test]
fn test_replace_with_text_between_texts_leaves_one_text() {
    // GIVEN <root>a<x/>b<src>m</src></root>
    let (_session, mut trx) = open(HashKind::Rolling);
    let root = root(&mut trx);
    let a = trx.insert_text(root, InsertPosition::AsFirstChild, "a").unwrap();
    let x = trx
        .insert_element(a, InsertPosition::AsRightSibling, QName::new("x"))
        .unwrap();
    let b = trx.insert_text(x, InsertPosition::AsRightSibling, "b").unwrap();
    let src = trx
        .insert_element(b, InsertPosition::AsRightSibling, QName::new("src"))
        .unwrap();
    let m = trx.insert_text(src, InsertPosition::AsFirstChild, "m").unwrap();

    // WHEN
    let key = trx.replace_node_within(x, m).unwrap();

    // THEN
    assert_eq!(key, a);
    let kinds = trx
        .read(|e| {
            arbor_core::children(e, root)
                .map(|c| (c.kind(), e.value_of(c.key).unwrap()))
                .collect::<Vec<_>>()
        })
        .unwrap();
    assert_eq!(
        kinds,
        vec![(Kind::Text, Some("amb".to_string())), (Kind::Element, None)]
    );
    check(&trx, HashKind::Rolling);
}

// ==================== Index notifications ====================

#[test]
fn test_set_value_twice_notifies_once() {
    // GIVEN
    let (_session, mut trx) = open(HashKind::Rolling);
    let root = root(&mut trx);
    let text = trx.insert_text(root, InsertPosition::AsFirstChild, "old").unwrap();
    let listener = RecordingListener::new();
    trx.register_index_listener(Box::new(listener.clone())).unwrap();

    // WHEN
    trx.set_value(text, "new").unwrap();
    let first = listener.take();
    trx.set_value(text, "new").unwrap();

    // THEN
    assert_eq!(
        first.iter().map(|r| (r.change, r.key)).collect::<Vec<_>>(),
        vec![(ChangeType::Delete, text), (ChangeType::Insert, text)]
    );
    assert!(listener.events().is_empty());
}

#[test]
fn test_move_reports_every_subtree_node() {
    // GIVEN <root><a><b/>t</a><c/></root>
    let (_session, mut trx) = open(HashKind::Rolling);
    let root = root(&mut trx);
    let a = trx
        .insert_element(root, InsertPosition::AsFirstChild, QName::new("a"))
        .unwrap();
    let b = trx
        .insert_element(a, InsertPosition::AsFirstChild, QName::new("b"))
        .unwrap();
    trx.insert_text(b, InsertPosition::AsRightSibling, "t").unwrap();
    let c = trx
        .insert_element(a, InsertPosition::AsRightSibling, QName::new("c"))
        .unwrap();
    let listener = RecordingListener::new();
    trx.register_index_listener(Box::new(listener.clone())).unwrap();

    // WHEN
    trx.move_subtree(a, c, InsertPosition::AsFirstChild).unwrap();

    // THEN
    assert_eq!(listener.count(ChangeType::Delete), 3);
    assert_eq!(listener.count(ChangeType::Insert), 3);
    assert_eq!(trx.read(shape).unwrap(), "<root><c><a><b/>t</a></c></root>");
    check(&trx, HashKind::Rolling);
}

#[test]
fn test_removal_reports_attributes_and_children() {
    // GIVEN
    let (_session, mut trx) = open(HashKind::Rolling);
    let root = root(&mut trx);
    let item = trx
        .insert_element(root, InsertPosition::AsFirstChild, QName::new("item"))
        .unwrap();
    trx.insert_attribute(item, QName::new("id"), "1").unwrap();
    trx.insert_namespace(item, QName::namespace("p", "urn:p"))
        .unwrap();
    trx.insert_text(item, InsertPosition::AsFirstChild, "x").unwrap();
    let listener = RecordingListener::new();
    trx.register_index_listener(Box::new(listener.clone())).unwrap();

    // WHEN
    trx.remove(item).unwrap();

    // THEN
    let kinds: Vec<Kind> = listener.events().iter().map(|r| r.kind).collect();
    assert_eq!(kinds.len(), 4);
    assert!(listener.events().iter().all(|r| r.change == ChangeType::Delete));
    assert!(kinds.contains(&Kind::Attribute));
    assert!(kinds.contains(&Kind::Namespace));
}

#[test]
fn test_rename_keeps_hashes_consistent() {
    // GIVEN
    let (_session, mut trx) = open(HashKind::Rolling);
    let root = root(&mut trx);
    let child = trx
        .insert_element(root, InsertPosition::AsFirstChild, QName::new("old"))
        .unwrap();
    let before = trx.read(|e| e.record(NodeKey::DOCUMENT).unwrap().hash).unwrap();

    // WHEN
    trx.set_name(child, QName::new("new")).unwrap();

    // THEN
    assert_eq!(trx.read(|e| e.name_of(child)).unwrap(), Some(QName::new("new")));
    assert_ne!(trx.read(|e| e.record(NodeKey::DOCUMENT).unwrap().hash).unwrap(), before);
    check(&trx, HashKind::Rolling);
}
