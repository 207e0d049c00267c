//! Fixed-size record pages.
//!
//! Revisions share pages through `Arc`; a writer clones a page the first time
//! it touches it.

use std::sync::Arc;

use arbor_core::{Node, NodeKey};

const PAGE_SHIFT: u32 = 7;
const PAGE_SIZE: usize = 1 << PAGE_SHIFT;

#[derive(Debug, Clone)]
pub(crate) struct RecordPage {
    slots: Vec<Option<Node>>,
}

impl RecordPage {
    fn empty() -> Self {
        Self {
            slots: vec![None; PAGE_SIZE],
        }
    }
}

fn locate(key: NodeKey) -> (usize, usize) {
    (
        (key.raw() >> PAGE_SHIFT) as usize,
        key.raw() as usize & (PAGE_SIZE - 1),
    )
}

pub(crate) fn get(pages: &[Arc<RecordPage>], key: NodeKey) -> Option<&Node> {
    let (page, slot) = locate(key);
    pages.get(page)?.slots[slot].as_ref()
}

/// Mutable access to a slot, cloning the page if another revision shares it.
pub(crate) fn slot_mut(pages: &mut Vec<Arc<RecordPage>>, key: NodeKey) -> &mut Option<Node> {
    let (page, slot) = locate(key);
    while pages.len() <= page {
        pages.push(Arc::new(RecordPage::empty()));
    }
    &mut Arc::make_mut(&mut pages[page]).slots[slot]
}

/// Whether the slot is occupied, without cloning anything.
pub(crate) fn contains(pages: &[Arc<RecordPage>], key: NodeKey) -> bool {
    get(pages, key).is_some()
}

pub(crate) fn records(pages: &[Arc<RecordPage>]) -> impl Iterator<Item = &Node> {
    pages.iter().flat_map(|p| p.slots.iter().flatten())
}
