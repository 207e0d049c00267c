//! Hash maintenance driven by structural events.

use std::collections::HashSet;

use arbor_core::{subtree_keys, HashKind, NodeKey};
use arbor_store::{PageWriteTrx, StoreError, StoreResult};
use tracing::{debug, trace};

use crate::content::{combine, own_hash, owned_keys, HASH_MULTIPLIER};

/// Keeps stored hashes and descendant counts consistent after each edit.
///
/// Descendant counts are maintained in every mode, including `HashKind::None`.
#[derive(Debug, Clone)]
pub struct HashMaintainer {
    kind: HashKind,
    /// Nodes created since `begin_bulk`, hashed once in `finish_bulk`.
    bulk: Option<HashSet<NodeKey>>,
}

impl HashMaintainer {
    pub fn new(kind: HashKind) -> Self {
        Self { kind, bulk: None }
    }

    pub fn kind(&self) -> HashKind {
        self.kind
    }

    pub fn is_bulk(&self) -> bool {
        self.bulk.is_some()
    }

    /// Suppress per-node hashing until `finish_bulk`.
    pub fn begin_bulk(&mut self) {
        if self.bulk.is_none() {
            self.bulk = Some(HashSet::new());
        }
    }

    /// Drop any pending bulk state without hashing it.
    pub fn reset(&mut self) {
        self.bulk = None;
    }

    /// Own content hash of `key`, or 0 when hashing is disabled.
    pub fn own_hash<P: PageWriteTrx + ?Sized>(&self, page: &P, key: NodeKey) -> StoreResult<u64> {
        if self.kind == HashKind::None {
            return Ok(0);
        }
        let node = page.record(key).ok_or(StoreError::RecordNotFound(key))?;
        own_hash(page, node)
    }

    // ==================== Events ====================

    /// A freshly created node with nothing below it was linked in.
    pub fn on_insert<P: PageWriteTrx + ?Sized>(&mut self, page: &mut P, key: NodeKey) -> StoreResult<()> {
        let (parent, size) = parent_and_size(page, key)?;
        if let Some(bulk) = self.bulk.as_mut() {
            bulk.insert(key);
            return propagate(page, parent, None, size as i64);
        }
        match self.kind {
            HashKind::None => propagate(page, parent, None, size as i64),
            HashKind::Rolling => {
                let own = self.own_hash(page, key)?;
                page.prepare_entry_for_modification(key)?.hash = own;
                trace!(%key, hash = own, "rolling add");
                propagate(page, parent, Some(own), size as i64)
            }
            HashKind::Postorder => {
                let own = self.own_hash(page, key)?;
                page.prepare_entry_for_modification(key)?.hash = own;
                propagate(page, parent, None, size as i64)?;
                recompute_chain(page, parent)
            }
        }
    }

    /// An existing subtree with valid hashes was linked in (move).
    pub fn on_attach<P: PageWriteTrx + ?Sized>(&mut self, page: &mut P, key: NodeKey) -> StoreResult<()> {
        let (parent, size) = parent_and_size(page, key)?;
        match self.kind {
            HashKind::None => propagate(page, parent, None, size as i64),
            HashKind::Rolling => {
                let hash = page.record(key).map(|n| n.hash).unwrap_or(0);
                propagate(page, parent, Some(hash), size as i64)
            }
            HashKind::Postorder => {
                propagate(page, parent, None, size as i64)?;
                recompute_chain(page, parent)
            }
        }
    }

    /// A subtree with hash `hash` and `size` structural nodes was unlinked from `parent`.
    pub fn on_detach<P: PageWriteTrx + ?Sized>(
        &mut self,
        page: &mut P,
        parent: NodeKey,
        hash: u64,
        size: u64,
    ) -> StoreResult<()> {
        let parent = Some(parent);
        match self.kind {
            HashKind::None => propagate(page, parent, None, -(size as i64)),
            HashKind::Rolling => propagate(page, parent, Some(hash.wrapping_neg()), -(size as i64)),
            HashKind::Postorder => {
                propagate(page, parent, None, -(size as i64))?;
                recompute_chain(page, parent)
            }
        }
    }

    /// The name or value of `key` changed; `old_own` is its own hash before the change.
    pub fn on_update<P: PageWriteTrx + ?Sized>(
        &mut self,
        page: &mut P,
        key: NodeKey,
        old_own: u64,
    ) -> StoreResult<()> {
        if self.bulk.as_ref().is_some_and(|b| b.contains(&key)) {
            return Ok(());
        }
        match self.kind {
            HashKind::None => Ok(()),
            HashKind::Rolling => {
                let delta = self.own_hash(page, key)?.wrapping_sub(old_own);
                let node = page.prepare_entry_for_modification(key)?;
                node.hash = node.hash.wrapping_add(delta);
                let parent = node.parent;
                propagate(page, parent, Some(delta), 0)
            }
            HashKind::Postorder => {
                recompute_node(page, key)?;
                let parent = page.record(key).and_then(|n| n.parent);
                recompute_chain(page, parent)
            }
        }
    }

    /// Hash everything created since `begin_bulk`: one postorder pass per
    /// inserted root, then one ancestor propagation.
    pub fn finish_bulk<P: PageWriteTrx + ?Sized>(&mut self, page: &mut P) -> StoreResult<()> {
        let Some(created) = self.bulk.take() else {
            return Ok(());
        };
        let mut roots: Vec<NodeKey> = created
            .iter()
            .copied()
            .filter(|k| {
                page.record(*k)
                    .and_then(|n| n.parent)
                    .is_some_and(|p| !created.contains(&p))
            })
            .collect();
        roots.sort();
        debug!(nodes = created.len(), roots = roots.len(), "settling bulk insert hashes");
        if self.kind == HashKind::None {
            return Ok(());
        }
        for root in roots {
            let hash = recompute_subtree(page, root)?;
            let parent = page.record(root).and_then(|n| n.parent);
            match self.kind {
                HashKind::Rolling => propagate(page, parent, Some(hash), 0)?,
                _ => recompute_chain(page, parent)?,
            }
        }
        Ok(())
    }
}

fn parent_and_size<P: PageWriteTrx + ?Sized>(page: &P, key: NodeKey) -> StoreResult<(Option<NodeKey>, u64)> {
    let node = page.record(key).ok_or(StoreError::RecordNotFound(key))?;
    Ok((node.parent, node.subtree_size()))
}

/// Walk from `start` to the root, adding `size` to descendant counts and the
/// child's hash delta scaled by the multiplier once per level.
fn propagate<P: PageWriteTrx + ?Sized>(
    page: &mut P,
    start: Option<NodeKey>,
    hash_delta: Option<u64>,
    size: i64,
) -> StoreResult<()> {
    if hash_delta.is_none() && size == 0 {
        return Ok(());
    }
    let mut contribution = hash_delta;
    let mut current = start;
    while let Some(key) = current {
        let node = page.prepare_entry_for_modification(key)?;
        if let Some(delta) = contribution.as_mut() {
            *delta = delta.wrapping_mul(HASH_MULTIPLIER);
            node.hash = node.hash.wrapping_add(*delta);
        }
        if let Some(links) = node.links_mut() {
            links.descendant_count = links.descendant_count.saturating_add_signed(size);
        }
        current = node.parent;
    }
    Ok(())
}

/// Recompute one node from its own content and the stored hashes below it.
fn recompute_node<P: PageWriteTrx + ?Sized>(page: &mut P, key: NodeKey) -> StoreResult<u64> {
    let node = page.record(key).ok_or(StoreError::RecordNotFound(key))?;
    let own = own_hash(page, node)?;
    let owned: Vec<u64> = owned_keys(page, node)
        .into_iter()
        .map(|k| page.record(k).map(|n| n.hash).unwrap_or(0))
        .collect();
    let hash = combine(own, owned);
    page.prepare_entry_for_modification(key)?.hash = hash;
    Ok(hash)
}

/// Recompute `start` and each of its ancestors.
fn recompute_chain<P: PageWriteTrx + ?Sized>(page: &mut P, start: Option<NodeKey>) -> StoreResult<()> {
    let mut current = start;
    while let Some(key) = current {
        recompute_node(page, key)?;
        current = page.record(key).and_then(|n| n.parent);
    }
    Ok(())
}

/// Recompute every hash in the subtree at `root`, bottom-up.
fn recompute_subtree<P: PageWriteTrx + ?Sized>(page: &mut P, root: NodeKey) -> StoreResult<u64> {
    let mut hash = 0;
    for key in subtree_keys(page, root).into_iter().rev() {
        hash = recompute_node(page, key)?;
    }
    Ok(hash)
}
