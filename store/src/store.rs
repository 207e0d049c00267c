//! Revision history of one resource.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::SystemTime;

use arbor_core::{Node, Revision};
use parking_lot::RwLock;
use tracing::debug;

use crate::dictionary::NameDictionary;
use crate::error::{StoreError, StoreResult};
use crate::page;
use crate::snapshot::RevisionSnapshot;
use crate::trx::MemoryPageTrx;

#[derive(Debug)]
struct History {
    revisions: Vec<Arc<RevisionSnapshot>>,
    latest: Arc<RevisionSnapshot>,
}

/// All committed revisions of a resource plus its single-writer claim.
///
/// Readers take `Arc` snapshots and are never blocked by the writer beyond the
/// moment a commit is published.
#[derive(Debug)]
pub struct RevisionStore {
    history: RwLock<History>,
    writer: AtomicBool,
}

impl RevisionStore {
    /// Create a resource whose revision 0 holds only `document`.
    pub fn create(document: Node) -> Arc<Self> {
        let mut pages = Vec::new();
        let key = document.key;
        *page::slot_mut(&mut pages, key) = Some(document);
        let bootstrap = Arc::new(RevisionSnapshot {
            revision: Revision::new(0),
            pages,
            names: Arc::new(NameDictionary::new()),
            max_node_key: key.raw(),
            message: None,
            timestamp: SystemTime::now(),
        });
        Arc::new(Self {
            history: RwLock::new(History {
                revisions: vec![bootstrap.clone()],
                latest: bootstrap,
            }),
            writer: AtomicBool::new(false),
        })
    }

    pub fn latest(&self) -> Arc<RevisionSnapshot> {
        self.history.read().latest.clone()
    }

    pub fn latest_revision(&self) -> Revision {
        self.history.read().latest.revision()
    }

    pub fn snapshot(&self, revision: Revision) -> StoreResult<Arc<RevisionSnapshot>> {
        self.history
            .read()
            .revisions
            .get(revision.raw() as usize)
            .cloned()
            .ok_or(StoreError::RevisionNotFound(revision))
    }

    /// Open the resource's only write transaction on the latest revision.
    pub fn begin_write(self: &Arc<Self>) -> StoreResult<MemoryPageTrx> {
        if self
            .writer
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(StoreError::WriterActive);
        }
        let base = self.latest();
        debug!(revision = %base.revision(), "write transaction opened");
        Ok(MemoryPageTrx::new(self.clone(), base))
    }

    pub fn has_writer(&self) -> bool {
        self.writer.load(Ordering::Acquire)
    }

    pub(crate) fn release_writer(&self) {
        self.writer.store(false, Ordering::Release);
    }

    /// Publish a new revision built from the writer's pages.
    pub(crate) fn publish(&self, mut snapshot: RevisionSnapshot) -> Arc<RevisionSnapshot> {
        let mut history = self.history.write();
        snapshot.revision = history.latest.revision().next();
        let snapshot = Arc::new(snapshot);
        history.revisions.push(snapshot.clone());
        history.latest = snapshot.clone();
        debug!(revision = %snapshot.revision(), "revision published");
        snapshot
    }
}
