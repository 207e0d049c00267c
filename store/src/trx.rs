//! Page write transactions.

use std::sync::Arc;
use std::time::SystemTime;

use arbor_core::{Kind, NameKey, Node, NodeKey, NodeReader, Revision};
use tracing::{debug, trace};

use crate::dictionary::NameDictionary;
use crate::error::{StoreError, StoreResult};
use crate::page::{self, RecordPage};
use crate::snapshot::RevisionSnapshot;
use crate::store::RevisionStore;

/// Write access to the records of the revision under construction.
///
/// The mutation engine never persists anything itself; every record change
/// goes through this trait.
pub trait PageWriteTrx: NodeReader + Send {
    /// The committed revision the pending work is layered on.
    fn base_revision(&self) -> Revision;

    /// Issue a fresh node key.
    fn next_node_key(&mut self) -> StoreResult<NodeKey>;

    /// Store a new record under its key.
    fn create_entry(&mut self, node: Node) -> StoreResult<()>;

    /// Writable handle to an existing record.
    fn prepare_entry_for_modification(&mut self, key: NodeKey) -> StoreResult<&mut Node>;

    /// Delete a record from the pending revision.
    fn remove_entry(&mut self, key: NodeKey) -> StoreResult<Node>;

    /// Take a dictionary reference on a name part.
    fn create_name_key(&mut self, name: &str, kind: Kind) -> StoreResult<NameKey>;

    /// Drop a dictionary reference taken by `create_name_key`.
    fn remove_name(&mut self, key: NameKey) -> StoreResult<()>;

    /// Publish the pending work as a new revision and continue on top of it.
    fn commit(&mut self, message: Option<&str>) -> StoreResult<Revision>;

    /// Discard the pending work.
    fn rollback(&mut self) -> StoreResult<Revision>;

    /// Discard the pending work and continue on top of `revision`.
    fn revert_to(&mut self, revision: Revision) -> StoreResult<Revision>;

    /// Release the resource's write claim.
    fn close(&mut self) -> StoreResult<()>;

    fn is_closed(&self) -> bool;
}

/// In-memory copy-on-write page transaction.
#[derive(Debug)]
pub struct MemoryPageTrx {
    store: Arc<RevisionStore>,
    base: Arc<RevisionSnapshot>,
    pages: Vec<Arc<RecordPage>>,
    names: Arc<NameDictionary>,
    max_node_key: u64,
    closed: bool,
}

impl MemoryPageTrx {
    pub(crate) fn new(store: Arc<RevisionStore>, base: Arc<RevisionSnapshot>) -> Self {
        Self {
            pages: base.pages.clone(),
            names: base.names.clone(),
            max_node_key: base.max_node_key,
            store,
            base,
            closed: false,
        }
    }

    pub fn store(&self) -> &Arc<RevisionStore> {
        &self.store
    }

    fn ensure_open(&self) -> StoreResult<()> {
        if self.closed {
            Err(StoreError::Closed)
        } else {
            Ok(())
        }
    }

    fn rebase(&mut self, base: Arc<RevisionSnapshot>) {
        self.pages = base.pages.clone();
        self.names = base.names.clone();
        // Keys are never reused, even after a rollback or revert.
        self.max_node_key = self.max_node_key.max(base.max_node_key);
        self.base = base;
    }
}

impl NodeReader for MemoryPageTrx {
    fn record(&self, key: NodeKey) -> Option<&Node> {
        page::get(&self.pages, key)
    }

    fn name(&self, key: NameKey) -> Option<&str> {
        self.names.get(key)
    }
}

impl PageWriteTrx for MemoryPageTrx {
    fn base_revision(&self) -> Revision {
        self.base.revision()
    }

    fn next_node_key(&mut self) -> StoreResult<NodeKey> {
        self.ensure_open()?;
        self.max_node_key = self
            .max_node_key
            .checked_add(1)
            .ok_or(StoreError::KeySpaceExhausted)?;
        Ok(NodeKey::new(self.max_node_key))
    }

    fn create_entry(&mut self, node: Node) -> StoreResult<()> {
        self.ensure_open()?;
        if page::contains(&self.pages, node.key) {
            return Err(StoreError::RecordExists(node.key));
        }
        let key = node.key;
        trace!(%key, kind = %node.kind(), "record created");
        *page::slot_mut(&mut self.pages, key) = Some(node);
        Ok(())
    }

    fn prepare_entry_for_modification(&mut self, key: NodeKey) -> StoreResult<&mut Node> {
        self.ensure_open()?;
        if !page::contains(&self.pages, key) {
            return Err(StoreError::RecordNotFound(key));
        }
        page::slot_mut(&mut self.pages, key)
            .as_mut()
            .ok_or(StoreError::RecordNotFound(key))
    }

    fn remove_entry(&mut self, key: NodeKey) -> StoreResult<Node> {
        self.ensure_open()?;
        if !page::contains(&self.pages, key) {
            return Err(StoreError::RecordNotFound(key));
        }
        page::slot_mut(&mut self.pages, key)
            .take()
            .ok_or(StoreError::RecordNotFound(key))
    }

    fn create_name_key(&mut self, name: &str, kind: Kind) -> StoreResult<NameKey> {
        self.ensure_open()?;
        Ok(Arc::make_mut(&mut self.names).intern(name, kind))
    }

    fn remove_name(&mut self, key: NameKey) -> StoreResult<()> {
        self.ensure_open()?;
        Arc::make_mut(&mut self.names).release(key)
    }

    fn commit(&mut self, message: Option<&str>) -> StoreResult<Revision> {
        self.ensure_open()?;
        let snapshot = RevisionSnapshot {
            // Assigned by the store on publish.
            revision: self.base.revision(),
            pages: self.pages.clone(),
            names: self.names.clone(),
            max_node_key: self.max_node_key,
            message: message.map(str::to_string),
            timestamp: SystemTime::now(),
        };
        let published = self.store.publish(snapshot);
        let revision = published.revision();
        self.base = published;
        Ok(revision)
    }

    fn rollback(&mut self) -> StoreResult<Revision> {
        self.ensure_open()?;
        let base = self.base.clone();
        self.rebase(base);
        debug!(revision = %self.base.revision(), "page transaction rolled back");
        Ok(self.base.revision())
    }

    fn revert_to(&mut self, revision: Revision) -> StoreResult<Revision> {
        self.ensure_open()?;
        let base = self.store.snapshot(revision)?;
        self.rebase(base);
        debug!(%revision, "page transaction reverted");
        Ok(revision)
    }

    fn close(&mut self) -> StoreResult<()> {
        if !self.closed {
            self.closed = true;
            self.store.release_writer();
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Drop for MemoryPageTrx {
    fn drop(&mut self) {
        if !self.closed {
            self.store.release_writer();
        }
    }
}
