//! The write transaction and its commit coordination.

use std::sync::Arc;
use std::time::SystemTime;

use arbor_core::{NodeKey, NodeReader, QName, Revision};
use arbor_index::IndexListener;
use arbor_mutation::{InsertPosition, MutationEngine, MutationResult, SubtreeEvent};
use arbor_store::RevisionStore;
use parking_lot::Mutex;
use tracing::debug;

use crate::config::WriteTrxConfig;
use crate::error::{TransactionError, TransactionResult};
use crate::worker::AutoCommitWorker;

/// Runs inside the commit, before the page layer commits. An error aborts the commit.
pub type PreCommitHook = Box<dyn FnMut(&mut MutationEngine) -> MutationResult<()> + Send>;

/// Runs after a commit, outside the transaction lock.
pub type PostCommitHook = Arc<dyn Fn(&CommitInfo) + Send + Sync>;

/// A finished commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub revision: Revision,
    pub message: Option<String>,
    pub timestamp: SystemTime,
}

/// State shared with the auto-commit worker.
pub(crate) struct TrxCore {
    engine: MutationEngine,
    store: Arc<RevisionStore>,
    modifications: u64,
    max_node_count: u64,
    pre_hooks: Vec<PreCommitHook>,
    post_hooks: Vec<PostCommitHook>,
    closed: bool,
}

impl TrxCore {
    fn ensure_open(&self) -> TransactionResult<()> {
        if self.closed {
            return Err(TransactionError::Closed);
        }
        Ok(())
    }

    pub(crate) fn has_pending(&self) -> bool {
        !self.closed && self.modifications > 0
    }

    /// Commit and return the post hooks to run once the lock is released.
    pub(crate) fn commit(
        &mut self,
        message: Option<&str>,
    ) -> TransactionResult<(CommitInfo, Vec<PostCommitHook>)> {
        self.ensure_open()?;
        for hook in self.pre_hooks.iter_mut() {
            hook(&mut self.engine)?;
        }
        let revision = self.engine.commit(message)?;
        let pending = std::mem::take(&mut self.modifications);
        let timestamp = self.store.snapshot(revision)?.timestamp();
        debug!(%revision, modifications = pending, "commit");
        let info = CommitInfo {
            revision,
            message: message.map(str::to_string),
            timestamp,
        };
        Ok((info, self.post_hooks.clone()))
    }

    /// Count one successful modification, committing past the threshold.
    fn record_modification(&mut self) -> TransactionResult<Option<(CommitInfo, Vec<PostCommitHook>)>> {
        self.modifications += 1;
        if self.max_node_count > 0 && self.modifications > self.max_node_count {
            debug!(threshold = self.max_node_count, "modification threshold passed");
            return self.commit(None).map(Some);
        }
        Ok(None)
    }
}

/// Unlocked when calls are single-threaded, locked while a worker runs.
enum TrxMode {
    Unsynchronized(Box<TrxCore>),
    Synchronized(Arc<Mutex<TrxCore>>),
}

/// The single write transaction of a resource.
pub struct WriteTrx {
    mode: TrxMode,
    worker: Option<AutoCommitWorker>,
}

pub(crate) fn run_post_hooks(info: &CommitInfo, hooks: &[PostCommitHook]) {
    for hook in hooks {
        hook(info);
    }
}

impl WriteTrx {
    pub(crate) fn new(
        engine: MutationEngine,
        store: Arc<RevisionStore>,
        config: &WriteTrxConfig,
    ) -> TransactionResult<Self> {
        let core = TrxCore {
            engine,
            store,
            modifications: 0,
            max_node_count: config.max_node_count,
            pre_hooks: Vec::new(),
            post_hooks: Vec::new(),
            closed: false,
        };
        match config.max_time {
            None => Ok(Self {
                mode: TrxMode::Unsynchronized(Box::new(core)),
                worker: None,
            }),
            Some(interval) => {
                let shared = Arc::new(Mutex::new(core));
                let worker = AutoCommitWorker::spawn(Arc::clone(&shared), interval)?;
                Ok(Self {
                    mode: TrxMode::Synchronized(shared),
                    worker: Some(worker),
                })
            }
        }
    }

    fn with_core<T>(&mut self, f: impl FnOnce(&mut TrxCore) -> TransactionResult<T>) -> TransactionResult<T> {
        match &mut self.mode {
            TrxMode::Unsynchronized(core) => f(core.as_mut()),
            TrxMode::Synchronized(shared) => f(&mut shared.lock()),
        }
    }

    fn with_core_ref<T>(&self, f: impl FnOnce(&TrxCore) -> T) -> T {
        match &self.mode {
            TrxMode::Unsynchronized(core) => f(core.as_ref()),
            TrxMode::Synchronized(shared) => f(&shared.lock()),
        }
    }

    /// Run one mutating engine call under the coordinator's rules.
    fn mutate<T>(
        &mut self,
        op: impl FnOnce(&mut MutationEngine) -> MutationResult<T>,
    ) -> TransactionResult<T> {
        let (value, committed) = self.with_core(|core| {
            core.ensure_open()?;
            let value = op(&mut core.engine)?;
            let committed = core.record_modification()?;
            Ok((value, committed))
        })?;
        if let Some((info, hooks)) = committed {
            run_post_hooks(&info, &hooks);
        }
        Ok(value)
    }

    // ==================== Mutations ====================

    pub fn insert_element(
        &mut self,
        anchor: NodeKey,
        position: InsertPosition,
        name: QName,
    ) -> TransactionResult<NodeKey> {
        self.mutate(|engine| engine.insert_element(anchor, position, name))
    }

    pub fn insert_text(&mut self, anchor: NodeKey, position: InsertPosition, text: &str) -> TransactionResult<NodeKey> {
        self.mutate(|engine| engine.insert_text(anchor, position, text))
    }

    pub fn insert_comment(
        &mut self,
        anchor: NodeKey,
        position: InsertPosition,
        comment: &str,
    ) -> TransactionResult<NodeKey> {
        self.mutate(|engine| engine.insert_comment(anchor, position, comment))
    }

    pub fn insert_processing_instruction(
        &mut self,
        anchor: NodeKey,
        position: InsertPosition,
        target: &str,
        content: &str,
    ) -> TransactionResult<NodeKey> {
        self.mutate(|engine| engine.insert_processing_instruction(anchor, position, target, content))
    }

    pub fn insert_attribute(&mut self, owner: NodeKey, name: QName, value: &str) -> TransactionResult<NodeKey> {
        self.mutate(|engine| engine.insert_attribute(owner, name, value))
    }

    pub fn insert_namespace(&mut self, owner: NodeKey, name: QName) -> TransactionResult<NodeKey> {
        self.mutate(|engine| engine.insert_namespace(owner, name))
    }

    /// Bulk insert an event stream, then commit.
    pub fn insert_subtree(
        &mut self,
        anchor: NodeKey,
        position: InsertPosition,
        events: &[SubtreeEvent],
    ) -> TransactionResult<NodeKey> {
        let key = self.mutate(|engine| engine.insert_subtree(anchor, position, events))?;
        self.commit(None)?;
        Ok(key)
    }

    pub fn copy_subtree<R: NodeReader + ?Sized>(
        &mut self,
        source: &R,
        source_key: NodeKey,
        anchor: NodeKey,
        position: InsertPosition,
    ) -> TransactionResult<NodeKey> {
        self.mutate(|engine| engine.copy_subtree(source, source_key, anchor, position))
    }

    pub fn copy_subtree_within(
        &mut self,
        source_key: NodeKey,
        anchor: NodeKey,
        position: InsertPosition,
    ) -> TransactionResult<NodeKey> {
        self.mutate(|engine| engine.copy_subtree_within(source_key, anchor, position))
    }

    pub fn move_subtree(
        &mut self,
        key: NodeKey,
        anchor: NodeKey,
        position: InsertPosition,
    ) -> TransactionResult<NodeKey> {
        self.mutate(|engine| engine.move_subtree(key, anchor, position))
    }

    pub fn remove(&mut self, key: NodeKey) -> TransactionResult<NodeKey> {
        self.mutate(|engine| engine.remove(key))
    }

    pub fn replace_node<R: NodeReader + ?Sized>(
        &mut self,
        target: NodeKey,
        source: &R,
        source_key: NodeKey,
    ) -> TransactionResult<NodeKey> {
        self.mutate(|engine| engine.replace_node(target, source, source_key))
    }

    pub fn replace_node_within(&mut self, target: NodeKey, source_key: NodeKey) -> TransactionResult<NodeKey> {
        self.mutate(|engine| engine.replace_node_within(target, source_key))
    }

    pub fn set_value(&mut self, key: NodeKey, value: &str) -> TransactionResult<()> {
        self.mutate(|engine| engine.set_value(key, value))
    }

    pub fn set_name(&mut self, key: NodeKey, name: QName) -> TransactionResult<()> {
        self.mutate(|engine| engine.set_name(key, name))
    }

    // ==================== Lifecycle ====================

    pub fn commit(&mut self, message: Option<&str>) -> TransactionResult<Revision> {
        let (info, hooks) = self.with_core(|core| core.commit(message))?;
        run_post_hooks(&info, &hooks);
        Ok(info.revision)
    }

    /// Discard pending work and reopen the last committed revision.
    pub fn rollback(&mut self) -> TransactionResult<Revision> {
        self.with_core(|core| {
            core.ensure_open()?;
            let revision = core.engine.rollback()?;
            core.modifications = 0;
            Ok(revision)
        })
    }

    /// Discard pending work and continue from a historical revision.
    pub fn revert_to(&mut self, revision: Revision) -> TransactionResult<Revision> {
        self.with_core(|core| {
            core.ensure_open()?;
            let base = core.engine.revert_to(revision)?;
            core.modifications = 0;
            Ok(base)
        })
    }

    /// Release the resource. Fails while modifications are pending.
    pub fn close(&mut self) -> TransactionResult<()> {
        let already_closed = self.with_core(|core| {
            if core.closed {
                return Ok(true);
            }
            if core.modifications > 0 {
                return Err(TransactionError::UncommittedChanges {
                    count: core.modifications,
                });
            }
            Ok(false)
        })?;
        if already_closed {
            return Ok(());
        }
        // Stopped outside the lock; the worker takes it on every tick.
        if let Some(worker) = self.worker.take() {
            worker.shutdown()?;
        }
        self.with_core(|core| {
            core.engine.close()?;
            core.closed = true;
            Ok(())
        })?;
        debug!("write transaction closed");
        Ok(())
    }

    // ==================== Access ====================

    /// Read through the engine under the transaction lock.
    pub fn read<T>(&self, f: impl FnOnce(&MutationEngine) -> T) -> TransactionResult<T> {
        self.with_core_ref(|core| {
            core.ensure_open()?;
            Ok(f(&core.engine))
        })
    }

    /// Modifications since the last commit, rollback or revert.
    pub fn modification_count(&self) -> u64 {
        self.with_core_ref(|core| core.modifications)
    }

    pub fn is_closed(&self) -> bool {
        self.with_core_ref(|core| core.closed)
    }

    pub fn cursor(&self) -> TransactionResult<NodeKey> {
        self.read(|engine| engine.cursor())
    }

    /// Whether a periodic auto-commit worker is running.
    pub fn is_synchronized(&self) -> bool {
        matches!(self.mode, TrxMode::Synchronized(_))
    }

    pub fn add_pre_commit_hook(
        &mut self,
        hook: impl FnMut(&mut MutationEngine) -> MutationResult<()> + Send + 'static,
    ) -> TransactionResult<()> {
        self.with_core(|core| {
            core.pre_hooks.push(Box::new(hook));
            Ok(())
        })
    }

    pub fn add_post_commit_hook(&mut self, hook: impl Fn(&CommitInfo) + Send + Sync + 'static) -> TransactionResult<()> {
        self.with_core(|core| {
            core.post_hooks.push(Arc::new(hook));
            Ok(())
        })
    }

    pub fn register_index_listener(&mut self, listener: Box<dyn IndexListener>) -> TransactionResult<()> {
        self.with_core(|core| {
            core.ensure_open()?;
            core.engine.register_index_listener(listener);
            Ok(())
        })
    }
}

impl std::fmt::Debug for WriteTrx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriteTrx")
            .field("synchronized", &self.is_synchronized())
            .field("worker", &self.worker.is_some())
            .finish()
    }
}
