//! Recording index listener.

use std::sync::Arc;

use arbor_core::{Kind, Node, NodeKey, PathNodeKey};
use arbor_index::{ChangeType, IndexListener};
use parking_lot::Mutex;

/// One notification as seen by an index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub change: ChangeType,
    pub key: NodeKey,
    pub kind: Kind,
    pub path: Option<PathNodeKey>,
}

/// Keeps every notification. Clones share the same log, so a test can keep
/// one clone and register the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingListener {
    log: Arc<Mutex<Vec<Recorded>>>,
}

impl RecordingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Recorded> {
        self.log.lock().clone()
    }

    /// Drain the log.
    pub fn take(&self) -> Vec<Recorded> {
        std::mem::take(&mut *self.log.lock())
    }

    pub fn count(&self, change: ChangeType) -> usize {
        self.log.lock().iter().filter(|r| r.change == change).count()
    }
}

impl IndexListener for RecordingListener {
    fn notify_change(&mut self, change: ChangeType, node: &Node, path: Option<PathNodeKey>) {
        self.log.lock().push(Recorded {
            change,
            key: node.key,
            kind: node.kind(),
            path,
        });
    }
}
