//! Immutable committed revisions.

use std::sync::Arc;
use std::time::SystemTime;

use arbor_core::{NameKey, Node, NodeKey, NodeReader, Revision};

use crate::dictionary::NameDictionary;
use crate::page::{self, RecordPage};

/// A committed revision. Never changes once published.
#[derive(Debug, Clone)]
pub struct RevisionSnapshot {
    pub(crate) revision: Revision,
    pub(crate) pages: Vec<Arc<RecordPage>>,
    pub(crate) names: Arc<NameDictionary>,
    pub(crate) max_node_key: u64,
    pub(crate) message: Option<String>,
    pub(crate) timestamp: SystemTime,
}

impl RevisionSnapshot {
    pub fn revision(&self) -> Revision {
        self.revision
    }

    /// Highest node key issued up to this revision.
    pub fn max_node_key(&self) -> u64 {
        self.max_node_key
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }

    /// All live records, in key order.
    pub fn records(&self) -> impl Iterator<Item = &Node> {
        page::records(&self.pages)
    }

    pub fn names(&self) -> &NameDictionary {
        &self.names
    }
}

impl NodeReader for RevisionSnapshot {
    fn record(&self, key: NodeKey) -> Option<&Node> {
        page::get(&self.pages, key)
    }

    fn name(&self, key: NameKey) -> Option<&str> {
        self.names.get(key)
    }
}
