//! Resource sessions.

use std::sync::Arc;

use arbor_core::{HashKind, Kind, OrderLabel, ResourceConfig, Revision};
use arbor_hash::content_hash;
use arbor_mutation::MutationEngine;
use arbor_store::{document_node, RevisionSnapshot, RevisionStore};
use tracing::debug;

use crate::config::WriteTrxConfig;
use crate::error::TransactionResult;
use crate::trx::WriteTrx;

/// One resource: its revision history and configuration.
#[derive(Debug, Clone)]
pub struct ResourceSession {
    store: Arc<RevisionStore>,
    config: ResourceConfig,
}

impl ResourceSession {
    /// Create a resource holding only the document node as revision 0.
    pub fn create(config: ResourceConfig) -> Self {
        let label = config.order_labels.then(OrderLabel::root);
        let hash = match config.hash_kind {
            HashKind::None => 0,
            HashKind::Rolling | HashKind::Postorder => content_hash(Kind::Document, None, None),
        };
        let store = RevisionStore::create(document_node(hash, label));
        debug!(hash_kind = ?config.hash_kind, order_labels = config.order_labels, "resource created");
        Self { store, config }
    }

    pub fn from_toml_str(raw: &str) -> TransactionResult<Self> {
        Ok(Self::create(ResourceConfig::from_toml_str(raw)?))
    }

    pub fn config(&self) -> &ResourceConfig {
        &self.config
    }

    /// Open the write transaction. Only one may be open per resource.
    pub fn begin_write_trx(&self, trx_config: WriteTrxConfig) -> TransactionResult<WriteTrx> {
        let page = self.store.begin_write()?;
        let engine = MutationEngine::new(Box::new(page), self.config.clone());
        debug!(base = %engine.base_revision(), "write transaction opened");
        WriteTrx::new(engine, Arc::clone(&self.store), &trx_config)
    }

    /// An immutable committed revision.
    pub fn begin_read(&self, revision: Revision) -> TransactionResult<Arc<RevisionSnapshot>> {
        Ok(self.store.snapshot(revision)?)
    }

    pub fn latest(&self) -> Arc<RevisionSnapshot> {
        self.store.latest()
    }

    pub fn latest_revision(&self) -> Revision {
        self.store.latest_revision()
    }

    pub fn has_writer(&self) -> bool {
        self.store.has_writer()
    }
}
