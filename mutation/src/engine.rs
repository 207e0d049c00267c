//! Mutation engine - the public operation surface.
//!
//! The engine owns the page transaction and every component that must stay
//! consistent with it. Operations are implemented in `ops/`; the engine only
//! checks arguments that are cheap to check and delegates.

use arbor_core::{
    resolve_name, Kind, NameKey, NameRef, Node, NodeKey, NodeReader, OrderLabel, PathNodeKey, QName,
    ResourceConfig, Revision,
};
use arbor_hash::HashMaintainer;
use arbor_index::{rebuild, ChangeType, IndexController, IndexListener, MemoryPathSummary, PathSummary};
use arbor_label::Region;
use arbor_store::{NodeFactory, PageWriteTrx};
use tracing::debug;

use crate::error::{MutationError, MutationResult};
use crate::event::SubtreeEvent;
use crate::ops;
use crate::InsertPosition;

/// Mutation engine over one page transaction.
pub struct MutationEngine {
    pub(crate) page: Box<dyn PageWriteTrx>,
    pub(crate) factory: NodeFactory,
    pub(crate) hashes: HashMaintainer,
    pub(crate) paths: Option<Box<dyn PathSummary>>,
    pub(crate) index: IndexController,
    pub(crate) config: ResourceConfig,
    pub(crate) cursor: NodeKey,
}

impl MutationEngine {
    /// Create an engine writing through `page`.
    pub fn new(page: Box<dyn PageWriteTrx>, config: ResourceConfig) -> Self {
        let paths: Option<Box<dyn PathSummary>> = if config.path_summary {
            Some(Box::new(MemoryPathSummary::new()))
        } else {
            None
        };
        let mut engine = Self {
            page,
            factory: NodeFactory::new(config.text_compression),
            hashes: HashMaintainer::new(config.hash_kind),
            paths,
            index: IndexController::new(),
            config,
            cursor: NodeKey::DOCUMENT,
        };
        engine.rebuild_paths();
        engine
    }

    pub fn config(&self) -> &ResourceConfig {
        &self.config
    }

    /// The node the last operation left the engine on.
    pub fn cursor(&self) -> NodeKey {
        self.cursor
    }

    pub fn register_index_listener(&mut self, listener: Box<dyn IndexListener>) {
        self.index.register(listener);
    }

    pub fn path_summary(&self) -> Option<&dyn PathSummary> {
        self.paths.as_deref()
    }

    /// The committed revision this transaction is layered on.
    pub fn base_revision(&self) -> Revision {
        self.page.base_revision()
    }

    pub fn is_closed(&self) -> bool {
        self.page.is_closed()
    }

    /// Qualified name of a named node.
    pub fn name_of(&self, key: NodeKey) -> Option<QName> {
        let node = self.page.record(key)?;
        node.name().map(|name| resolve_name(&*self.page, name))
    }

    /// Logical value of a value node.
    pub fn value_of(&self, key: NodeKey) -> MutationResult<Option<String>> {
        match self.page.record(key).and_then(|n| n.value()) {
            Some(value) => Ok(Some(value.text()?)),
            None => Ok(None),
        }
    }

    // ==================== Inserts ====================

    pub fn insert_element(
        &mut self,
        anchor: NodeKey,
        position: InsertPosition,
        name: QName,
    ) -> MutationResult<NodeKey> {
        ops::insert_structural(self, anchor, position, ops::NewNode::Element(&name), true)
    }

    /// Insert text. When the position touches an existing text node the
    /// content is merged into it and that node's key is returned.
    pub fn insert_text(
        &mut self,
        anchor: NodeKey,
        position: InsertPosition,
        text: &str,
    ) -> MutationResult<NodeKey> {
        ops::insert_structural(self, anchor, position, ops::NewNode::Text(text), true)
    }

    pub fn insert_comment(
        &mut self,
        anchor: NodeKey,
        position: InsertPosition,
        comment: &str,
    ) -> MutationResult<NodeKey> {
        ops::insert_structural(self, anchor, position, ops::NewNode::Comment(comment), true)
    }

    pub fn insert_processing_instruction(
        &mut self,
        anchor: NodeKey,
        position: InsertPosition,
        target: &str,
        content: &str,
    ) -> MutationResult<NodeKey> {
        let target = QName::new(target);
        let new = ops::NewNode::ProcessingInstruction {
            target: &target,
            content,
        };
        ops::insert_structural(self, anchor, position, new, true)
    }

    /// Add an attribute. An attribute of the same name with a different
    /// value is updated in place.
    pub fn insert_attribute(&mut self, owner: NodeKey, name: QName, value: &str) -> MutationResult<NodeKey> {
        ops::insert_attribute(self, owner, &name, value)
    }

    /// Declare a namespace. Build `name` with `QName::namespace(prefix, uri)`.
    pub fn insert_namespace(&mut self, owner: NodeKey, name: QName) -> MutationResult<NodeKey> {
        ops::insert_namespace(self, owner, &name)
    }

    /// Insert a whole event stream with hashing deferred to one pass at the end.
    pub fn insert_subtree(
        &mut self,
        anchor: NodeKey,
        position: InsertPosition,
        events: &[SubtreeEvent],
    ) -> MutationResult<NodeKey> {
        ops::insert_subtree(self, anchor, position, events)
    }

    /// Deep-copy the subtree at `source_key` of another revision.
    pub fn copy_subtree<R: NodeReader + ?Sized>(
        &mut self,
        source: &R,
        source_key: NodeKey,
        anchor: NodeKey,
        position: InsertPosition,
    ) -> MutationResult<NodeKey> {
        let events = ops::capture(source, source_key)?;
        ops::insert_events(self, anchor, position, &events, true)
    }

    /// Deep-copy a subtree of the revision being written.
    pub fn copy_subtree_within(
        &mut self,
        source_key: NodeKey,
        anchor: NodeKey,
        position: InsertPosition,
    ) -> MutationResult<NodeKey> {
        let events = ops::capture(&*self.page, source_key)?;
        ops::insert_events(self, anchor, position, &events, true)
    }

    // ==================== Structural edits ====================

    pub fn move_subtree(
        &mut self,
        key: NodeKey,
        anchor: NodeKey,
        position: InsertPosition,
    ) -> MutationResult<NodeKey> {
        ops::move_subtree(self, key, anchor, position)
    }

    /// Remove a node and everything below it. Returns the new cursor.
    pub fn remove(&mut self, key: NodeKey) -> MutationResult<NodeKey> {
        ops::remove(self, key)
    }

    /// Replace `target` with a copy of `source_key` from another revision.
    pub fn replace_node<R: NodeReader + ?Sized>(
        &mut self,
        target: NodeKey,
        source: &R,
        source_key: NodeKey,
    ) -> MutationResult<NodeKey> {
        let target_kind = self.node(target, ops::REPLACE)?.kind();
        let replacement = ops::Replacement::collect(source, source_key, target, target_kind)?;
        ops::replace(self, target, replacement)
    }

    pub fn replace_node_within(&mut self, target: NodeKey, source_key: NodeKey) -> MutationResult<NodeKey> {
        let target_kind = self.node(target, ops::REPLACE)?.kind();
        let replacement = ops::Replacement::collect(&*self.page, source_key, target, target_kind)?;
        ops::replace(self, target, replacement)
    }

    // ==================== Content ====================

    /// Set the value of a text, comment, PI or attribute. An empty value removes the node.
    pub fn set_value(&mut self, key: NodeKey, value: &str) -> MutationResult<()> {
        ops::set_value(self, key, value)
    }

    pub fn set_name(&mut self, key: NodeKey, name: QName) -> MutationResult<()> {
        ops::set_name(self, key, &name)
    }

    // ==================== Revision control ====================

    pub fn commit(&mut self, message: Option<&str>) -> MutationResult<Revision> {
        let revision = self.page.commit(message)?;
        self.reinitialize();
        debug!(%revision, "committed revision");
        Ok(revision)
    }

    pub fn rollback(&mut self) -> MutationResult<Revision> {
        let revision = self.page.rollback()?;
        self.reinitialize();
        debug!(%revision, "rolled back");
        Ok(revision)
    }

    pub fn revert_to(&mut self, revision: Revision) -> MutationResult<Revision> {
        let base = self.page.revert_to(revision)?;
        self.reinitialize();
        debug!(%base, "reverted");
        Ok(base)
    }

    pub fn close(&mut self) -> MutationResult<()> {
        self.page.close()?;
        self.hashes.reset();
        debug!("page transaction closed");
        Ok(())
    }

    /// Rebind dependent state to the page's current base.
    fn reinitialize(&mut self) {
        self.hashes.reset();
        self.rebuild_paths();
        if self.page.record(self.cursor).is_none() {
            self.cursor = NodeKey::DOCUMENT;
        }
    }

    fn rebuild_paths(&mut self) {
        if let Some(paths) = self.paths.as_mut() {
            rebuild(paths.as_mut(), &*self.page);
        }
    }

    // ==================== Helpers for ops ====================

    pub(crate) fn node(&self, key: NodeKey, operation: &'static str) -> MutationResult<&Node> {
        self.page
            .record(key)
            .ok_or_else(|| MutationError::node_not_found(key, operation))
    }

    pub(crate) fn modify(&mut self, key: NodeKey) -> MutationResult<&mut Node> {
        Ok(self.page.prepare_entry_for_modification(key)?)
    }

    /// Logical value of `key`, empty for nodes without one.
    pub(crate) fn text(&self, key: NodeKey) -> MutationResult<String> {
        Ok(self.value_of(key)?.unwrap_or_default())
    }

    /// Intern the parts of `name` in the dictionary.
    pub(crate) fn intern(&mut self, name: &QName, kind: Kind) -> MutationResult<NameRef> {
        let mut part = |raw: &str| -> MutationResult<Option<NameKey>> {
            if raw.is_empty() {
                return Ok(None);
            }
            Ok(Some(self.page.create_name_key(raw, kind)?))
        };
        Ok(NameRef {
            prefix: part(name.prefix())?,
            local: part(name.local())?,
            uri: part(name.uri())?,
            path_node: None,
        })
    }

    /// Intern `name` and take a path summary reference below `parent_path`.
    pub(crate) fn named(
        &mut self,
        name: &QName,
        kind: Kind,
        parent_path: Option<PathNodeKey>,
    ) -> MutationResult<NameRef> {
        let mut name_ref = self.intern(name, kind)?;
        if let Some(paths) = self.paths.as_mut() {
            name_ref.path_node = Some(paths.path_node_key(parent_path, name, kind));
        }
        Ok(name_ref)
    }

    /// Drop the dictionary references of `name`, and its path reference if asked.
    pub(crate) fn release_name(&mut self, name: &NameRef, with_path: bool) -> MutationResult<()> {
        for key in name.keys() {
            self.page.remove_name(key)?;
        }
        if with_path {
            if let (Some(paths), Some(path)) = (self.paths.as_mut(), name.path_node) {
                paths.release(path);
            }
        }
        Ok(())
    }

    /// Path key of an element; `None` for the document and other kinds.
    pub(crate) fn element_path(&self, key: NodeKey) -> Option<PathNodeKey> {
        self.page
            .record(key)
            .filter(|n| n.kind() == Kind::Element)
            .and_then(|n| n.name())
            .and_then(|n| n.path_node)
    }

    /// Report one node to the index listeners.
    pub(crate) fn notify(&mut self, change: ChangeType, key: NodeKey) -> MutationResult<()> {
        if self.index.is_empty() {
            return Ok(());
        }
        let node = self
            .page
            .record(key)
            .ok_or_else(|| MutationError::node_not_found(key, "notify index"))?;
        let path = match node.kind() {
            Kind::Text | Kind::Comment => node.parent.and_then(|p| {
                self.page
                    .record(p)
                    .filter(|n| n.kind() == Kind::Element)
                    .and_then(|n| n.name())
                    .and_then(|n| n.path_node)
            }),
            _ => node.name().and_then(|n| n.path_node),
        };
        self.index.notify_change(change, node, path);
        Ok(())
    }

    /// Label strictly between `left` and `right` in `region` of `parent`, or
    /// `None` when labels are disabled.
    pub(crate) fn new_label(
        &self,
        parent: NodeKey,
        region: Region,
        left: Option<NodeKey>,
        right: Option<NodeKey>,
    ) -> MutationResult<Option<OrderLabel>> {
        if !self.config.order_labels {
            return Ok(None);
        }
        let label = |key: NodeKey| self.page.record(key).and_then(|n| n.label.as_ref());
        let Some(parent_label) = label(parent) else {
            return Ok(None);
        };
        let between = OrderLabel::between(parent_label, region, left.and_then(label), right.and_then(label))?;
        Ok(Some(between))
    }
}

impl NodeReader for MutationEngine {
    fn record(&self, key: NodeKey) -> Option<&Node> {
        self.page.record(key)
    }

    fn name(&self, key: NameKey) -> Option<&str> {
        self.page.name(key)
    }
}

impl std::fmt::Debug for MutationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MutationEngine")
            .field("base_revision", &self.page.base_revision())
            .field("cursor", &self.cursor)
            .field("hash_kind", &self.config.hash_kind)
            .field("listeners", &self.index.len())
            .finish()
    }
}
