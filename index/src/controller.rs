//! Index change notification.

use arbor_core::{Node, PathNodeKey};

/// Kind of change reported to index listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeType {
    Insert,
    Delete,
}

/// A secondary index that wants to hear about every changed node.
pub trait IndexListener: Send {
    fn notify_change(&mut self, change: ChangeType, node: &Node, path: Option<PathNodeKey>);
}

/// Forwards notifications to all listeners in registration order.
#[derive(Default)]
pub struct IndexController {
    listeners: Vec<Box<dyn IndexListener>>,
}

impl IndexController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, listener: Box<dyn IndexListener>) {
        self.listeners.push(listener);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn notify_change(&mut self, change: ChangeType, node: &Node, path: Option<PathNodeKey>) {
        for listener in &mut self.listeners {
            listener.notify_change(change, node, path);
        }
    }
}

impl std::fmt::Debug for IndexController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexController")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
