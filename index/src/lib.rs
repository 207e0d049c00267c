//! Arbor Index
//!
//! Collaborators that observe tree changes.
//!
//! Responsibilities:
//! - Fan change notifications out to registered index listeners
//! - Map (parent path, kind, name) to path summary keys with reference counts
//! - Rebuild the path summary from a committed tree

mod controller;
mod path;

pub use controller::{ChangeType, IndexController, IndexListener};
pub use path::{rebuild, MemoryPathSummary, PathNode, PathSummary};
