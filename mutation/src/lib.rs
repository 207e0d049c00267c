//! Arbor Mutation
//!
//! Structural mutation of the node tree.
//!
//! Responsibilities:
//! - Validate every precondition before touching storage
//! - Relink parent, child and sibling keys through the page transaction
//! - Merge adjacent text nodes on insert, remove and move
//! - Drive hash maintenance, order labels and path summary updates
//! - Notify index listeners once per affected node
//!
//! # Module Structure
//!
//! - `engine` - `MutationEngine`, the public operation surface
//! - `ops/` - Individual operations (insert, attribute, remove, move, value, replace, copy)
//! - `event` - Owned subtree event streams used by copy and bulk insert
//! - `validation` - Shared precondition checks
//! - `error` - Error types for mutation failures

mod engine;
mod error;
mod event;
mod ops;
mod position;
mod validation;

#[cfg(test)]
mod test_support;

pub use engine::MutationEngine;
pub use error::{MutationError, MutationResult};
pub use event::{subtree_events, SubtreeEvent};
pub use position::InsertPosition;
