//! Arbor Tests
//!
//! Shared fixtures for the integration and property tests.
//!
//! Responsibilities:
//! - Open resources and write transactions with a given configuration
//! - Check every structural invariant of a tree against a full recompute
//! - Record index notifications
//! - Render trees as compact markup for shape assertions
//! - Generate and apply random operation sequences
//!
//! # Module Structure
//!
//! - `fixture` - Resource setup and tracing
//! - `invariants` - The invariant checker
//! - `listener` - `RecordingListener`
//! - `shape` - Markup rendering
//! - `ops` - Random operations for property tests

mod invariants;
mod listener;
mod ops;

pub use fixture::{config, init_tracing, open, open_with};
pub use invariants::{assert_invariants, violations};
pub use listener::{Recorded, RecordingListener};
pub use ops::{apply, live_keys, tree_op, TreeOp};
pub use shape::shape;

/// Common imports for test files.
pub mod prelude {
    pub use crate::{
        apply, assert_invariants, config, init_tracing, live_keys, open, open_with, shape, tree_op,
        violations, Recorded, RecordingListener, TreeOp,
    };
    pub use arbor_core::{HashKind, Kind, NodeKey, NodeReader, QName, ResourceConfig, Revision};
    pub use arbor_hash::postorder_hash;
    pub use arbor_index::ChangeType;
    pub use arbor_mutation::{InsertPosition, MutationError, SubtreeEvent};
    pub use arbor_transaction::{ResourceSession, TransactionError, WriteTrx, WriteTrxConfig};
}
