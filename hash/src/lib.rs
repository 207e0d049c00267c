//! Arbor Hash
//!
//! Subtree hash maintenance.
//!
//! Responsibilities:
//! - Compute the content hash of a single node
//! - Keep every stored hash equal to a full bottom-up recomputation
//! - Keep ancestor descendant counts current on every add and remove
//! - Defer hashing during bulk inserts and settle it in one pass afterwards
//!
//! The subtree hash of a node is
//! `own(n) + K * (sum of the hashes of its children, attributes and namespaces)`
//! with wrapping 64-bit arithmetic.

mod content;
mod maintainer;

pub use content::{combine, content_hash, own_hash, postorder_hash, HASH_MULTIPLIER};
pub use maintainer::HashMaintainer;
