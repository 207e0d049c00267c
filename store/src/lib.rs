//! Arbor Store
//!
//! Copy-on-write paged record storage with multi-revision history.
//!
//! Responsibilities:
//! - Keep every committed revision as an immutable snapshot
//! - Give exactly one writer a copy-on-write page transaction over a revision
//! - Issue node keys that are never reused within a resource
//! - Intern qualified-name parts in a reference-counted name dictionary
//! - Build node records for the mutation engine (node factory)
//!
//! # Module Structure
//!
//! - `page` - Fixed-size record pages shared between revisions
//! - `dictionary` - Reference-counted name dictionary
//! - `snapshot` - Immutable committed revisions
//! - `store` - Revision history and the single-writer claim
//! - `trx` - The `PageWriteTrx` trait and its in-memory implementation
//! - `factory` - Node creation per kind

mod dictionary;
mod error;
mod factory;
mod page;
mod snapshot;
mod store;
mod trx;

pub use dictionary::NameDictionary;
pub use error::{StoreError, StoreResult};
pub use factory::{document_node, NodeFactory, Placement};
pub use snapshot::RevisionSnapshot;
pub use store::RevisionStore;
pub use trx::{MemoryPageTrx, PageWriteTrx};
