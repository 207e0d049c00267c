//! Storage error types.

use arbor_core::{CoreError, NameKey, NodeKey, Revision};
use thiserror::Error;

/// Errors raised by the page layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    RecordNotFound(NodeKey),

    #[error("Record already exists: {0}")]
    RecordExists(NodeKey),

    #[error("Name key not found: {0}")]
    NameNotFound(NameKey),

    #[error("Revision not found: {0}")]
    RevisionNotFound(Revision),

    #[error("A write transaction is already open on this resource")]
    WriterActive,

    #[error("Page transaction is closed")]
    Closed,

    #[error("Node key space exhausted")]
    KeySpaceExhausted,

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;
