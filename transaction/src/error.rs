//! Transaction error types.

use arbor_core::CoreError;
use arbor_mutation::MutationError;
use arbor_store::StoreError;
use thiserror::Error;

/// Transaction errors.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// The transaction was closed.
    #[error("write transaction is closed")]
    Closed,

    /// Close was requested with work still pending.
    #[error("cannot close: {count} uncommitted modification(s)")]
    UncommittedChanges { count: u64 },

    /// Another write transaction holds the resource.
    #[error("a write transaction is already open on this resource")]
    WriterActive,

    /// The auto-commit worker could not be started or stopped.
    #[error("auto-commit worker: {message}")]
    Threaded { message: String },

    #[error("invalid configuration: {message}")]
    Config { message: String },

    #[error(transparent)]
    Mutation(#[from] MutationError),

    #[error(transparent)]
    Store(StoreError),
}

impl TransactionError {
    pub fn threaded(message: impl Into<String>) -> Self {
        Self::Threaded {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// True when the caller violated a precondition and nothing was written.
    pub fn is_usage(&self) -> bool {
        match self {
            Self::Closed | Self::UncommittedChanges { .. } | Self::WriterActive => true,
            Self::Mutation(e) => e.is_usage(),
            Self::Threaded { .. } | Self::Config { .. } | Self::Store(_) => false,
        }
    }
}

impl From<StoreError> for TransactionError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::WriterActive => Self::WriterActive,
            StoreError::Closed => Self::Closed,
            other => Self::Store(other),
        }
    }
}

impl From<CoreError> for TransactionError {
    fn from(error: CoreError) -> Self {
        Self::config(error.to_string())
    }
}

/// Result type for transaction operations.
pub type TransactionResult<T> = Result<T, TransactionError>;
