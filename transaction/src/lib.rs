//! Arbor Transaction
//!
//! The commit coordinator for a resource's single write transaction.
//!
//! Responsibilities:
//! - Bootstrap a resource and hand out its write and read transactions
//! - Count modifications and auto-commit once a threshold is passed
//! - Run a periodic auto-commit worker and serialize against it with one lock
//! - Implement COMMIT/ROLLBACK/REVERT and guarded CLOSE
//! - Run pre-commit hooks before and post-commit hooks after each commit
//!
//! # Module Structure
//!
//! - `session` - `ResourceSession`, owner of the revision store
//! - `trx` - `WriteTrx` and the shared transaction state behind it
//! - `worker` - The periodic auto-commit thread
//! - `config` - Write transaction settings
//! - `error` - Error types for transaction failures

mod config;
mod error;
mod session;
mod trx;
mod worker;

pub use config::WriteTrxConfig;
pub use error::{TransactionError, TransactionResult};
pub use session::ResourceSession;
pub use trx::{CommitInfo, PostCommitHook, PreCommitHook, WriteTrx};
