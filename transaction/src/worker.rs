//! Periodic auto-commit.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::channel::{bounded, tick, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::{TransactionError, TransactionResult};
use crate::trx::{run_post_hooks, TrxCore};

/// Longest `shutdown` waits for the worker thread to finish.
const SHUTDOWN_WAIT: Duration = Duration::from_secs(2);

/// A thread committing the shared transaction on a fixed period.
pub(crate) struct AutoCommitWorker {
    stop: Option<Sender<()>>,
    done: Receiver<()>,
}

impl AutoCommitWorker {
    pub(crate) fn spawn(core: Arc<Mutex<TrxCore>>, interval: Duration) -> TransactionResult<Self> {
        let (stop_tx, stop_rx) = bounded::<()>(1);
        let (done_tx, done_rx) = bounded::<()>(1);
        thread::Builder::new()
            .name("arbor-auto-commit".into())
            .spawn(move || {
                let ticker = tick(interval);
                loop {
                    crossbeam::select! {
                        recv(stop_rx) -> _ => break,
                        recv(ticker) -> _ => commit_pending(&core),
                    }
                }
                debug!("auto-commit worker stopped");
                let _ = done_tx.send(());
            })
            .map_err(|e| TransactionError::threaded(e.to_string()))?;
        debug!(?interval, "auto-commit worker started");
        Ok(Self {
            stop: Some(stop_tx),
            done: done_rx,
        })
    }

    /// Stop the worker and wait a bounded time for it to finish.
    pub(crate) fn shutdown(mut self) -> TransactionResult<()> {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        match self.done.recv_timeout(SHUTDOWN_WAIT) {
            Ok(()) => Ok(()),
            Err(RecvTimeoutError::Timeout) => Err(TransactionError::threaded(format!(
                "worker did not stop within {SHUTDOWN_WAIT:?}"
            ))),
            Err(RecvTimeoutError::Disconnected) => {
                Err(TransactionError::threaded("worker exited without finishing"))
            }
        }
    }
}

impl Drop for AutoCommitWorker {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }
}

/// One tick: commit if anything is pending. Failures are logged and the
/// worker keeps running.
fn commit_pending(core: &Mutex<TrxCore>) {
    let committed = {
        let mut core = core.lock();
        if !core.has_pending() {
            return;
        }
        core.commit(None)
    };
    match committed {
        Ok((info, hooks)) => {
            debug!(revision = %info.revision, "periodic commit");
            run_post_hooks(&info, &hooks);
        }
        Err(e) => warn!(error = %e, "periodic auto-commit failed"),
    }
}
