//! Bounded waits for work the engine does not control.
//!
//! Calls into the clearance authority and reads from the content store run
//! on a short-lived worker thread; the caller waits at most `timeout`. A
//! worker that overruns is abandoned and its eventual result dropped.

use std::{
    fmt,
    sync::mpsc,
    thread,
    time::Duration,
};

use tracing::warn;

/// Why a bounded call produced no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeadlineError {
    /// The work did not finish within the allowed time.
    Elapsed(Duration),
    /// The worker could not be started or died without answering.
    WorkerFailed(String),
}

impl fmt::Display for DeadlineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Elapsed(d) => write!(f, "no answer within {} ms", d.as_millis()),
            Self::WorkerFailed(reason) => write!(f, "worker failed: {}", reason),
        }
    }
}

/// Run `work` on a worker thread and wait at most `timeout` for its result.
pub fn run_with_timeout<T, F>(label: &str, timeout: Duration, work: F) -> Result<T, DeadlineError>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::sync_channel(1);

    thread::Builder::new()
        .name(format!("custody-{}", label))
        .spawn(move || {
            // The receiver is gone if the caller already timed out.
            let _ = tx.send(work());
        })
        .map_err(|e| DeadlineError::WorkerFailed(e.to_string()))?;

    match rx.recv_timeout(timeout) {
        Ok(value) => Ok(value),
        Err(mpsc::RecvTimeoutError::Timeout) => {
            warn!(label = %label, timeout_ms = timeout.as_millis() as u64, "bounded call timed out");
            Err(DeadlineError::Elapsed(timeout))
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(DeadlineError::WorkerFailed(
            "worker exited without a result".to_string(),
        )),
    }
}
