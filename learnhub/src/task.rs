//! Simulated asynchronous work.
//!
//! Pages fake network latency: catalog loads, login, registration and profile
//! saves all "take" a few hundred milliseconds. A [`SimulatedTask`] runs its
//! work after a delay on the tokio runtime. The caller decides what happens
//! next: await the result, cancel it, or drop the handle and ignore whatever
//! it produces later.

use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;

/// Why a simulated task produced no value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Cancelled before it finished
    #[error("task was cancelled")]
    Cancelled,

    /// The work panicked
    #[error("task panicked")]
    Panicked,

    /// The caller stopped waiting; the task has been cancelled
    #[error("task did not finish within {0:?}")]
    TimedOut(Duration),
}

/// Handle to delayed work running on the tokio runtime
///
/// Dropping the handle detaches the task: it still runs, but nobody observes
/// its result.
#[derive(Debug)]
pub struct SimulatedTask<T> {
    handle: JoinHandle<T>,
}

impl<T: Send + 'static> SimulatedTask<T> {
    /// Runs `work` after `delay`
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F>(delay: Duration, work: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            work()
        });
        Self { handle }
    }

    /// Resolves to `value` after `delay`
    pub fn ready_after(delay: Duration, value: T) -> Self {
        Self::spawn(delay, move || value)
    }

    /// Cancels the task; a later [`join`](Self::join) reports `Cancelled`
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// Returns true once the task has finished or been cancelled
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the result
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::Cancelled`] if the task was cancelled and
    /// [`TaskError::Panicked`] if the work panicked.
    pub async fn join(self) -> Result<T, TaskError> {
        self.handle.await.map_err(|e| {
            if e.is_cancelled() {
                TaskError::Cancelled
            } else {
                TaskError::Panicked
            }
        })
    }

    /// Waits at most `timeout`, cancelling the task if it takes longer
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::TimedOut`] when the deadline passes, otherwise
    /// the same errors as [`join`](Self::join).
    pub async fn join_timeout(self, timeout: Duration) -> Result<T, TaskError> {
        let abort = self.handle.abort_handle();
        match tokio::time::timeout(timeout, self.join()).await {
            Ok(result) => result,
            Err(_) => {
                abort.abort();
                tracing::debug!(?timeout, "Simulated task timed out and was cancelled");
                Err(TaskError::TimedOut(timeout))
            },
        }
    }
}
