//! Background load tasks
//!
//! Loads are I/O- and parse-bound and must not block frame delivery, so they
//! run on worker threads and report back through a single-use channel the
//! owner polls once per frame. Cancellation is a shared flag the loader tree
//! checks at each recursion boundary.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, TryRecvError, channel};
use std::thread;

use super::error::LoadError;

/// Cooperative cancellation flag shared between the owner and a load task
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a token in the not-cancelled state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. The task observes it at its next checkpoint.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Bail out of a load if cancellation has been requested.
    ///
    /// Loaders call this before starting each child, which gives rollback a
    /// clean trigger point.
    ///
    /// # Errors
    ///
    /// [`LoadError::Cancelled`] once [`cancel`](Self::cancel) has been called.
    pub fn checkpoint(&self) -> Result<(), LoadError> {
        if self.is_cancelled() {
            Err(LoadError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Handle to a load running on a background thread.
///
/// Resolves exactly once; poll [`try_take`](Self::try_take) each frame.
#[derive(Debug)]
pub struct LoadTask<T> {
    receiver: Receiver<Result<T, LoadError>>,
}

impl<T: Send + 'static> LoadTask<T> {
    /// Run `job` on a new worker thread.
    ///
    /// The job receives the cancellation token so it can checkpoint; the
    /// same token stays with the caller to request cancellation.
    pub fn spawn<F>(token: &CancelToken, job: F) -> Self
    where
        F: FnOnce(&CancelToken) -> Result<T, LoadError> + Send + 'static,
    {
        let (sender, receiver) = channel();
        let token = token.clone();
        thread::Builder::new()
            .name("load-task".into())
            .spawn(move || {
                // The owner may have dropped the task; nobody cares then.
                let _ = sender.send(job(&token));
            })
            .expect("failed to spawn load worker thread");
        Self { receiver }
    }

    /// Take the result if the task has finished.
    ///
    /// Returns `None` while the task is still running. A worker that died
    /// without reporting resolves to [`LoadError::Worker`] instead of
    /// leaving the owner polling forever.
    pub fn try_take(&mut self) -> Option<Result<T, LoadError>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(LoadError::Worker)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn poll_until<T: Send + 'static>(task: &mut LoadTask<T>) -> Result<T, LoadError> {
        for _ in 0..500 {
            if let Some(result) = task.try_take() {
                return result;
            }
            thread::sleep(Duration::from_millis(2));
        }
        panic!("load task never resolved");
    }

    #[test]
    fn test_resolves_once_with_value() {
        let token = CancelToken::new();
        let mut task = LoadTask::spawn(&token, |_| Ok(7_u32));
        assert_eq!(poll_until(&mut task).unwrap(), 7);
    }

    #[test]
    fn test_cancellation_observed_at_checkpoint() {
        let token = CancelToken::new();
        token.cancel();

        let mut task = LoadTask::spawn(&token, |token| {
            token.checkpoint()?;
            Ok(7_u32)
        });

        let err = poll_until(&mut task).unwrap_err();
        assert!(err.is_cancelled());
    }

    #[test]
    fn test_dead_worker_resolves_to_error() {
        let token = CancelToken::new();
        let mut task: LoadTask<u32> = LoadTask::spawn(&token, |_| panic!("worker died"));
        let err = poll_until(&mut task).unwrap_err();
        assert!(matches!(err, LoadError::Worker));
    }
}
