//! Debounced task scheduling.
//!
//! A [`Debouncer`] owns one pending slot. Scheduling a new action cancels the
//! pending one if its delay has not elapsed yet, so only the last action in a
//! burst runs. An action that has already started is left alone; any network
//! request it issued runs to completion.

use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Runs only the most recent of a rapid sequence of scheduled actions.
#[derive(Debug, Default)]
pub struct Debouncer {
    pending: Mutex<Option<oneshot::Sender<()>>>,
}

impl Debouncer {
    /// Create a debouncer with nothing pending.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `action` after `delay` unless another action is scheduled first.
    ///
    /// Must be called from within a Tokio runtime. The returned handle
    /// completes when the action finishes or is superseded.
    pub fn schedule<F, Fut>(&self, delay: Duration, action: F) -> JoinHandle<()>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (cancel_tx, cancel_rx) = oneshot::channel();

        let previous = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(cancel_tx);
        if let Some(previous) = previous {
            // Fails if that action already fired, which is fine.
            let _ = previous.send(());
        }

        tokio::spawn(async move {
            tokio::select! {
                () = tokio::time::sleep(delay) => action().await,
                _ = cancel_rx => tracing::trace!("debounced action superseded"),
            }
        })
    }

    /// Cancel the pending action, if any, without scheduling another.
    pub fn cancel(&self) {
        if let Some(pending) = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            let _ = pending.send(());
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;

    type Calls = Arc<Mutex<Vec<&'static str>>>;

    fn record(calls: &Calls, value: &'static str) -> impl FnOnce() -> std::future::Ready<()> + use<> {
        let calls = Arc::clone(calls);
        move || {
            calls.lock().unwrap().push(value);
            std::future::ready(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_runs_only_last_action() {
        let debouncer = Debouncer::new();
        let calls = Calls::default();
        let delay = Duration::from_millis(500);

        let mut handles = Vec::new();
        for value in ["l", "la", "lap", "lapt", "laptop"] {
            handles.push(debouncer.schedule(delay, record(&calls, value)));
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(*calls.lock().unwrap(), ["laptop"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_quiet_gap_runs_both() {
        let debouncer = Debouncer::new();
        let calls = Calls::default();
        let delay = Duration::from_millis(500);

        let first = debouncer.schedule(delay, record(&calls, "first"));
        tokio::time::sleep(Duration::from_millis(600)).await;
        let second = debouncer.schedule(delay, record(&calls, "second"));

        first.await.unwrap();
        second.await.unwrap();
        assert_eq!(*calls.lock().unwrap(), ["first", "second"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_started_action_is_not_cancelled() {
        let debouncer = Debouncer::new();
        let calls = Calls::default();
        let delay = Duration::from_millis(100);

        let slow_calls = Arc::clone(&calls);
        let slow = debouncer.schedule(delay, move || async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            slow_calls.lock().unwrap().push("slow");
        });

        // Let the first action fire and start its long-running work.
        tokio::time::sleep(Duration::from_millis(200)).await;
        let fast = debouncer.schedule(delay, record(&calls, "fast"));

        fast.await.unwrap();
        slow.await.unwrap();
        assert_eq!(*calls.lock().unwrap(), ["fast", "slow"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel() {
        let debouncer = Debouncer::new();
        let calls = Calls::default();

        let handle = debouncer.schedule(Duration::from_millis(100), record(&calls, "never"));
        debouncer.cancel();
        handle.await.unwrap();

        assert!(calls.lock().unwrap().is_empty());
    }
}
