//! Debounced delayed tasks.
//!
//! Bursts of input (search keystrokes, price edits, form typing) collapse
//! into a single call: each `schedule` restarts the timer and replaces the
//! pending task, so only the last one in a burst runs.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::task::AbortHandle;

/// Handle to one scheduled task.
#[derive(Debug, Clone)]
pub struct DebounceHandle {
    abort: AbortHandle,
}

impl DebounceHandle {
    /// Cancel the task if it has not run yet.
    pub fn cancel(&self) {
        self.abort.abort();
    }

    /// Whether the task has run, or was cancelled and torn down.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }
}

/// Runs a task once input has been quiet for `delay`.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<AbortHandle>>,
}

impl Debouncer {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// The quiet window.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `task` to run after the quiet window, superseding any task
    /// still pending.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, task: F) -> DebounceHandle
    where
        F: FnOnce() + Send + 'static,
    {
        let delay = self.delay;
        let abort = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        })
        .abort_handle();

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.replace(abort.clone()) {
            previous.abort();
            tracing::trace!("Superseded pending debounced task");
        }

        DebounceHandle { abort }
    }

    /// Cancel whatever is pending.
    pub fn cancel(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.take() {
            previous.abort();
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

    fn recorder() -> (Arc<Mutex<Vec<u32>>>, impl Fn(u32) -> Box<dyn FnOnce() + Send>) {
        let fired = Arc::new(Mutex::new(Vec::new()));
        let sink = fired.clone();
        let make = move |n: u32| {
            let sink = sink.clone();
            Box::new(move || sink.lock().unwrap().push(n)) as Box<dyn FnOnce() + Send>
        };
        (fired, make)
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_last_call_in_burst_fires() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let (fired, make) = recorder();

        debouncer.schedule(make(1));
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.schedule(make(2));
        tokio::time::sleep(Duration::from_millis(100)).await;
        let last = debouncer.schedule(make(3));

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert!(fired.lock().unwrap().is_empty());

        tokio::time::sleep(Duration::from_millis(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(*fired.lock().unwrap(), vec![3]);
        assert!(last.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_each_fire() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let (fired, make) = recorder();

        debouncer.schedule(make(1));
        tokio::time::sleep(Duration::from_millis(400)).await;
        debouncer.schedule(make(2));
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(*fired.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_task_never_runs() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let (fired, make) = recorder();

        let handle = debouncer.schedule(make(1));
        handle.cancel();
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert!(fired.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_debouncer_cancels_pending() {
        let (fired, make) = recorder();
        {
            let debouncer = Debouncer::new(Duration::from_millis(300));
            debouncer.schedule(make(1));
        }
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert!(fired.lock().unwrap().is_empty());
    }
}
