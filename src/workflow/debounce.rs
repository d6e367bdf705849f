use std::sync::Mutex;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};

use crate::workflow::lock;

/// Single-slot cancellable timer. Scheduling replaces (and cancels) whatever
/// was pending, so at most one delayed action exists at any time.
pub struct Debouncer {
    delay: Duration,
    slot: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            slot: Mutex::new(None),
        }
    }

    /// Runs `action` once `delay` has elapsed without another call to
    /// `schedule` or `cancel`. The action itself must not await.
    pub fn schedule<F>(&self, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let deadline = Instant::now() + self.delay;
        let handle = tokio::spawn(async move {
            sleep_until(deadline).await;
            action();
        });

        if let Some(previous) = lock(&self.slot).replace(handle) {
            previous.abort();
        }
    }

    pub fn cancel(&self) {
        if let Some(pending) = lock(&self.slot).take() {
            pending.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.slot)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
