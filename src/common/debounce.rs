// src/common/debounce.rs
//! Cancellable scheduled task used for search-as-you-type lookups
//!
//! Every call to [`Debouncer::schedule`] re-arms the timer and cancels the
//! previously pending one, so only the last call inside a quiet period runs.
//! Once a task has fired it runs detached: cancelling or re-arming the timer
//! never aborts work that is already in flight.

use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm the timer for `task`, cancelling whatever was pending
    pub fn schedule<F, Fut>(&self, task: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(task());
        });

        if let Some(previous) = self.slot().replace(timer) {
            if !previous.is_finished() {
                debug!("Debounce timer re-armed, previous task cancelled");
            }
            previous.abort();
        }
    }

    /// Cancel the pending timer. Returns true if a timer was still waiting.
    pub fn cancel(&self) -> bool {
        match self.slot().take() {
            Some(timer) => {
                let was_pending = !timer.is_finished();
                timer.abort();
                was_pending
            }
            None => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.slot()
            .as_ref()
            .map_or(false, |timer| !timer.is_finished())
    }

    fn slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
