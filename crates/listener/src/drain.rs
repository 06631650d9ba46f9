//! Drain counter: in-flight handler tracking for graceful shutdown.
//!
//! The dispatcher takes a [`DrainGuard`] before spawning each handler task and
//! the task drops it when it finishes, however it finishes. During shutdown
//! the server awaits [`DrainCounter::wait`], which resolves once no handler is
//! running any more.
//!
//! The counter never limits concurrency; it only delays process exit.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

/// Counts handler executions that are still running.
#[derive(Debug, Default)]
pub struct DrainCounter {
    in_flight: AtomicUsize,
    drained: Notify,
}

impl DrainCounter {
    /// Creates a counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `n` more executions in flight.
    pub fn add(&self, n: usize) {
        self.in_flight.fetch_add(n, Ordering::SeqCst);
    }

    /// Records one execution as finished, waking every waiter if none remain.
    ///
    /// Calling this on a counter already at zero leaves it at zero.
    pub fn done(&self) {
        let previous = match self
            .in_flight
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                Some(n.saturating_sub(1))
            }) {
            Ok(n) | Err(n) => n,
        };

        if previous <= 1 {
            self.drained.notify_waiters();
        }
    }

    /// Number of executions currently in flight.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Adds one execution and returns a guard that finishes it on drop.
    ///
    /// The guard is released on every exit path of the owning task,
    /// including a panic unwinding through it.
    pub fn enter(self: &Arc<Self>) -> DrainGuard {
        self.add(1);
        DrainGuard {
            counter: Arc::clone(self),
        }
    }

    /// Waits until no execution is in flight.
    ///
    /// Returns immediately if the count is already zero.
    pub async fn wait(&self) {
        loop {
            // Register interest before checking so a `done()` between the
            // check and the await is not missed.
            let notified = self.drained.notified();

            if self.in_flight() == 0 {
                return;
            }

            notified.await;
        }
    }
}

/// Marks one in-flight execution; finishes it when dropped.
#[derive(Debug)]
#[must_use = "dropping the guard immediately marks the execution as finished"]
pub struct DrainGuard {
    counter: Arc<DrainCounter>,
}

impl Drop for DrainGuard {
    fn drop(&mut self) {
        self.counter.done();
    }
}

#[cfg(test)]
#[path = "drain_tests.rs"]
mod tests;
