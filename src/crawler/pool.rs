//! Bounded worker pools

use crate::crawler::barrier::WaitGroup;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// A fixed-size set of execution slots plus in-flight task tracking.
///
/// Slots bound how many tasks run their capability call at once. Tracking
/// covers a task's whole lifetime, including time spent queued for a slot,
/// so shutdown can wait for stragglers. Cloning is cheap and shares the
/// same slots.
#[derive(Clone)]
pub struct WorkerPool {
    name: &'static str,
    slots: Arc<Semaphore>,
    in_flight: Arc<WaitGroup>,
}

impl WorkerPool {
    pub fn new(name: &'static str, size: usize) -> Self {
        Self {
            name,
            slots: Arc::new(Semaphore::new(size)),
            in_flight: Arc::new(WaitGroup::new()),
        }
    }

    /// Checks out an execution slot, queueing until one frees up.
    /// Returns `None` once the pool has been closed.
    pub async fn checkout(&self) -> Option<OwnedSemaphorePermit> {
        self.slots.clone().acquire_owned().await.ok()
    }

    /// Registers a task for shutdown tracking; the guard deregisters on drop
    pub fn track(&self) -> TaskGuard {
        self.in_flight.register();
        TaskGuard {
            in_flight: Arc::clone(&self.in_flight),
        }
    }

    /// Stops handing out slots; queued `checkout` calls resolve to `None`
    pub fn close(&self) {
        self.slots.close();
    }

    /// Waits for every tracked task to finish, up to `timeout`.
    ///
    /// Returns false (and logs a diagnostic) if tasks are still running
    /// when the timeout elapses.
    pub async fn drain(&self, timeout: Duration) -> bool {
        if tokio::time::timeout(timeout, self.in_flight.wait())
            .await
            .is_err()
        {
            tracing::error!(
                "{} pool did not drain within {:?}; tasks may still be running",
                self.name,
                timeout
            );
            false
        } else {
            true
        }
    }
}

/// RAII registration of one task with its pool
pub struct TaskGuard {
    in_flight: Arc<WaitGroup>,
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        self.in_flight.arrive();
    }
}
