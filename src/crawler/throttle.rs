//! Per-host admission control

use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Limits simultaneous downloads per host.
///
/// Each host gets its own gate with `per_host` permits, created the first
/// time the host is seen and kept for the crawler's lifetime. Tasks beyond
/// the limit queue on the gate and are admitted in FIFO order as permits
/// free up. Gates are independent, so a saturated host never delays
/// admission for any other host.
pub struct HostThrottle {
    per_host: usize,
    gates: DashMap<String, Arc<Semaphore>>,
    sealed: AtomicBool,
}

impl HostThrottle {
    pub fn new(per_host: usize) -> Self {
        Self {
            per_host,
            gates: DashMap::new(),
            sealed: AtomicBool::new(false),
        }
    }

    fn gate(&self, host: &str) -> Arc<Semaphore> {
        self.gates
            .entry(host.to_string())
            .or_insert_with(|| {
                tracing::trace!("Creating throttle gate for host {}", host);
                let gate = Arc::new(Semaphore::new(self.per_host));
                if self.sealed.load(Ordering::SeqCst) {
                    gate.close();
                }
                gate
            })
            .clone()
    }

    /// Admits one download for `host`, waiting in line while the host is at
    /// its limit. Dropping the returned permit admits the next queued task.
    /// Returns `None` once the throttle has been sealed.
    pub async fn admit(&self, host: &str) -> Option<OwnedSemaphorePermit> {
        self.gate(host).acquire_owned().await.ok()
    }

    /// Closes every gate for shutdown; pending and future admissions
    /// resolve to `None`.
    pub fn seal(&self) {
        self.sealed.store(true, Ordering::SeqCst);
        for entry in self.gates.iter() {
            entry.value().close();
        }
    }

    #[cfg(test)]
    fn active(&self, host: &str) -> usize {
        self.gates
            .get(host)
            .map(|gate| self.per_host - gate.available_permits())
            .unwrap_or(0)
    }
}
