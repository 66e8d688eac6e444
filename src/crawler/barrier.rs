//! Layer rendezvous primitive

use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

/// A counting rendezvous for dynamically-registered units of work.
///
/// Tasks `register` before they start and `arrive` when they finish;
/// `wait` completes once the outstanding count returns to zero.
/// Registration is allowed while a waiter is already blocked — a task may
/// hand off to a follow-up task by registering the new unit before arriving
/// its own, which keeps the count from touching zero while work is still
/// pending.
#[derive(Debug, Default)]
pub struct WaitGroup {
    outstanding: AtomicUsize,
    zero: Notify,
}

impl WaitGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one outstanding unit
    pub fn register(&self) {
        self.outstanding.fetch_add(1, Ordering::SeqCst);
    }

    /// Completes one outstanding unit, waking waiters when none remain
    pub fn arrive(&self) {
        let previous = self.outstanding.fetch_sub(1, Ordering::SeqCst);
        debug_assert!(previous > 0, "arrive without a matching register");
        if previous == 1 {
            self.zero.notify_waiters();
        }
    }

    /// Waits until every registered unit has arrived.
    ///
    /// The notified future is created before the count is checked, so an
    /// `arrive` landing between the check and the await cannot be missed.
    pub async fn wait(&self) {
        loop {
            let notified = self.zero.notified();
            if self.outstanding.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }
}
