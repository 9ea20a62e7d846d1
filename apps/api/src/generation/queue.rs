//! Bounded dispatch queue for provider calls.
//!
//! A fair semaphore admits at most `max_concurrent` operations at once;
//! waiters are released in the order they arrived, so admission is FIFO.

use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Semaphore;

pub const MAX_CONCURRENT: usize = 3;

pub struct DispatchQueue {
    semaphore: Semaphore,
    active: AtomicUsize,
    max_concurrent: usize,
}

impl Default for DispatchQueue {
    fn default() -> Self {
        Self::new(MAX_CONCURRENT)
    }
}

impl DispatchQueue {
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            semaphore: Semaphore::new(max_concurrent),
            active: AtomicUsize::new(0),
            max_concurrent,
        }
    }

    /// Runs `op` once a slot is free. The permit is held for the whole call.
    pub async fn enqueue<F, Fut, T>(&self, op: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = T>,
    {
        // The semaphore is never closed, so acquire cannot fail.
        let _permit = self
            .semaphore
            .acquire()
            .await
            .expect("dispatch semaphore closed");
        self.active.fetch_add(1, Ordering::SeqCst);
        let result = op().await;
        self.active.fetch_sub(1, Ordering::SeqCst);
        result
    }

    pub fn active_count(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }
}

impl std::fmt::Debug for DispatchQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchQueue")
            .field("max_concurrent", &self.max_concurrent())
            .field("active", &self.active_count())
            .finish()
    }
}
