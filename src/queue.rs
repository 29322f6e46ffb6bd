//! Task channel with per-item completion tracking.
//!
//! [`TaskQueue`] is an unbounded multi-producer/multi-consumer FIFO with a
//! join barrier: `push` admits an item, `pop` waits until one is available,
//! `ack` marks one previously popped item as finished, and `join_all` waits
//! until every item ever pushed has been acknowledged. Shutdown sentinels
//! ride the queue as ordinary items and are acknowledged by whichever
//! consumer pops them, so the join accounting stays exact.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{Notify, Semaphore};

/// FIFO channel of work items with a blocking join barrier.
///
/// # Concurrency Model
///
/// - A semaphore holds one permit per queued (pushed, not yet popped) item,
///   so consumers wait without polling
/// - An atomic counter tracks pushed-but-unacknowledged items for the join
///   barrier
/// - The item buffer itself is behind a plain mutex held only for the
///   push/pop critical sections
#[derive(Debug)]
pub struct TaskQueue<T> {
    items: Mutex<VecDeque<T>>,
    /// One permit per queued item.
    available: Semaphore,
    /// Items pushed and not yet acknowledged.
    outstanding: AtomicUsize,
    drained: Notify,
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TaskQueue<T> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            available: Semaphore::new(0),
            outstanding: AtomicUsize::new(0),
            drained: Notify::new(),
        }
    }

    /// Locks the item buffer.
    ///
    /// Push and pop never panic while holding the lock, so a poisoned mutex
    /// still guards a consistent buffer and is safe to recover.
    fn lock_items(&self) -> std::sync::MutexGuard<'_, VecDeque<T>> {
        self.items
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Enqueues an item.
    ///
    /// The item counts against the join barrier until a consumer calls
    /// [`ack`](Self::ack) for it.
    pub fn push(&self, item: T) {
        self.outstanding.fetch_add(1, Ordering::SeqCst);
        self.lock_items().push_back(item);
        self.available.add_permits(1);
    }

    /// Dequeues the oldest item, waiting until one is available.
    pub async fn pop(&self) -> T {
        loop {
            // The semaphore is never closed and each permit maps onto one
            // queued item (the item is buffered before its permit is added),
            // so both fallthrough paths are unreachable in practice.
            if let Ok(permit) = self.available.acquire().await {
                permit.forget();
                if let Some(item) = self.lock_items().pop_front() {
                    return item;
                }
            }
        }
    }

    /// Marks one previously popped item as finished.
    pub fn ack(&self) {
        let prev = self.outstanding.fetch_sub(1, Ordering::SeqCst);
        debug_assert!(prev > 0, "ack without a matching push");
        if prev == 1 {
            self.drained.notify_waiters();
        }
    }

    /// Waits until every pushed item has been acknowledged.
    ///
    /// Returns immediately if nothing is outstanding.
    pub async fn join_all(&self) {
        loop {
            let notified = self.drained.notified();
            tokio::pin!(notified);
            // Register as a waiter before checking the counter so a final
            // ack between the check and the await cannot be missed.
            let _ = notified.as_mut().enable();
            if self.outstanding.load(Ordering::SeqCst) == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Number of pushed items not yet acknowledged.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }
}
