//! Bounded blocking work queue
//!
//! A fixed-capacity FIFO shared between the acceptor and the workers.
//! Producers block while the queue is full and consumers block while it
//! is empty, so a slow pool throttles the accept rate instead of letting
//! accepted connections pile up in memory.

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;

/// A unit of work handed to the pool.
///
/// `Shutdown` is the sentinel: a worker that pops it returns without
/// treating it as work.
#[derive(Debug, PartialEq, Eq)]
pub enum Job<T> {
    /// A real work item (an accepted connection in the server)
    Work(T),
    /// Tells the popping worker to exit
    Shutdown,
}

/// Fixed-capacity FIFO with blocking `push` and `pop`.
pub struct BoundedQueue<T> {
    items: Mutex<VecDeque<T>>,
    capacity: usize,
    not_empty: Condvar,
    not_full: Condvar,
}

impl<T> BoundedQueue<T> {
    /// Create a queue holding at most `capacity` items (at least 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            // Storage grows on demand; `capacity` only bounds the length
            items: Mutex::new(VecDeque::new()),
            capacity,
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
        }
    }

    /// Append an item, blocking while the queue is full.
    pub fn push(&self, item: T) {
        let mut items = self.items.lock();
        while items.len() == self.capacity {
            self.not_full.wait(&mut items);
        }
        items.push_back(item);
        self.not_empty.notify_one();
    }

    /// Remove the oldest item, blocking while the queue is empty.
    pub fn pop(&self) -> T {
        let mut items = self.items.lock();
        loop {
            if let Some(item) = items.pop_front() {
                self.not_full.notify_one();
                return item;
            }
            self.not_empty.wait(&mut items);
        }
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
