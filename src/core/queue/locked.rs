use std::collections::VecDeque;
use std::fmt;

use parking_lot::Mutex;

use crate::core::queue::FifoQueue;

/// `VecDeque` behind a `parking_lot::Mutex`.
///
/// Each method takes the lock exactly once, which is what makes the
/// individual calls linearizable. The lock is private to the queue and is
/// never held across calls, so it cannot deadlock with the observable
/// queue's own enqueue/dequeue locks.
pub struct LockedQueue<T> {
    items: Mutex<VecDeque<T>>,
}

impl<T> LockedQueue<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }
}

impl<T> Default for LockedQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for LockedQueue<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: Mutex::new(iter.into_iter().collect()),
        }
    }
}

impl<T> fmt::Debug for LockedQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockedQueue")
            .field("len", &self.items.lock().len())
            .finish()
    }
}

impl<T: Send> FifoQueue<T> for LockedQueue<T> {
    fn enqueue(&self, item: T) {
        self.items.lock().push_back(item);
    }

    fn try_dequeue(&self) -> Option<T> {
        self.items.lock().pop_front()
    }

    fn try_peek(&self) -> Option<T>
    where
        T: Clone,
    {
        self.items.lock().front().cloned()
    }

    fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    fn len(&self) -> usize {
        self.items.lock().len()
    }

    fn snapshot(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.lock().iter().cloned().collect()
    }
}
