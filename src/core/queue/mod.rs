//! Underlying FIFO queue abstraction.
//!
//! [`ObservableQueue`](crate::core::observable::ObservableQueue) never touches
//! storage directly; it composes any [`FifoQueue`] and layers locking and
//! notification on top. [`LockedQueue`] is the implementation used by default.

pub mod locked;

pub use locked::LockedQueue;

/// Contract for the multi-producer / multi-consumer queue being observed.
///
/// Every method must be linearizable on its own. Nothing is assumed about
/// ordering *between* two calls: a `try_dequeue` followed by `is_empty` may
/// see another thread's enqueue in between.
///
/// All implementations must be thread-safe (`Send + Sync`).
pub trait FifoQueue<T>: Send + Sync {
    /// Append `item` at the tail. Never fails.
    fn enqueue(&self, item: T);

    /// Remove and return the head item, or `None` if the queue is empty.
    fn try_dequeue(&self) -> Option<T>;

    /// Return a copy of the head item without removing it.
    fn try_peek(&self) -> Option<T>
    where
        T: Clone;

    fn is_empty(&self) -> bool;

    /// Number of items currently queued.
    fn len(&self) -> usize;

    /// Head-to-tail copy of the current contents.
    fn snapshot(&self) -> Vec<T>
    where
        T: Clone;
}
