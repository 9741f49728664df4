//! The observable queue.
//!
//! [`ObservableQueue`] composes a [`FifoQueue`] with a [`SubscriberRegistry`]
//! and fires a [`ChangeEvent`] after every successful mutation or peek.
//!
//! # Locking
//!
//! In thread-safe mode two independent `parking_lot` reentrant mutexes are
//! used:
//!
//! - the enqueue lock serializes `enqueue` against other enqueues, so append
//!   order and `Enqueue` event order agree;
//! - the dequeue lock serializes `try_dequeue` against other dequeues, so a
//!   `Dequeue` and the `Empty` that may follow it are never interleaved with
//!   another dequeue's events.
//!
//! Both locks are reentrant: a subscriber may call back into the same
//! direction (`enqueue` from an `Enqueue` event, `try_dequeue` from a
//! `Dequeue` or `Empty` event) on its own thread, exactly as it can in
//! relaxed mode. Other threads still wait for the outer call to finish.
//!
//! No call path ever holds both. Producers do not contend with consumers,
//! and `try_peek` takes neither lock. As a result an `Empty` event can race a
//! concurrent enqueue: it means "empty right after this dequeue", not "still
//! empty". Likewise a `Peek` item may already be gone when it is observed.
//!
//! In relaxed mode (the default) no lock is taken and only the underlying
//! queue's per-call atomicity applies; event dispatch order across threads
//! is then unspecified.
//!
//! # Subscriber failure
//!
//! Callbacks run synchronously on the calling thread. A panicking callback
//! unwinds out of the queue operation that triggered it, after the
//! underlying mutation has already happened. The lock guard is released
//! during unwinding and `parking_lot` locks do not poison, so the queue
//! remains usable afterwards.

use std::fmt;

use parking_lot::ReentrantMutex;
use tracing::debug;

use crate::config::QueueSettings;
use crate::core::event::ChangeEvent;
use crate::core::queue::{FifoQueue, LockedQueue};
use crate::core::subscriber::{SubscriberRegistry, SubscriptionId};

pub struct ObservableQueue<T, Q = LockedQueue<T>> {
    inner: Q,
    thread_safe: bool,
    enqueue_lock: ReentrantMutex<()>,
    dequeue_lock: ReentrantMutex<()>,
    subscribers: SubscriberRegistry<T>,
}

impl<T: Clone + Send> ObservableQueue<T> {
    /// Creates an empty queue backed by a [`LockedQueue`].
    ///
    /// `thread_safe` is fixed for the lifetime of the queue.
    pub fn new(thread_safe: bool) -> Self {
        Self::with_queue(LockedQueue::new(), thread_safe)
    }

    /// Creates an empty queue whose mode comes from configuration.
    pub fn from_config(settings: &QueueSettings) -> Self {
        Self::new(settings.thread_safe)
    }
}

impl<T: Clone + Send> Default for ObservableQueue<T> {
    fn default() -> Self {
        Self::new(false)
    }
}

impl<T, Q> ObservableQueue<T, Q>
where
    T: Clone,
    Q: FifoQueue<T>,
{
    /// Wraps an existing queue. Items already in `inner` produce no events.
    pub fn with_queue(inner: Q, thread_safe: bool) -> Self {
        debug!(target: "obsq::queue", thread_safe, "observable queue created");
        Self {
            inner,
            thread_safe,
            enqueue_lock: ReentrantMutex::new(()),
            dequeue_lock: ReentrantMutex::new(()),
            subscribers: SubscriberRegistry::new(),
        }
    }

    pub fn is_thread_safe(&self) -> bool {
        self.thread_safe
    }

    /// Appends `item` and fires one [`ChangeEvent::Enqueue`] before returning.
    pub fn enqueue(&self, item: T) {
        let _guard = self.thread_safe.then(|| self.enqueue_lock.lock());

        let event = ChangeEvent::Enqueue(item.clone());
        self.inner.enqueue(item);
        self.subscribers.dispatch(&event);
    }

    /// Removes the head item.
    ///
    /// On success fires [`ChangeEvent::Dequeue`] and then, if the queue is
    /// empty at that instant, [`ChangeEvent::Empty`]. Returns `None` without
    /// firing anything when there is nothing to remove.
    pub fn try_dequeue(&self) -> Option<T> {
        let _guard = self.thread_safe.then(|| self.dequeue_lock.lock());

        let item = self.inner.try_dequeue()?;
        self.subscribers.dispatch(&ChangeEvent::Dequeue(item.clone()));

        if self.inner.is_empty() {
            self.subscribers.dispatch(&ChangeEvent::Empty);
        }
        Some(item)
    }

    /// Returns a copy of the head item and fires [`ChangeEvent::Peek`].
    ///
    /// Never locks, in either mode.
    pub fn try_peek(&self) -> Option<T> {
        let item = self.inner.try_peek()?;
        self.subscribers.dispatch(&ChangeEvent::Peek(item.clone()));
        Some(item)
    }

    /// Registers `callback`; it sees every event fired after this call.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&ChangeEvent<T>) + Send + Sync + 'static,
    {
        self.subscribers.subscribe(callback)
    }

    /// Stops delivery to `id`. Past events are not replayed. Returns `false`
    /// for an unknown handle.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Removes every subscriber. Nothing does this automatically on drop.
    pub fn clear_subscribers(&self) {
        self.subscribers.clear();
    }

    // Plain reads: no event, no lock.

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Head-to-tail copy of the current contents.
    pub fn snapshot(&self) -> Vec<T> {
        self.inner.snapshot()
    }
}

impl<T, Q> fmt::Debug for ObservableQueue<T, Q>
where
    Q: FifoQueue<T>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableQueue")
            .field("thread_safe", &self.thread_safe)
            .field("len", &self.inner.len())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
