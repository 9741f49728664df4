use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::core::event::ChangeEvent;

/// Subscriber callback. Shared behind an `Arc` so dispatch snapshots are cheap.
pub type Callback<T> = dyn Fn(&ChangeEvent<T>) + Send + Sync;

/// Handle returned by [`SubscriberRegistry::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// [`SubscriberRegistry`] is an ordered, thread-safe list of callbacks.
///
/// Registration order is dispatch order. The same closure may be registered
/// more than once and is then called once per registration.
///
/// [`dispatch`](Self::dispatch) copies the list under the lock and releases
/// it before calling anything, so callbacks may subscribe or unsubscribe
/// (themselves included) without deadlocking. Such changes take effect from
/// the next event. A panicking callback unwinds into the caller of
/// `dispatch` and later callbacks are skipped for that event.
pub struct SubscriberRegistry<T> {
    entries: Mutex<Vec<(SubscriptionId, Arc<Callback<T>>)>>,
    next_id: AtomicU64,
}

impl<T> SubscriberRegistry<T> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Appends `callback` to the dispatch order and returns its handle.
    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&ChangeEvent<T>) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.entries.lock().push((id, Arc::new(callback)));
        debug!(target: "obsq::subscriber", subscription = %id, "subscriber registered");
        id
    }

    /// Removes the registration behind `id`.
    ///
    /// Returns `false` when `id` is unknown or already removed; that is not
    /// an error.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|(sid, _)| *sid != id);
        let removed = entries.len() != before;
        drop(entries);

        if removed {
            debug!(target: "obsq::subscriber", subscription = %id, "subscriber removed");
        }
        removed
    }

    /// Drops every registration.
    pub fn clear(&self) {
        let dropped = std::mem::take(&mut *self.entries.lock());
        debug!(target: "obsq::subscriber", count = dropped.len(), "subscribers cleared");
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Calls every registered callback with `event`, in registration order,
    /// on the current thread.
    pub fn dispatch(&self, event: &ChangeEvent<T>) {
        let snapshot: Vec<Arc<Callback<T>>> = {
            let entries = self.entries.lock();
            if entries.is_empty() {
                return;
            }
            entries.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };

        trace!(
            target: "obsq::subscriber",
            action = %event.action(),
            subscribers = snapshot.len(),
            "dispatching change event"
        );
        for cb in snapshot {
            cb(event);
        }
    }
}

impl<T> Default for SubscriberRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SubscriberRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberRegistry")
            .field("subscribers", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{self, AssertUnwindSafe};

    fn recorder(
        log: &Arc<Mutex<Vec<&'static str>>>,
        tag: &'static str,
    ) -> impl Fn(&ChangeEvent<u32>) + Send + Sync + 'static {
        let log = Arc::clone(log);
        move |_| log.lock().push(tag)
    }

    #[test]
    fn dispatches_in_registration_order() {
        let registry = SubscriberRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        registry.subscribe(recorder(&log, "first"));
        registry.subscribe(recorder(&log, "second"));
        registry.subscribe(recorder(&log, "third"));

        registry.dispatch(&ChangeEvent::Enqueue(1));
        assert_eq!(*log.lock(), vec!["first", "second", "third"]);
    }

    #[test]
    fn duplicate_registrations_each_fire() {
        let registry = SubscriberRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let cb = Arc::new(recorder(&log, "dup"));
        let a = Arc::clone(&cb);
        let b = Arc::clone(&cb);
        registry.subscribe(move |e| (*a)(e));
        registry.subscribe(move |e| (*b)(e));

        registry.dispatch(&ChangeEvent::Empty);
        assert_eq!(log.lock().len(), 2);
    }

    #[test]
    fn handles_are_distinct_and_increasing() {
        let registry = SubscriberRegistry::<u32>::new();
        let first = registry.subscribe(|_| {});
        let second = registry.subscribe(|_| {});
        assert!(second.value() > first.value());
        assert_eq!(first.to_string(), format!("sub-{}", first.value()));
    }

    #[test]
    fn unsubscribe_unknown_id_is_a_no_op() {
        let registry = SubscriberRegistry::<u32>::new();
        let id = registry.subscribe(|_| {});
        assert!(registry.unsubscribe(id));
        assert!(!registry.unsubscribe(id));
        assert!(!registry.unsubscribe(SubscriptionId(999)));
        assert!(registry.is_empty());
    }

    #[test]
    fn callback_may_unsubscribe_itself_during_dispatch() {
        let registry = Arc::new(SubscriberRegistry::<u32>::new());
        let hits = Arc::new(AtomicU64::new(0));
        let slot = Arc::new(Mutex::new(None::<SubscriptionId>));

        let id = {
            let inner = Arc::clone(&registry);
            let hits = Arc::clone(&hits);
            let slot = Arc::clone(&slot);
            registry.subscribe(move |_| {
                hits.fetch_add(1, Ordering::SeqCst);
                if let Some(id) = *slot.lock() {
                    inner.unsubscribe(id);
                }
            })
        };
        *slot.lock() = Some(id);

        registry.dispatch(&ChangeEvent::Enqueue(1));
        registry.dispatch(&ChangeEvent::Enqueue(2));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn panic_skips_later_subscribers() {
        let registry = SubscriberRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        registry.subscribe(recorder(&log, "before"));
        registry.subscribe(|_: &ChangeEvent<u32>| panic!("subscriber failed"));
        registry.subscribe(recorder(&log, "after"));

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            registry.dispatch(&ChangeEvent::Peek(3));
        }));
        assert!(result.is_err());
        assert_eq!(*log.lock(), vec!["before"]);
        assert_eq!(registry.len(), 3);
    }
}
