#![allow(dead_code)]

use std::sync::{Arc, Mutex, Once};

use obsq::{ChangeEvent, ObservableQueue};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = obsq::logging::init_logging("debug");
    });
}

pub type EventLog<T> = Arc<Mutex<Vec<ChangeEvent<T>>>>;

/// Subscribes a recorder to `queue` and returns the shared event log.
pub fn record_events<T>(queue: &ObservableQueue<T>) -> EventLog<T>
where
    T: Clone + Send + Sync + 'static,
{
    let log: EventLog<T> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    queue.subscribe(move |event: &ChangeEvent<T>| sink.lock().unwrap().push(event.clone()));
    log
}

/// Empties the log and returns what it held.
pub fn take<T>(log: &EventLog<T>) -> Vec<ChangeEvent<T>> {
    std::mem::take(&mut *log.lock().unwrap())
}
