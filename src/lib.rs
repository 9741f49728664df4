//! obsq – a concurrency-safe FIFO queue that tells subscribers what happened to it.
//!
//! This crate exports
//!  * `core`    – change events, the underlying queue contract, subscriber
//!                dispatch and the observable queue itself
//!  * `config`  – TOML-driven runtime configuration
//!  * `logging` – `tracing` subscriber setup for binaries and tests
//!
//! Every successful enqueue, dequeue and peek fires a [`ChangeEvent`]
//! synchronously on the calling thread; a dequeue that leaves the queue
//! empty fires an extra [`ChangeEvent::Empty`].

// ───────────────────────────────────────────────────────────
// Public modules
// ───────────────────────────────────────────────────────────
pub mod config;
pub mod core;
pub mod logging;

// ───────────────────────────────────────────────────────────
// Re-exports
// ───────────────────────────────────────────────────────────
pub use crate::config::{load_config, Config, ConfigError};
pub use crate::core::event::{ChangeAction, ChangeEvent};
pub use crate::core::observable::ObservableQueue;
pub use crate::core::queue::{FifoQueue, LockedQueue};
pub use crate::core::subscriber::{SubscriberRegistry, SubscriptionId};
