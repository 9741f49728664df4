//! obsq subscriber module.
//!
//! Provides the ordered [`SubscriberRegistry`] and the [`SubscriptionId`]
//! handle returned on registration.

pub mod registry;

pub use registry::{Callback, SubscriberRegistry, SubscriptionId};
