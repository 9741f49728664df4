pub mod event;
pub mod observable;
pub mod queue;
pub mod subscriber;
