//! Change events fired by [`ObservableQueue`](crate::core::observable::ObservableQueue).
//!
//! An event is built by the operation that caused it, handed to every
//! subscriber by reference and dropped when dispatch returns.

use std::fmt;

/// What happened to the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeAction {
    /// An item was appended to the tail.
    Enqueue,
    /// An item was removed from the head.
    Dequeue,
    /// The head item was read without being removed.
    Peek,
    /// A dequeue removed the last item. Point-in-time: another producer may
    /// already have refilled the queue by the time a subscriber sees it.
    Empty,
}

impl ChangeAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeAction::Enqueue => "enqueue",
            ChangeAction::Dequeue => "dequeue",
            ChangeAction::Peek => "peek",
            ChangeAction::Empty => "empty",
        }
    }
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observed transition of the queue.
///
/// `Empty` has no item attached; every other variant carries the value that
/// was enqueued, dequeued or peeked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeEvent<T> {
    Enqueue(T),
    Dequeue(T),
    Peek(T),
    Empty,
}

impl<T> ChangeEvent<T> {
    /// The action tag of this event.
    pub fn action(&self) -> ChangeAction {
        match self {
            Self::Enqueue(_) => ChangeAction::Enqueue,
            Self::Dequeue(_) => ChangeAction::Dequeue,
            Self::Peek(_) => ChangeAction::Peek,
            Self::Empty => ChangeAction::Empty,
        }
    }

    /// The item involved, or `None` for [`ChangeEvent::Empty`].
    pub fn item(&self) -> Option<&T> {
        match self {
            Self::Enqueue(item) | Self::Dequeue(item) | Self::Peek(item) => Some(item),
            Self::Empty => None,
        }
    }

    pub fn into_item(self) -> Option<T> {
        match self {
            Self::Enqueue(item) | Self::Dequeue(item) | Self::Peek(item) => Some(item),
            Self::Empty => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for ChangeEvent<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.item() {
            Some(item) => write!(f, "{}({item})", self.action()),
            None => f.write_str(self.action().as_str()),
        }
    }
}
