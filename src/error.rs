use thiserror::Error;

/// An enumeration listing the failure modes of the queue operations.
///
/// Every operation that fails leaves the queue exactly as it was.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Error {
    /// A zero capacity or item size was requested, or an item/output
    /// buffer didn't match the queue's item size.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The item couldn't be sent because the queue already holds `capacity` items.
    #[error("writing to a full queue")]
    Full,

    /// No item arrived before the requested wait elapsed.
    #[error("timed out waiting on the queue")]
    Timeout,

    /// The storage for the queue couldn't be allocated.
    ///
    /// Contains the number of bytes requested, or `usize::MAX` if the
    /// requested size doesn't fit in a `usize`.
    #[error("failed to allocate {0} bytes of queue storage")]
    ResourceExhausted(usize),

    /// The queue was closed with [`close`](crate::BoundedQueue::close)
    /// and, for receivers, every item sent before that was already received.
    #[error("queue is closed")]
    Closed,

    /// A thread panicked while holding the queue's lock.
    #[error("queue lock poisoned by a panicking thread")]
    Poisoned,
}

/// Shorthand for results of queue operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl<T> From<std::sync::PoisonError<T>> for Error {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        Error::Poisoned
    }
}
