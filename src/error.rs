use derivative::Derivative;
use std::fmt;

#[cfg(test)]
use test_strategy::Arbitrary;

/// An error that may be returned by [`RingBuffer::try_push_back`] and
/// [`RingBuffer::try_push_front`].
///
/// [`RingBuffer::try_push_back`]: struct.RingBuffer.html#method.try_push_back
/// [`RingBuffer::try_push_front`]: struct.RingBuffer.html#method.try_push_front
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
#[derive(Copy, Clone, Eq, PartialEq)]
#[cfg_attr(test, derive(Arbitrary))]
pub enum CapacityError<T> {
    /// The buffer is full, the value is handed back.
    Full(#[derivative(Debug = "ignore")] T),
}

impl<T> CapacityError<T> {
    /// Recovers the value that couldn't be pushed.
    pub fn into_inner(self) -> T {
        match self {
            CapacityError::Full(value) => value,
        }
    }
}

impl<T> fmt::Display for CapacityError<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        "pushing into a full ring buffer".fmt(f)
    }
}

impl<T> std::error::Error for CapacityError<T> {}

/// An error that may be returned by [`BlockingQueue::try_push_back`] and
/// [`BlockingQueue::try_push_front`].
///
/// [`BlockingQueue::try_push_back`]: struct.BlockingQueue.html#method.try_push_back
/// [`BlockingQueue::try_push_front`]: struct.BlockingQueue.html#method.try_push_front
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
#[derive(Copy, Clone, Eq, PartialEq)]
#[cfg_attr(test, derive(Arbitrary))]
pub enum TryPushError<T> {
    /// No free slots in the queue, the value is handed back.
    Full(#[derivative(Debug = "ignore")] T),
}

impl<T> TryPushError<T> {
    /// Recovers the value that couldn't be pushed.
    pub fn into_inner(self) -> T {
        match self {
            TryPushError::Full(value) => value,
        }
    }
}

impl<T> fmt::Display for TryPushError<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        "pushing into a full queue".fmt(f)
    }
}

impl<T> std::error::Error for TryPushError<T> {}

/// An error that may be returned by [`BlockingQueue::try_pop_front`] and
/// [`BlockingQueue::try_pop_back`].
///
/// [`BlockingQueue::try_pop_front`]: struct.BlockingQueue.html#method.try_pop_front
/// [`BlockingQueue::try_pop_back`]: struct.BlockingQueue.html#method.try_pop_back
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(test, derive(Arbitrary))]
pub enum TryPopError {
    /// No items pending in the queue.
    Empty,
}

impl fmt::Display for TryPopError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use TryPopError::*;
        match self {
            Empty => "popping from an empty queue".fmt(f),
        }
    }
}

impl std::error::Error for TryPopError {}
