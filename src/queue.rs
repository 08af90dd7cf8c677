use crate::{buffer::RingBuffer, error::*, policy::Crash, semaphore::Semaphore};
use crossbeam_utils::CachePadded;
use derivative::Derivative;
use spinning_top::Spinlock;
use std::iter;

/// A bounded multi-producer multi-consumer double-ended queue that blocks when full or empty.
///
/// Pushing blocks while the queue holds `capacity` items and popping blocks while it holds none.
/// The queue may be shared by reference across any number of threads, e.g. through an [`Arc`].
///
/// Pushing at the back and popping from the front makes a FIFO queue, pushing and popping at the
/// same end makes a LIFO stack.
///
/// [`Arc`]: https://doc.rust-lang.org/std/sync/struct.Arc.html
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct BlockingQueue<T: Copy> {
    #[derivative(Debug = "ignore")]
    ring: Spinlock<RingBuffer<T, Crash>>,
    free: CachePadded<Semaphore>,
    filled: CachePadded<Semaphore>,
    capacity: usize,
}

impl<T: Copy> BlockingQueue<T> {
    /// Creates an empty queue that holds up to `capacity` items.
    ///
    /// # Panics
    ///
    /// Panics if the `capacity` is `0`.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be non-zero");

        BlockingQueue {
            ring: Spinlock::new(RingBuffer::with_capacity(capacity)),
            free: CachePadded::new(Semaphore::new(capacity)),
            filled: CachePadded::new(Semaphore::new(0)),
            capacity,
        }
    }

    /// The maximum number of items the queue holds.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The number of items currently in the queue.
    ///
    /// Other threads may push or pop concurrently, so by the time this returns
    /// the value may already be outdated.
    pub fn len(&self) -> usize {
        self.ring.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Every free permit held reserves one slot in the ring buffer,
    // so the pushes below can never overflow.
    fn push_reserved(&self, push: impl FnOnce(&mut RingBuffer<T, Crash>)) {
        push(&mut *self.ring.lock());
        self.filled.release();
    }

    // Every filled permit held reserves one item in the ring buffer,
    // so the pops below can never underflow.
    fn pop_reserved(&self, pop: impl FnOnce(&mut RingBuffer<T, Crash>) -> T) -> T {
        let value = pop(&mut *self.ring.lock());
        self.free.release();
        value
    }

    /// Pushes an item at the back, blocking while the queue is full.
    pub fn push_back(&self, value: T) {
        self.free.acquire();
        self.push_reserved(|ring| ring.push_back(value));
    }

    /// Pushes an item at the front, blocking while the queue is full.
    pub fn push_front(&self, value: T) {
        self.free.acquire();
        self.push_reserved(|ring| ring.push_front(value));
    }

    /// Pushes an item at the back without blocking.
    ///
    /// If the queue is full, [`TryPushError::Full`] hands the item back.
    ///
    /// [`TryPushError::Full`]: enum.TryPushError.html#variant.Full
    pub fn try_push_back(&self, value: T) -> Result<(), TryPushError<T>> {
        if !self.free.try_acquire() {
            return Err(TryPushError::Full(value));
        }

        self.push_reserved(|ring| ring.push_back(value));
        Ok(())
    }

    /// Pushes an item at the front without blocking.
    ///
    /// If the queue is full, [`TryPushError::Full`] hands the item back.
    ///
    /// [`TryPushError::Full`]: enum.TryPushError.html#variant.Full
    pub fn try_push_front(&self, value: T) -> Result<(), TryPushError<T>> {
        if !self.free.try_acquire() {
            return Err(TryPushError::Full(value));
        }

        self.push_reserved(|ring| ring.push_front(value));
        Ok(())
    }

    /// Pops the item at the front, blocking while the queue is empty.
    pub fn pop_front(&self) -> T {
        self.filled.acquire();
        self.pop_reserved(RingBuffer::pop_front)
    }

    /// Pops the item at the back, blocking while the queue is empty.
    pub fn pop_back(&self) -> T {
        self.filled.acquire();
        self.pop_reserved(RingBuffer::pop_back)
    }

    /// Pops the item at the front without blocking.
    ///
    /// If the queue is empty, [`TryPopError::Empty`] is returned and nothing changes.
    ///
    /// [`TryPopError::Empty`]: enum.TryPopError.html#variant.Empty
    pub fn try_pop_front(&self) -> Result<T, TryPopError> {
        if !self.filled.try_acquire() {
            return Err(TryPopError::Empty);
        }

        Ok(self.pop_reserved(RingBuffer::pop_front))
    }

    /// Pops the item at the back without blocking.
    ///
    /// If the queue is empty, [`TryPopError::Empty`] is returned and nothing changes.
    ///
    /// [`TryPopError::Empty`]: enum.TryPopError.html#variant.Empty
    pub fn try_pop_back(&self) -> Result<T, TryPopError> {
        if !self.filled.try_acquire() {
            return Err(TryPopError::Empty);
        }

        Ok(self.pop_reserved(RingBuffer::pop_back))
    }

    /// Pops items from the front until the queue is found empty.
    ///
    /// Draining is not atomic, items pushed concurrently may be popped as well or left behind.
    pub fn clear(&self) {
        self.drain();
    }

    fn drain(&self) -> usize {
        iter::from_fn(|| self.try_pop_front().ok()).count()
    }
}

impl<T: Copy> Drop for BlockingQueue<T> {
    fn drop(&mut self) {
        let drained = self.drain();
        tracing::trace!(drained, capacity = self.capacity, "dropping blocking queue");
        debug_assert_eq!(self.free.available(), self.capacity);
    }
}
