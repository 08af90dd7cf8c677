//! Double-ended ring buffer with a selectable overflow policy, and a blocking MPMC queue on top of it.
//!
//! # Overview
//!
//! [`RingBuffer`] is a double-ended queue backed by a single allocation that is addressed modulo
//! its capacity, so removing elements from either end never moves any data.
//! What happens when an element is pushed into a full buffer is chosen at compile time through
//! its [`OverflowPolicy`]:
//!
//! * [`Grow`] doubles the capacity and never loses elements.
//! * [`Crash`] panics, overflowing a fixed capacity is a logic error.
//! * [`Drop`] evicts one element from the opposite end, so only the most recent elements are kept.
//!
//! [`BlockingQueue`] shares a fixed capacity ring buffer among any number of producer and consumer
//! threads, blocking producers while it is full and consumers while it is empty.
//!
//! Elements are required to be [`Copy`], so they never need to be dropped individually.
//!
//! [`RingBuffer`]: struct.RingBuffer.html
//! [`OverflowPolicy`]: trait.OverflowPolicy.html
//! [`Grow`]: struct.Grow.html
//! [`Crash`]: struct.Crash.html
//! [`Drop`]: struct.Drop.html
//! [`BlockingQueue`]: struct.BlockingQueue.html
//!
//! # Hello, world!
//!
//! ```rust
//! use ring_queue::{Crash, RingBuffer};
//!
//! let mut buffer = RingBuffer::<_, Crash>::with_capacity(7);
//! buffer.extend(0..7);
//!
//! assert_eq!(buffer.front(), &0);
//! assert_eq!(buffer.back(), &6);
//!
//! for i in 0..7 {
//!     assert_eq!(buffer.pop_front(), i);
//! }
//!
//! assert_eq!(buffer.len(), 0);
//! ```
//!
//! # Keeping the most recent elements
//!
//! ```rust
//! use ring_queue::{Drop, RingBuffer};
//!
//! let mut buffer = RingBuffer::<_, Drop>::with_capacity(3);
//! buffer.extend(1..=5);
//!
//! // The oldest elements were evicted to make room.
//! assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), [3, 4, 5]);
//!
//! // Views may cover just part of the buffer.
//! assert_eq!(buffer.range(1..).copied().collect::<Vec<_>>(), [4, 5]);
//! ```
//!
//! # Communicating across threads
//!
//! ```rust
//! use ring_queue::BlockingQueue;
//! use std::{sync::Arc, thread};
//!
//! let queue = Arc::new(BlockingQueue::new(2));
//!
//! let producer = {
//!     let queue = queue.clone();
//!     thread::spawn(move || {
//!         for i in 0..10 {
//!             // Blocks while the queue is full.
//!             queue.push_back(i);
//!         }
//!     })
//! };
//!
//! // Blocks while the queue is empty.
//! let received: Vec<_> = (0..10).map(|_| queue.pop_front()).collect();
//!
//! producer.join().unwrap();
//! assert_eq!(received, (0..10).collect::<Vec<_>>());
//! ```

mod buffer;
mod error;
mod policy;
mod queue;
mod range;
mod semaphore;

pub use buffer::RingBuffer;
pub use error::{CapacityError, TryPopError, TryPushError};
pub use policy::{Crash, Drop, End, Grow, OverflowPolicy};
pub use queue::BlockingQueue;
pub use range::Range;
