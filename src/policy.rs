use crate::buffer::RingBuffer;

/// One of the two ends of a [`RingBuffer`].
///
/// [`RingBuffer`]: struct.RingBuffer.html
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum End {
    /// The logical front, where `pop_front` removes from.
    Front,

    /// The logical back, where `push_back` inserts at.
    Back,
}

impl End {
    /// Returns the other end.
    #[inline]
    pub fn opposite(self) -> Self {
        match self {
            End::Front => End::Back,
            End::Back => End::Front,
        }
    }
}

/// Proof that `OverflowPolicy::make_room` is called from within this crate.
///
/// It can't be constructed elsewhere, so policies are only ever applied to full buffers.
#[doc(hidden)]
#[derive(Debug)]
pub struct Token(pub(crate) ());

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::Grow {}
    impl Sealed for super::Crash {}
    impl Sealed for super::Drop {}
}

/// What a [`RingBuffer`] does when a push finds it full.
///
/// The policy is a type parameter, so the decision is resolved statically
/// and costs nothing on pushes that find room.
///
/// This trait is sealed, the available policies are [`Grow`], [`Crash`] and [`Drop`].
///
/// [`RingBuffer`]: struct.RingBuffer.html
/// [`Grow`]: struct.Grow.html
/// [`Crash`]: struct.Crash.html
/// [`Drop`]: struct.Drop.html
pub trait OverflowPolicy: sealed::Sealed + Sized {
    /// Whether buffers under this policy may change capacity.
    const GROWABLE: bool;

    /// Makes room for one element about to be pushed at `end` of a full `buffer`.
    ///
    /// Upon return the buffer must not be full.
    ///
    /// Only buffers call this, code outside of this crate can't:
    ///
    /// ```compile_fail
    /// use ring_queue::{Drop, End, OverflowPolicy, RingBuffer};
    ///
    /// let mut buffer = RingBuffer::<u8, Drop>::with_capacity(1);
    /// Drop::make_room(&mut buffer, End::Back);
    /// ```
    #[doc(hidden)]
    fn make_room<T: Copy>(buffer: &mut RingBuffer<T, Self>, end: End, _: Token);
}

/// Doubles the capacity of a full buffer, starting at 8.
///
/// Pushing never fails and never loses elements.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Grow;

impl OverflowPolicy for Grow {
    const GROWABLE: bool = true;

    #[inline]
    fn make_room<T: Copy>(buffer: &mut RingBuffer<T, Self>, _: End, _: Token) {
        buffer.grow();
    }
}

/// Panics on a push into a full buffer.
///
/// Overflowing a fixed capacity buffer is treated as a logic error on the caller's side.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Crash;

impl OverflowPolicy for Crash {
    const GROWABLE: bool = false;

    #[cold]
    #[track_caller]
    fn make_room<T: Copy>(buffer: &mut RingBuffer<T, Self>, end: End, _: Token) {
        panic!(
            "push to the {:?} of a full ring buffer with capacity {}",
            end,
            buffer.capacity()
        );
    }
}

/// Evicts one element from the opposite end of a full buffer.
///
/// Pushing to the back of a full buffer discards its front and vice versa,
/// so the buffer always keeps the most recent elements.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Drop;

impl OverflowPolicy for Drop {
    const GROWABLE: bool = false;

    #[inline]
    fn make_room<T: Copy>(buffer: &mut RingBuffer<T, Self>, end: End, _: Token) {
        match end.opposite() {
            End::Front => buffer.pop_front(),
            End::Back => buffer.pop_back(),
        };

        tracing::debug!(?end, capacity = buffer.capacity(), "evicted from full ring buffer");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp;
    use test_strategy::proptest;

    #[test]
    fn opposite_swaps_ends() {
        assert_eq!(End::Front.opposite(), End::Back);
        assert_eq!(End::Back.opposite(), End::Front);
    }

    #[test]
    fn only_grow_is_growable() {
        assert!(Grow::GROWABLE);
        assert!(!Crash::GROWABLE);
        assert!(!Drop::GROWABLE);
    }

    #[proptest]
    fn grow_doubles_capacity_of_full_buffer(#[strategy(8..=64usize)] capacity: usize) {
        let mut buffer = RingBuffer::<u8, Grow>::with_capacity(capacity);
        buffer.extend((0..capacity).map(|i| i as u8));
        Grow::make_room(&mut buffer, End::Back, Token(()));
        assert_eq!(buffer.capacity(), 2 * capacity);
        assert_eq!(buffer.len(), capacity);
    }

    #[proptest]
    fn grow_starts_at_eight(#[strategy(0..8usize)] capacity: usize) {
        let mut buffer = RingBuffer::<u8, Grow>::with_capacity(capacity);
        buffer.extend((0..capacity).map(|i| i as u8));
        Grow::make_room(&mut buffer, End::Front, Token(()));
        assert_eq!(buffer.capacity(), cmp::max(8, 2 * capacity));
        assert_eq!(buffer.len(), capacity);
    }

    #[test]
    fn grow_from_nothing_allocates_eight_slots() {
        let mut buffer = RingBuffer::<u8, Grow>::new();
        Grow::make_room(&mut buffer, End::Back, Token(()));
        assert_eq!(buffer.capacity(), 8);
    }

    #[test]
    #[should_panic(expected = "full ring buffer")]
    fn crash_panics() {
        let mut buffer = RingBuffer::<u8, Crash>::with_capacity(1);
        buffer.push_back(0);
        Crash::make_room(&mut buffer, End::Back, Token(()));
    }

    #[proptest]
    fn drop_evicts_from_opposite_end(#[strategy(2..=10usize)] capacity: usize) {
        let mut buffer = RingBuffer::<usize, Drop>::with_capacity(capacity);
        buffer.extend(0..capacity);

        Drop::make_room(&mut buffer, End::Back, Token(()));
        assert_eq!(buffer.front(), &1);
        assert_eq!(buffer.len(), capacity - 1);

        buffer.push_back(capacity);
        Drop::make_room(&mut buffer, End::Front, Token(()));
        assert_eq!(buffer.back(), &(capacity - 1));
        assert_eq!(buffer.len(), capacity - 1);
    }
}
