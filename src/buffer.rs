use crate::{error::CapacityError, policy::*, range::*};
use std::ops::{Index, IndexMut, RangeBounds};
use std::{cmp, fmt, marker::PhantomData, mem::MaybeUninit};

const MIN_GROWTH: usize = 8;

fn allocate<T: Copy>(capacity: usize) -> Box<[MaybeUninit<T>]> {
    (0..capacity).map(|_| MaybeUninit::uninit()).collect()
}

/// A double-ended ring buffer.
///
/// Elements are addressed modulo the capacity of the underlying storage, starting at the logical
/// front, so popping from either end never moves any data.
/// What happens when pushing into a full buffer is decided by the [`OverflowPolicy`] `P`.
///
/// Elements must be [`Copy`], which guarantees they own no resources, so overwriting, evicting,
/// growing and dropping never has to run any per element cleanup.
///
/// [`OverflowPolicy`]: trait.OverflowPolicy.html
pub struct RingBuffer<T: Copy, P: OverflowPolicy = Grow> {
    // Slots in the logical range `[first, first + len)`, wrapping around, are initialized.
    storage: Box<[MaybeUninit<T>]>,
    first: usize,
    len: usize,
    policy: PhantomData<fn() -> P>,
}

impl<T: Copy> RingBuffer<T, Grow> {
    /// Creates an empty buffer that allocates on the first push.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }
}

impl<T: Copy, P: OverflowPolicy> RingBuffer<T, P> {
    /// Creates an empty buffer that can hold up to `capacity` elements before overflowing.
    ///
    /// # Panics
    ///
    /// Panics if the `capacity` is `0` and the policy can't grow the buffer.
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(
            P::GROWABLE || capacity > 0,
            "capacity must be non-zero for fixed capacity ring buffers"
        );

        RingBuffer {
            storage: allocate(capacity),
            first: 0,
            len: 0,
            policy: PhantomData,
        }
    }

    /// The number of elements the buffer can hold before overflowing.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// The number of elements in the buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Maps a logical index to its slot in the storage.
    #[inline]
    fn slot(&self, index: usize) -> usize {
        debug_assert!(index < self.capacity());
        let slot = self.first + index;

        if slot < self.capacity() {
            slot
        } else {
            slot - self.capacity()
        }
    }

    #[inline]
    fn read(&self, index: usize) -> &T {
        debug_assert!(index < self.len);
        let slot = &self.storage[self.slot(index)];
        unsafe { slot.assume_init_ref() }
    }

    #[inline]
    fn read_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len);
        let slot = self.slot(index);
        unsafe { self.storage[slot].assume_init_mut() }
    }

    /// Reallocates to twice the capacity, at least 8, moving the front to the first slot.
    pub(crate) fn grow(&mut self) {
        let capacity = cmp::max(MIN_GROWTH, self.capacity().saturating_mul(2));
        let mut storage = allocate(capacity);

        let moved = self
            .iter()
            .zip(storage.iter_mut())
            .map(|(&value, slot)| *slot = MaybeUninit::new(value))
            .count();

        tracing::debug!(from = self.capacity(), to = capacity, "growing ring buffer");

        debug_assert_eq!(moved, self.len);
        self.first = 0;
        self.storage = storage;
    }

    /// Inserts an element at the back.
    ///
    /// If the buffer is full, the [`OverflowPolicy`] is applied before the insertion.
    ///
    /// [`OverflowPolicy`]: trait.OverflowPolicy.html
    #[track_caller]
    pub fn push_back(&mut self, value: T) {
        if self.is_full() {
            P::make_room(self, End::Back, Token(()));
        }

        debug_assert!(!self.is_full());
        let slot = self.slot(self.len);
        self.storage[slot] = MaybeUninit::new(value);
        self.len += 1;
    }

    /// Inserts an element at the front.
    ///
    /// If the buffer is full, the [`OverflowPolicy`] is applied before the insertion.
    ///
    /// [`OverflowPolicy`]: trait.OverflowPolicy.html
    #[track_caller]
    pub fn push_front(&mut self, value: T) {
        if self.is_full() {
            P::make_room(self, End::Front, Token(()));
        }

        debug_assert!(!self.is_full());
        self.first = match self.first {
            0 => self.capacity() - 1,
            first => first - 1,
        };

        self.storage[self.first] = MaybeUninit::new(value);
        self.len += 1;
    }

    /// Inserts an element at the back, unless the buffer is full and can't grow.
    ///
    /// Under [`Grow`] this never fails. Under fixed capacity policies the [`OverflowPolicy`] is
    /// never applied, a full buffer hands the value back instead.
    ///
    /// [`Grow`]: struct.Grow.html
    /// [`OverflowPolicy`]: trait.OverflowPolicy.html
    pub fn try_push_back(&mut self, value: T) -> Result<(), CapacityError<T>> {
        if self.is_full() && !P::GROWABLE {
            return Err(CapacityError::Full(value));
        }

        self.push_back(value);
        Ok(())
    }

    /// Inserts an element at the front, unless the buffer is full and can't grow.
    ///
    /// Under [`Grow`] this never fails. Under fixed capacity policies the [`OverflowPolicy`] is
    /// never applied, a full buffer hands the value back instead.
    ///
    /// [`Grow`]: struct.Grow.html
    /// [`OverflowPolicy`]: trait.OverflowPolicy.html
    pub fn try_push_front(&mut self, value: T) -> Result<(), CapacityError<T>> {
        if self.is_full() && !P::GROWABLE {
            return Err(CapacityError::Full(value));
        }

        self.push_front(value);
        Ok(())
    }

    /// Removes the front element, or returns `None` if the buffer is empty.
    pub fn try_pop_front(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let value = *self.read(0);
        self.first = self.slot(1 % self.capacity());
        self.len -= 1;
        Some(value)
    }

    /// Removes the back element, or returns `None` if the buffer is empty.
    pub fn try_pop_back(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }

        let value = *self.read(self.len - 1);
        self.len -= 1;
        Some(value)
    }

    /// Removes the front element.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is empty.
    #[track_caller]
    pub fn pop_front(&mut self) -> T {
        match self.try_pop_front() {
            Some(value) => value,
            None => panic!("pop_front on an empty ring buffer"),
        }
    }

    /// Removes the back element.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is empty.
    #[track_caller]
    pub fn pop_back(&mut self) -> T {
        match self.try_pop_back() {
            Some(value) => value,
            None => panic!("pop_back on an empty ring buffer"),
        }
    }

    /// The front element, or `None` if the buffer is empty.
    #[inline]
    pub fn try_front(&self) -> Option<&T> {
        self.get(0)
    }

    /// The back element, or `None` if the buffer is empty.
    #[inline]
    pub fn try_back(&self) -> Option<&T> {
        self.get(self.len.checked_sub(1)?)
    }

    /// The front element.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is empty.
    #[track_caller]
    pub fn front(&self) -> &T {
        match self.try_front() {
            Some(value) => value,
            None => panic!("front of an empty ring buffer"),
        }
    }

    /// The back element.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is empty.
    #[track_caller]
    pub fn back(&self) -> &T {
        match self.try_back() {
            Some(value) => value,
            None => panic!("back of an empty ring buffer"),
        }
    }

    /// The element at logical position `index`, counting from the front.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.len {
            Some(self.read(index))
        } else {
            None
        }
    }

    /// Mutable reference to the element at logical position `index`, counting from the front.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index < self.len {
            Some(self.read_mut(index))
        } else {
            None
        }
    }

    /// Removes all elements in constant time.
    ///
    /// The storage is left untouched and the capacity is retained.
    pub fn clear(&mut self) {
        self.first = 0;
        self.len = 0;
    }

    /// A view over all elements, from front to back.
    #[inline]
    pub fn iter(&self) -> Range<'_, T, P> {
        Range::new(self, 0, self.len)
    }

    /// A view over the elements within `bounds`, counting from the front.
    ///
    /// # Panics
    ///
    /// Panics if the start of the range is greater than its end,
    /// or if its end is greater than the length of the buffer.
    #[track_caller]
    pub fn range<R: RangeBounds<usize>>(&self, bounds: R) -> Range<'_, T, P> {
        let (start, end) = resolve(bounds, self.len);
        Range::new(self, start, end)
    }
}

impl<T: Copy> Default for RingBuffer<T, Grow> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy, P: OverflowPolicy> Clone for RingBuffer<T, P> {
    fn clone(&self) -> Self {
        RingBuffer {
            storage: self.storage.clone(),
            first: self.first,
            len: self.len,
            policy: PhantomData,
        }
    }
}

impl<T: Copy + fmt::Debug, P: OverflowPolicy> fmt::Debug for RingBuffer<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self).finish()
    }
}

impl<T, P, Q> PartialEq<RingBuffer<T, Q>> for RingBuffer<T, P>
where
    T: Copy + PartialEq,
    P: OverflowPolicy,
    Q: OverflowPolicy,
{
    fn eq(&self, other: &RingBuffer<T, Q>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Copy + Eq, P: OverflowPolicy> Eq for RingBuffer<T, P> {}

impl<T: Copy, P: OverflowPolicy> Index<usize> for RingBuffer<T, P> {
    type Output = T;

    #[track_caller]
    fn index(&self, index: usize) -> &T {
        let len = self.len;
        match self.get(index) {
            Some(value) => value,
            None => panic!("index {} out of range for ring buffer of length {}", index, len),
        }
    }
}

impl<T: Copy, P: OverflowPolicy> IndexMut<usize> for RingBuffer<T, P> {
    #[track_caller]
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len;
        match self.get_mut(index) {
            Some(value) => value,
            None => panic!("index {} out of range for ring buffer of length {}", index, len),
        }
    }
}

impl<'a, T: Copy, P: OverflowPolicy> IntoIterator for &'a RingBuffer<T, P> {
    type Item = &'a T;
    type IntoIter = Range<'a, T, P>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Copy, P: OverflowPolicy> Extend<T> for RingBuffer<T, P> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, items: I) {
        for item in items {
            self.push_back(item);
        }
    }
}

impl<T: Copy> FromIterator<T> for RingBuffer<T, Grow> {
    fn from_iter<I: IntoIterator<Item = T>>(items: I) -> Self {
        let items = items.into_iter();
        let mut buffer = Self::with_capacity(items.size_hint().0);
        buffer.extend(items);
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::collection::size_range;
    use std::{collections::VecDeque, iter};
    use test_strategy::{proptest, Arbitrary};

    #[derive(Debug, Copy, Clone, Arbitrary)]
    enum Op {
        PushBack(u8),
        PushFront(u8),
        PopBack,
        PopFront,
    }

    #[test]
    #[should_panic(expected = "capacity must be non-zero")]
    fn fixed_capacity_buffer_panics_if_capacity_is_zero() {
        RingBuffer::<(), Crash>::with_capacity(0);
    }

    #[test]
    fn growable_buffer_starts_without_storage() {
        let buffer = RingBuffer::<()>::new();
        assert_eq!(buffer.capacity(), 0);
        assert!(buffer.is_empty());
        assert!(buffer.is_full());
    }

    #[proptest]
    fn capacity_returns_the_maximum_buffer_size(#[strategy(1..=10usize)] capacity: usize) {
        assert_eq!(RingBuffer::<u8, Grow>::with_capacity(capacity).capacity(), capacity);
        assert_eq!(RingBuffer::<u8, Crash>::with_capacity(capacity).capacity(), capacity);
        assert_eq!(RingBuffer::<u8, Drop>::with_capacity(capacity).capacity(), capacity);
    }

    #[test]
    fn fills_then_drains_in_order() {
        let mut buffer = RingBuffer::<usize, Crash>::with_capacity(7);
        buffer.extend(0..7);

        assert!(buffer.is_full());
        assert_eq!(buffer.back(), &6);
        assert_eq!(buffer.front(), &0);

        assert_eq!(
            iter::repeat_with(|| buffer.pop_front())
                .take(7)
                .collect::<Vec<_>>(),
            (0..7).collect::<Vec<_>>()
        );

        assert_eq!(buffer.len(), 0);
    }

    #[proptest]
    fn push_back_pop_front_is_fifo(#[strategy(0..=100usize)] n: usize) {
        let mut buffer = RingBuffer::new();
        buffer.extend(0..n);

        assert_eq!(
            iter::from_fn(|| buffer.try_pop_front()).collect::<Vec<_>>(),
            (0..n).collect::<Vec<_>>()
        );
    }

    #[proptest]
    fn push_back_pop_back_is_lifo(#[strategy(0..=100usize)] n: usize) {
        let mut buffer = RingBuffer::new();
        buffer.extend(0..n);

        assert_eq!(
            iter::from_fn(|| buffer.try_pop_back()).collect::<Vec<_>>(),
            (0..n).rev().collect::<Vec<_>>()
        );
    }

    #[proptest]
    fn push_front_pop_front_is_lifo(#[strategy(1..=100usize)] n: usize) {
        let mut buffer = RingBuffer::<usize, Crash>::with_capacity(n);

        for i in 0..n {
            buffer.push_front(i);
        }

        assert_eq!(
            iter::from_fn(|| buffer.try_pop_front()).collect::<Vec<_>>(),
            (0..n).rev().collect::<Vec<_>>()
        );
    }

    #[proptest]
    fn growth_preserves_order(
        #[strategy(0..=10usize)] capacity: usize,
        #[any(size_range(0..=100).lift())] items: Vec<u8>,
        #[strategy(0..=100usize)] popped: usize,
    ) {
        let mut buffer = RingBuffer::<u8, Grow>::with_capacity(capacity);
        let popped = popped.min(items.len());

        // Move the front away from the first slot before growing.
        for &item in &items[..popped] {
            buffer.push_back(item);
            assert_eq!(buffer.pop_front(), item);
        }

        for &item in &items {
            buffer.push_back(item);
            assert!(buffer.capacity() >= buffer.len());
        }

        assert!(buffer.iter().copied().eq(items.iter().copied()));
    }

    #[proptest]
    fn growth_from_the_front_preserves_order(#[any(size_range(0..=100).lift())] items: Vec<u8>) {
        let mut buffer = RingBuffer::<u8, Grow>::new();

        for &item in &items {
            buffer.push_front(item);
            assert!(buffer.capacity() >= buffer.len());
        }

        assert!(buffer.iter().copied().eq(items.iter().rev().copied()));
    }

    #[proptest]
    fn oldest_items_are_dropped_on_overflow(
        #[strategy(1..=10usize)] capacity: usize,
        #[any(size_range(#capacity..=20).lift())] items: Vec<char>,
    ) {
        let mut buffer = RingBuffer::<char, Drop>::with_capacity(capacity);
        buffer.extend(items.iter().copied());

        assert_eq!(buffer.capacity(), capacity);
        assert_eq!(
            iter::from_fn(|| buffer.try_pop_front()).collect::<Vec<_>>(),
            items[(items.len() - capacity)..]
        );
    }

    #[proptest]
    fn newest_items_are_dropped_on_front_overflow(
        #[strategy(1..=10usize)] capacity: usize,
        #[any(size_range(#capacity..=20).lift())] items: Vec<char>,
    ) {
        let mut buffer = RingBuffer::<char, Drop>::with_capacity(capacity);

        for &item in &items {
            buffer.push_front(item);
        }

        assert_eq!(
            iter::from_fn(|| buffer.try_pop_back()).collect::<Vec<_>>(),
            items[(items.len() - capacity)..]
        );
    }

    #[test]
    #[should_panic(expected = "full ring buffer with capacity 3")]
    fn push_back_panics_on_overflow() {
        let mut buffer = RingBuffer::<u8, Crash>::with_capacity(3);
        buffer.extend(0..4);
    }

    #[test]
    #[should_panic(expected = "full ring buffer with capacity 1")]
    fn push_front_panics_on_overflow() {
        let mut buffer = RingBuffer::<u8, Crash>::with_capacity(1);
        buffer.push_front(0);
        buffer.push_front(1);
    }

    #[proptest]
    fn try_push_grows_full_growable_buffer(
        #[strategy(0..=10usize)] capacity: usize,
        #[any(size_range(1..=20).lift())] items: Vec<u8>,
    ) {
        let mut buffer = RingBuffer::<u8, Grow>::with_capacity(capacity);

        for (i, &item) in items.iter().enumerate() {
            if i % 2 == 0 {
                assert_eq!(buffer.try_push_back(item), Ok(()));
            } else {
                assert_eq!(buffer.try_push_front(item), Ok(()));
            }

            assert_eq!(buffer.len(), i + 1);
            assert!(buffer.capacity() >= buffer.len());
        }

        let mut expected = VecDeque::new();
        for (i, &item) in items.iter().enumerate() {
            if i % 2 == 0 {
                expected.push_back(item);
            } else {
                expected.push_front(item);
            }
        }

        assert!(buffer.iter().eq(expected.iter()));
    }

    #[test]
    fn try_push_into_new_growable_buffer_succeeds() {
        let mut buffer = RingBuffer::<u8>::new();
        assert_eq!(buffer.try_push_back(1), Ok(()));
        assert_eq!(buffer.try_push_front(0), Ok(()));
        assert_eq!(buffer.capacity(), 8);
        assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), [0, 1]);
    }

    #[proptest]
    fn try_push_hands_value_back_when_full(#[strategy(1..=10usize)] capacity: usize, item: u8) {
        let mut buffer = RingBuffer::<u8, Crash>::with_capacity(capacity);
        buffer.extend(iter::repeat(0).take(capacity));

        assert_eq!(buffer.try_push_back(item), Err(CapacityError::Full(item)));
        assert_eq!(buffer.try_push_front(item), Err(CapacityError::Full(item)));
        assert_eq!(buffer.capacity(), capacity);
        assert!(buffer.iter().all(|&i| i == 0));

        let mut buffer = RingBuffer::<u8, Drop>::with_capacity(capacity);
        buffer.extend(iter::repeat(0).take(capacity));

        assert_eq!(buffer.try_push_back(item), Err(CapacityError::Full(item)));
        assert_eq!(buffer.try_push_front(item), Err(CapacityError::Full(item)));
        assert!(buffer.iter().all(|&i| i == 0));
    }

    #[test]
    #[should_panic(expected = "pop_front on an empty ring buffer")]
    fn pop_front_panics_if_empty() {
        RingBuffer::<u8, Crash>::with_capacity(1).pop_front();
    }

    #[test]
    #[should_panic(expected = "pop_back on an empty ring buffer")]
    fn pop_back_panics_if_empty() {
        RingBuffer::<u8, Drop>::with_capacity(1).pop_back();
    }

    #[test]
    #[should_panic(expected = "front of an empty ring buffer")]
    fn front_panics_if_empty() {
        RingBuffer::<u8>::new().front();
    }

    #[test]
    #[should_panic(expected = "back of an empty ring buffer")]
    fn back_panics_if_empty() {
        RingBuffer::<u8>::new().back();
    }

    #[proptest]
    fn index_addresses_elements_from_the_front(
        #[strategy(1..=10usize)] capacity: usize,
        #[any(size_range(0..=20).lift())] items: Vec<u8>,
    ) {
        let mut buffer = RingBuffer::<u8, Drop>::with_capacity(capacity);
        buffer.extend(items.iter().copied());

        let kept = &items[items.len() - buffer.len()..];
        for (i, item) in kept.iter().enumerate() {
            assert_eq!(&buffer[i], item);
            assert_eq!(buffer.get(i), Some(item));
        }

        assert_eq!(buffer.get(buffer.len()), None);
    }

    #[test]
    #[should_panic(expected = "index 3 out of range for ring buffer of length 3")]
    fn index_panics_one_past_the_end() {
        let buffer: RingBuffer<u8> = (0..3).collect();
        assert_eq!(buffer[3], 0);
    }

    #[test]
    fn index_mut_writes_in_place() {
        let mut buffer = RingBuffer::<u8, Crash>::with_capacity(3);
        buffer.extend([1, 2, 3]);
        buffer.pop_front();
        buffer.push_back(4);

        buffer[2] *= 10;
        *buffer.get_mut(0).unwrap() = 0;

        assert_eq!(buffer.iter().copied().collect::<Vec<_>>(), [0, 3, 40]);
        assert_eq!(buffer.get_mut(3), None);
    }

    #[proptest]
    fn clear_retains_capacity(#[any(size_range(0..=20).lift())] items: Vec<u8>) {
        let mut buffer: RingBuffer<u8> = items.iter().copied().collect();
        let capacity = buffer.capacity();

        buffer.clear();

        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), capacity);
        assert_eq!(buffer.try_front(), None);
        assert_eq!(buffer.try_back(), None);
    }

    #[proptest]
    fn behaves_like_a_deque(
        #[strategy(1..=10usize)] capacity: usize,
        #[any(size_range(0..=100).lift())] ops: Vec<Op>,
    ) {
        let mut buffer = RingBuffer::<u8, Grow>::with_capacity(capacity);
        let mut deque = VecDeque::new();

        for op in ops {
            match op {
                Op::PushBack(item) => {
                    buffer.push_back(item);
                    deque.push_back(item);
                }

                Op::PushFront(item) => {
                    buffer.push_front(item);
                    deque.push_front(item);
                }

                Op::PopBack => assert_eq!(buffer.try_pop_back(), deque.pop_back()),
                Op::PopFront => assert_eq!(buffer.try_pop_front(), deque.pop_front()),
            }

            assert_eq!(buffer.len(), deque.len());
            assert_eq!(buffer.try_front(), deque.front());
            assert_eq!(buffer.try_back(), deque.back());
        }

        assert!(buffer.iter().eq(deque.iter()));
    }

    #[proptest]
    fn equality_ignores_layout_and_policy(#[any(size_range(1..=10).lift())] items: Vec<u8>) {
        let mut a = RingBuffer::<u8, Crash>::with_capacity(items.len());
        let mut b = RingBuffer::<u8, Drop>::with_capacity(items.len());

        a.extend(items.iter().copied());

        b.push_back(0);
        b.pop_front();
        b.extend(items.iter().copied());

        assert_eq!(a, b);
        assert_eq!(a.clone(), a);

        a.pop_back();
        assert_ne!(a, b);
    }

    #[test]
    fn debug_lists_elements_in_order() {
        let mut buffer = RingBuffer::<u8, Drop>::with_capacity(2);
        buffer.extend([1, 2, 3]);
        assert_eq!(format!("{:?}", buffer), "[2, 3]");
    }
}
