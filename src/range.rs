use crate::{buffer::RingBuffer, policy::OverflowPolicy};
use std::fmt;
use std::iter::FusedIterator;
use std::ops::{Bound, Index, RangeBounds};

/// Resolves `bounds` against a buffer of length `len` into a half-open range.
#[track_caller]
pub(crate) fn resolve<R: RangeBounds<usize>>(bounds: R, len: usize) -> (usize, usize) {
    let start = match bounds.start_bound() {
        Bound::Included(&i) => i,
        Bound::Excluded(&i) => i.saturating_add(1),
        Bound::Unbounded => 0,
    };

    let end = match bounds.end_bound() {
        Bound::Included(&j) => j.saturating_add(1),
        Bound::Excluded(&j) => j,
        Bound::Unbounded => len,
    };

    assert!(start <= end, "range starts at {} but ends at {}", start, end);
    assert!(
        end <= len,
        "range end {} out of range for ring buffer of length {}",
        end,
        len
    );

    (start, end)
}

/// A view over a contiguous logical range of a [`RingBuffer`].
///
/// Elements are peeled off from either end by iterating forwards or backwards.
/// Cloning the view restarts it from its current bounds, leaving the buffer untouched.
///
/// [`RingBuffer`]: struct.RingBuffer.html
pub struct Range<'a, T: Copy, P: OverflowPolicy> {
    buffer: &'a RingBuffer<T, P>,
    start: usize,
    end: usize,
}

impl<'a, T: Copy, P: OverflowPolicy> Clone for Range<'a, T, P> {
    fn clone(&self) -> Self {
        Range {
            buffer: self.buffer,
            start: self.start,
            end: self.end,
        }
    }
}

impl<'a, T: Copy, P: OverflowPolicy> Range<'a, T, P> {
    pub(crate) fn new(buffer: &'a RingBuffer<T, P>, start: usize, end: usize) -> Self {
        debug_assert!(start <= end && end <= buffer.len());
        Range { buffer, start, end }
    }

    /// The number of elements left in view.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The element at position `index` of the view, counting from its front.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&'a T> {
        if index < self.len() {
            self.buffer.get(self.start + index)
        } else {
            None
        }
    }

    /// The first element in view, without removing it from the view.
    #[inline]
    pub fn front(&self) -> Option<&'a T> {
        self.get(0)
    }

    /// The last element in view, without removing it from the view.
    #[inline]
    pub fn back(&self) -> Option<&'a T> {
        self.get(self.len().checked_sub(1)?)
    }
}

impl<'a, T: Copy, P: OverflowPolicy> Iterator for Range<'a, T, P> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let item = self.front()?;
        self.start += 1;
        Some(item)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len(), Some(self.len()))
    }

    #[inline]
    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.start = self.start.saturating_add(n).min(self.end);
        self.next()
    }
}

impl<'a, T: Copy, P: OverflowPolicy> DoubleEndedIterator for Range<'a, T, P> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        let item = self.back()?;
        self.end -= 1;
        Some(item)
    }
}

impl<'a, T: Copy, P: OverflowPolicy> ExactSizeIterator for Range<'a, T, P> {}

impl<'a, T: Copy, P: OverflowPolicy> FusedIterator for Range<'a, T, P> {}

impl<'a, T: Copy, P: OverflowPolicy> Index<usize> for Range<'a, T, P> {
    type Output = T;

    #[track_caller]
    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(value) => value,
            None => panic!("index {} out of range for view of length {}", index, self.len()),
        }
    }
}

impl<'a, T: Copy + fmt::Debug, P: OverflowPolicy> fmt::Debug for Range<'a, T, P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}
