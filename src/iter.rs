//! Front-to-back iterators over a [`RingDeque`](crate::RingDeque).

use core::fmt;
use core::iter::FusedIterator;

use crate::deque::RingDeque;

/// Borrowing iterator returned by [`RingDeque::iter`].
///
/// Walks logical offsets `front..back` from `head`, wrapping with the capacity mask.
pub struct Iter<'a, T> {
    buf: &'a [Option<T>],
    head: usize,
    front: usize,
    back: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(buf: &'a [Option<T>], head: usize, len: usize) -> Self {
        Self {
            buf,
            head,
            front: 0,
            back: len,
        }
    }

    #[inline(always)]
    fn slot(&self, offset: usize) -> Option<&'a T> {
        self.buf[(self.head + offset) & (self.buf.len() - 1)].as_ref()
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Iter").field(&self.clone().collect::<Vec<_>>()).finish()
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        if self.front == self.back {
            return None;
        }
        let item = self.slot(self.front);
        self.front += 1;
        item
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        self.slot(self.back)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

/// Owning iterator returned by `RingDeque::into_iter`.
///
/// Draining does not apply the shrink policy; the store is released when the iterator is
/// dropped.
pub struct IntoIter<T> {
    inner: RingDeque<T>,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(inner: RingDeque<T>) -> Self {
        Self { inner }
    }
}

impl<T: Clone> Clone for IntoIter<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.inner).finish()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.inner.take_front()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.inner.len();
        (len, Some(len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        self.inner.take_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}
