//! Growable ring-buffer double-ended queue.
//!
//! [`RingDeque`] keeps its elements in a single power-of-two sized slot array and
//! addresses them through a `head` cursor and a `len` counter.  Logical index `i` maps to
//! physical slot `(head + i) & (capacity - 1)`, so pushing or popping at either end only
//! moves a cursor.
//!
//! # Resizing
//! * **Growth**: inserting into a full deque doubles the capacity.
//! * **Shrink**: after a removal leaves the deque at most a quarter full, the capacity is
//!   halved (never below [`ResizePolicy::get_min_capacity`]).  Can be switched off through
//!   [`ResizePolicy::shrink`].
//!
//! Both directions *relinearize*: the logical elements are moved into slots `0..len` of the
//! new store and `head` is reset to zero.  The new store is fully populated before the old
//! one is released, and a failed allocation leaves the deque untouched.
//!
//! # Stale slots
//! Slots outside the logical range always hold `None`.  Removal *takes* the element out of
//! its slot, so the deque never keeps a removed value alive.

use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::ops::{Index, IndexMut};
use std::collections::VecDeque;

use tracing::{debug, trace, warn};

use crate::error::DequeError;
use crate::identity::SameInstance;
use crate::iter::{IntoIter, Iter};
use crate::policy::ResizePolicy;

// ─── AnyDeque ─────────────────────────────────────────────────────────────────

/// An object-safe abstraction over double-ended queue types.
///
/// Implemented by both `VecDeque<T>` and `RingDeque<T>` so that code can operate on a
/// deque without knowing which one it was handed.
pub trait AnyDeque<T> {
    /// Returns the number of elements in the deque.
    fn len(&self) -> usize;
    /// Returns `true` if the deque contains no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Appends an element to the back.
    fn push_back(&mut self, item: T);
    /// Prepends an element to the front.
    fn push_front(&mut self, item: T);
    /// Removes and returns the element from the back, or `None` if empty.
    fn pop_back(&mut self) -> Option<T>;
    /// Removes and returns the element from the front, or `None` if empty.
    fn pop_front(&mut self) -> Option<T>;
    /// Removes all elements.
    fn clear(&mut self);
    /// Returns a shared reference to the front element, or `None` if empty.
    fn front(&self) -> Option<&T>;
    /// Returns a shared reference to the back element, or `None` if empty.
    fn back(&self) -> Option<&T>;
    /// Returns an exclusive reference to the front element, or `None` if empty.
    fn front_mut(&mut self) -> Option<&mut T>;
    /// Returns an exclusive reference to the back element, or `None` if empty.
    fn back_mut(&mut self) -> Option<&mut T>;
}

impl<T> AnyDeque<T> for VecDeque<T> {
    fn len(&self) -> usize {
        self.len()
    }
    fn push_back(&mut self, item: T) {
        self.push_back(item);
    }
    fn push_front(&mut self, item: T) {
        self.push_front(item);
    }
    fn pop_back(&mut self) -> Option<T> {
        self.pop_back()
    }
    fn pop_front(&mut self) -> Option<T> {
        self.pop_front()
    }
    fn clear(&mut self) {
        self.clear();
    }
    fn front(&self) -> Option<&T> {
        self.front()
    }
    fn back(&self) -> Option<&T> {
        self.back()
    }
    fn front_mut(&mut self) -> Option<&mut T> {
        self.front_mut()
    }
    fn back_mut(&mut self) -> Option<&mut T> {
        self.back_mut()
    }
}

impl<T> AnyDeque<T> for RingDeque<T> {
    fn len(&self) -> usize {
        self.len
    }
    fn push_back(&mut self, item: T) {
        self.push_back(item);
    }
    fn push_front(&mut self, item: T) {
        self.push_front(item);
    }
    fn pop_back(&mut self) -> Option<T> {
        self.pop_back()
    }
    fn pop_front(&mut self) -> Option<T> {
        self.pop_front()
    }
    fn clear(&mut self) {
        self.clear();
    }
    fn front(&self) -> Option<&T> {
        self.front()
    }
    fn back(&self) -> Option<&T> {
        self.back()
    }
    fn front_mut(&mut self) -> Option<&mut T> {
        self.front_mut()
    }
    fn back_mut(&mut self) -> Option<&mut T> {
        self.back_mut()
    }
}

// ─── RingDeque ────────────────────────────────────────────────────────────────

/// A double-ended queue backed by a growable, power-of-two ring buffer.
///
/// `push_front`, `push_back`, `pop_front` and `pop_back` are amortized *O*(1);
/// `front`, `back`, `get` and `len` are *O*(1); `contains`, `to_vec` and iteration are *O*(n).
///
/// ```rust
/// use ring_deque::RingDeque;
///
/// let mut d = RingDeque::new();
/// d.push_back(1);
/// d.push_back(2);
/// d.push_front(0);
/// assert_eq!(d.to_vec(), vec![0, 1, 2]);
///
/// d.pop_back();
/// d.pop_front();
/// assert_eq!(d.front(), Some(&1));
/// assert_eq!(d.back(), Some(&1));
/// assert_eq!(d.len(), 1);
/// ```
#[derive(Clone)]
pub struct RingDeque<T> {
    buf: Box<[Option<T>]>,
    head: usize,
    len: usize,
    policy: ResizePolicy,
}

/// Allocation failure in an infallible mutator.
#[cold]
#[inline(never)]
fn alloc_failure(err: DequeError) -> ! {
    panic!("{err}")
}

impl<T> RingDeque<T> {
    /// Creates an empty deque with the default [`ResizePolicy`].
    pub fn new() -> Self {
        Self::with_policy(ResizePolicy::new())
    }

    /// Creates an empty deque using `policy`, sized at the policy's minimum capacity.
    pub fn with_policy(policy: ResizePolicy) -> Self {
        Self::with_capacity_and_policy(0, policy)
    }

    /// Creates an empty deque able to hold at least `capacity` elements without growing.
    ///
    /// # Panics
    /// Panics if the capacity overflows or the allocation fails.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_policy(capacity, ResizePolicy::new())
    }

    /// [`with_capacity`](RingDeque::with_capacity) with an explicit policy.
    pub fn with_capacity_and_policy(capacity: usize, policy: ResizePolicy) -> Self {
        match Self::try_with_capacity_and_policy(capacity, policy) {
            Ok(deque) => deque,
            Err(err) => alloc_failure(err),
        }
    }

    /// Fallible counterpart of [`with_capacity`](RingDeque::with_capacity).
    pub fn try_with_capacity(capacity: usize) -> Result<Self, DequeError> {
        Self::try_with_capacity_and_policy(capacity, ResizePolicy::new())
    }

    /// Fallible counterpart of
    /// [`with_capacity_and_policy`](RingDeque::with_capacity_and_policy).
    pub fn try_with_capacity_and_policy(
        capacity: usize,
        policy: ResizePolicy,
    ) -> Result<Self, DequeError> {
        let capacity = policy
            .initial_capacity(capacity)
            .ok_or(DequeError::CapacityOverflow)?;
        Ok(Self {
            buf: Self::try_alloc(capacity)?,
            head: 0,
            len: 0,
            policy,
        })
    }

    /// Creates a deque by draining `seq` once, appending each element at the back.
    ///
    /// The resulting front-to-back order equals the order in which `seq` yielded.
    pub fn from_sequence<I: IntoIterator<Item = T>>(seq: I) -> Self {
        let mut deque = Self::new();
        deque.append_all(seq);
        deque
    }

    /// Returns the number of elements currently in the deque.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the deque contains no elements.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of slots in the backing store.  Always a power of two.
    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Returns the resize policy this deque was created with.
    #[inline(always)]
    pub fn policy(&self) -> ResizePolicy {
        self.policy
    }

    /// Maps a logical offset from `idx` to a physical slot.
    /// Uses bitmask `(capacity - 1)`, valid because capacity is a power of two.
    #[inline(always)]
    fn wrap_add(&self, idx: usize, add: usize) -> usize {
        (idx + add) & (self.capacity() - 1)
    }

    #[inline(always)]
    fn wrap_sub(&self, idx: usize, sub: usize) -> usize {
        idx.wrapping_sub(sub) & (self.capacity() - 1)
    }

    /// Returns a shared reference to the element at logical `index`, or `None`.
    ///
    /// Logical index 0 is the front.
    #[inline(always)]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.len {
            self.buf[self.wrap_add(self.head, index)].as_ref()
        } else {
            None
        }
    }

    /// Returns an exclusive reference to the element at logical `index`, or `None`.
    #[inline(always)]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index < self.len {
            let slot = self.wrap_add(self.head, index);
            self.buf[slot].as_mut()
        } else {
            None
        }
    }

    /// Returns the front element, or `None` if empty.
    #[inline(always)]
    pub fn front(&self) -> Option<&T> {
        self.get(0)
    }

    /// Returns the back element, or `None` if empty.
    #[inline(always)]
    pub fn back(&self) -> Option<&T> {
        if self.len == 0 {
            None
        } else {
            self.get(self.len - 1)
        }
    }

    #[inline(always)]
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.get_mut(0)
    }

    #[inline(always)]
    pub fn back_mut(&mut self) -> Option<&mut T> {
        if self.len == 0 {
            None
        } else {
            self.get_mut(self.len - 1)
        }
    }

    // --- Insertion ---

    /// Appends `item` to the back of the deque, doubling the capacity first if full.
    ///
    /// # Panics
    /// Panics if the grown capacity overflows or cannot be allocated.
    #[inline(always)]
    pub fn push_back(&mut self, item: T) {
        if self.len == self.capacity() {
            self.grow();
        }
        self.write_back(item);
    }

    /// Fallible [`push_back`](RingDeque::push_back).  On error the deque is unchanged and
    /// `item` is dropped.
    pub fn try_push_back(&mut self, item: T) -> Result<(), DequeError> {
        if self.len == self.capacity() {
            self.try_grow()?;
        }
        self.write_back(item);
        Ok(())
    }

    /// Prepends `item` to the front of the deque, doubling the capacity first if full.
    ///
    /// # Panics
    /// Panics if the grown capacity overflows or cannot be allocated.
    #[inline(always)]
    pub fn push_front(&mut self, item: T) {
        if self.len == self.capacity() {
            self.grow();
        }
        self.write_front(item);
    }

    /// Fallible [`push_front`](RingDeque::push_front).
    pub fn try_push_front(&mut self, item: T) -> Result<(), DequeError> {
        if self.len == self.capacity() {
            self.try_grow()?;
        }
        self.write_front(item);
        Ok(())
    }

    #[inline(always)]
    fn write_back(&mut self, item: T) {
        debug_assert!(self.len < self.capacity());
        let tail = self.wrap_add(self.head, self.len);
        self.buf[tail] = Some(item);
        self.len += 1;
    }

    #[inline(always)]
    fn write_front(&mut self, item: T) {
        debug_assert!(self.len < self.capacity());
        self.head = self.wrap_sub(self.head, 1);
        self.buf[self.head] = Some(item);
        self.len += 1;
    }

    /// Appends every element of `seq` in the order it is yielded.
    ///
    /// `append_all([a, b, c])` on an empty deque gives `[a, b, c]`.
    pub fn append_all<I: IntoIterator<Item = T>>(&mut self, seq: I) {
        let iter = seq.into_iter();
        self.reserve(iter.size_hint().0);
        for item in iter {
            self.push_back(item);
        }
    }

    /// Prepends every element of `seq` one at a time, in the order it is yielded.
    ///
    /// Each prepend pushes the earlier ones further back, so the *last* yielded element
    /// ends up first: `prepend_all([a, b, c])` on an empty deque gives `[c, b, a]`.
    /// Reverse the input to keep its order at the front.
    pub fn prepend_all<I: IntoIterator<Item = T>>(&mut self, seq: I) {
        let iter = seq.into_iter();
        self.reserve(iter.size_hint().0);
        for item in iter {
            self.push_front(item);
        }
    }

    /// Fallible [`append_all`](RingDeque::append_all).
    ///
    /// All or nothing: if storage runs out part-way, the elements appended by this call are
    /// removed again before the error is returned.
    pub fn try_append_all<I: IntoIterator<Item = T>>(&mut self, seq: I) -> Result<(), DequeError> {
        let iter = seq.into_iter();
        self.try_reserve(iter.size_hint().0)?;
        let mut added = 0usize;
        for item in iter {
            if let Err(err) = self.try_push_back(item) {
                debug!(added, "rolling back partial append");
                for _ in 0..added {
                    self.take_back();
                }
                return Err(err);
            }
            added += 1;
        }
        Ok(())
    }

    /// Fallible [`prepend_all`](RingDeque::prepend_all), with the same all-or-nothing
    /// guarantee as [`try_append_all`](RingDeque::try_append_all).
    pub fn try_prepend_all<I: IntoIterator<Item = T>>(&mut self, seq: I) -> Result<(), DequeError> {
        let iter = seq.into_iter();
        self.try_reserve(iter.size_hint().0)?;
        let mut added = 0usize;
        for item in iter {
            if let Err(err) = self.try_push_front(item) {
                debug!(added, "rolling back partial prepend");
                for _ in 0..added {
                    self.take_front();
                }
                return Err(err);
            }
            added += 1;
        }
        Ok(())
    }

    // --- Removal ---

    /// Removes and returns the front element.  Returns `None` on an empty deque, which is
    /// not an error.
    pub fn pop_front(&mut self) -> Option<T> {
        let item = self.take_front()?;
        self.maybe_shrink();
        Some(item)
    }

    /// Removes and returns the back element, or `None` if empty.
    pub fn pop_back(&mut self) -> Option<T> {
        let item = self.take_back()?;
        self.maybe_shrink();
        Some(item)
    }

    /// Removes the front element without applying the shrink policy.
    pub(crate) fn take_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        let item = self.buf[self.head].take();
        self.head = self.wrap_add(self.head, 1);
        self.len -= 1;
        item
    }

    pub(crate) fn take_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        let tail = self.wrap_add(self.head, self.len);
        self.buf[tail].take()
    }

    /// Drops every element.  The current allocation is kept for reuse.
    pub fn clear(&mut self) {
        for i in 0..self.len {
            let slot = self.wrap_add(self.head, i);
            self.buf[slot] = None;
        }
        self.head = 0;
        self.len = 0;
    }

    // --- Queries ---

    /// Returns `true` if some element is equal to `x` by value.
    pub fn contains(&self, x: &T) -> bool
    where
        T: PartialEq,
    {
        self.iter().any(|item| item == x)
    }

    /// Returns `true` if some element is the very same instance as `x`.
    ///
    /// ```rust
    /// use std::rc::Rc;
    /// use ring_deque::RingDeque;
    ///
    /// let a = Rc::new(String::from("job"));
    /// let d = RingDeque::from_sequence([Rc::clone(&a)]);
    /// assert!(d.contains_identical(&a));
    /// assert!(!d.contains_identical(&Rc::new(String::from("job"))));
    /// assert!(d.contains(&Rc::new(String::from("job"))));
    /// ```
    pub fn contains_identical(&self, x: &T) -> bool
    where
        T: SameInstance,
    {
        self.iter().any(|item| item.same_instance(x))
    }

    /// Returns a front-to-back iterator over the elements.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.buf, self.head, self.len)
    }

    /// Returns a front-to-back iterator of exclusive references.
    pub fn iter_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut T> {
        // Slots outside the logical range are `None`, so the two halves starting at
        // `head` yield exactly the logical elements in order.
        let (wrapped, from_head) = self.buf.split_at_mut(self.head);
        from_head
            .iter_mut()
            .chain(wrapped.iter_mut())
            .filter_map(Option::as_mut)
    }

    /// Returns a freshly allocated front-to-back snapshot of the elements.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Consumes the deque, returning its elements front to back.
    pub fn into_vec(self) -> Vec<T> {
        self.into_iter().collect()
    }

    // --- Capacity management ---

    /// Ensures room for at least `additional` more elements.
    ///
    /// # Panics
    /// Panics if the capacity overflows or the allocation fails.
    pub fn reserve(&mut self, additional: usize) {
        if let Err(err) = self.try_reserve(additional) {
            alloc_failure(err);
        }
    }

    /// Fallible [`reserve`](RingDeque::reserve).
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), DequeError> {
        let needed = self
            .len
            .checked_add(additional)
            .ok_or(DequeError::CapacityOverflow)?;
        if needed <= self.capacity() {
            return Ok(());
        }
        let capacity = needed
            .checked_next_power_of_two()
            .ok_or(DequeError::CapacityOverflow)?;
        self.try_relocate(capacity)
    }

    /// Shrinks the store to the smallest power of two holding both `len` and the policy
    /// minimum.  Runs regardless of [`ResizePolicy::shrinks`].
    pub fn shrink_to_fit(&mut self) {
        let Some(target) = self.policy.initial_capacity(self.len) else {
            return;
        };
        if target < self.capacity() {
            if let Err(err) = self.try_relocate(target) {
                warn!(%err, capacity = self.capacity(), "shrink_to_fit skipped");
            }
        }
    }

    #[cold]
    #[inline(never)]
    fn grow(&mut self) {
        if let Err(err) = self.try_grow() {
            alloc_failure(err);
        }
    }

    fn try_grow(&mut self) -> Result<(), DequeError> {
        let capacity = self
            .capacity()
            .checked_mul(2)
            .ok_or(DequeError::CapacityOverflow)?;
        self.try_relocate(capacity)
    }

    fn maybe_shrink(&mut self) {
        if let Some(target) = self.policy.shrink_target(self.len, self.capacity()) {
            if let Err(err) = self.try_relocate(target) {
                warn!(%err, capacity = self.capacity(), len = self.len, "shrink skipped");
            }
        }
    }

    fn try_alloc(capacity: usize) -> Result<Box<[Option<T>]>, DequeError> {
        #[cfg(test)]
        if let Some(err) = failing_alloc::check(capacity) {
            return Err(err);
        }
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|source| DequeError::alloc(capacity, source))?;
        slots.resize_with(capacity, || None);
        Ok(slots.into_boxed_slice())
    }

    /// Moves the logical elements into a new store of `capacity` slots, laid out in
    /// `0..len`.  The old store is released only after the new one is filled.
    fn try_relocate(&mut self, capacity: usize) -> Result<(), DequeError> {
        debug_assert!(capacity.is_power_of_two() && capacity >= self.len);
        let mut buf = Self::try_alloc(capacity)?;
        for (i, slot) in buf.iter_mut().take(self.len).enumerate() {
            let from = self.wrap_add(self.head, i);
            *slot = self.buf[from].take();
        }
        let old = core::mem::replace(&mut self.buf, buf);
        self.head = 0;
        trace!(
            old_capacity = old.len(),
            new_capacity = capacity,
            len = self.len,
            "relocated deque storage"
        );
        Ok(())
    }
}

impl<T> Default for RingDeque<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for RingDeque<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for RingDeque<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}
impl<T: Eq> Eq for RingDeque<T> {}

impl<T: PartialOrd> PartialOrd for RingDeque<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.iter().partial_cmp(other.iter())
    }
}

impl<T: Ord> Ord for RingDeque<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<T: Hash> Hash for RingDeque<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len.hash(state);
        for item in self.iter() {
            item.hash(state);
        }
    }
}

impl<T> Index<usize> for RingDeque<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        match self.get(index) {
            Some(item) => item,
            None => panic!("index out of bounds: the len is {} but the index is {index}", self.len),
        }
    }
}

impl<T> IndexMut<usize> for RingDeque<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        let len = self.len;
        match self.get_mut(index) {
            Some(item) => item,
            None => panic!("index out of bounds: the len is {len} but the index is {index}"),
        }
    }
}

impl<T> Extend<T> for RingDeque<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.append_all(iter);
    }
}

impl<'a, T: Copy + 'a> Extend<&'a T> for RingDeque<T> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.append_all(iter.into_iter().copied());
    }
}

impl<T> FromIterator<T> for RingDeque<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_sequence(iter)
    }
}

impl<T> From<Vec<T>> for RingDeque<T> {
    fn from(vec: Vec<T>) -> Self {
        Self::from_sequence(vec)
    }
}

impl<T, const N: usize> From<[T; N]> for RingDeque<T> {
    fn from(arr: [T; N]) -> Self {
        Self::from_sequence(arr)
    }
}

impl<T> IntoIterator for RingDeque<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter::new(self)
    }
}

impl<'a, T> IntoIterator for &'a RingDeque<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// Thread-local switch that makes `try_alloc` fail, so rollback paths can be tested.
#[cfg(test)]
mod failing_alloc {
    use core::cell::Cell;

    use crate::error::DequeError;

    thread_local! {
        static ALLOCS_LEFT: Cell<Option<usize>> = const { Cell::new(None) };
    }

    /// Lets `allowed` more allocations succeed on this thread, then fails every later one.
    pub(super) fn fail_after(allowed: usize) {
        ALLOCS_LEFT.with(|left| left.set(Some(allowed)));
    }

    pub(super) fn reset() {
        ALLOCS_LEFT.with(|left| left.set(None));
    }

    pub(super) fn check(capacity: usize) -> Option<DequeError> {
        ALLOCS_LEFT.with(|left| match left.get() {
            None => None,
            Some(0) => {
                let source = Vec::<u8>::new().try_reserve(usize::MAX).unwrap_err();
                Some(DequeError::alloc(capacity, source))
            }
            Some(n) => {
                left.set(Some(n - 1));
                None
            }
        })
    }
}
