//! Identity equality, used by [`RingDeque::contains_identical`](crate::RingDeque::contains_identical).
//!
//! Value equality comes from `PartialEq`. Identity asks a different question: do two
//! handles refer to the *same* object in memory? Only handle-like types can answer it,
//! so the trait is implemented for references and the std smart pointers.

use std::rc::Rc;
use std::sync::Arc;

/// Types whose values point at an object that can be compared by address.
pub trait SameInstance {
    /// Returns `true` if `self` and `other` refer to the same object.
    fn same_instance(&self, other: &Self) -> bool;
}

impl<T: ?Sized> SameInstance for &T {
    #[inline]
    fn same_instance(&self, other: &Self) -> bool {
        core::ptr::eq(*self, *other)
    }
}

impl<T: ?Sized> SameInstance for &mut T {
    #[inline]
    fn same_instance(&self, other: &Self) -> bool {
        core::ptr::eq::<T>(&**self, &**other)
    }
}

impl<T: ?Sized> SameInstance for Rc<T> {
    #[inline]
    fn same_instance(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}

impl<T: ?Sized> SameInstance for Arc<T> {
    #[inline]
    fn same_instance(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

// Two live boxes never share an allocation, so this only holds when `other` is the
// very box stored in the deque (or a zero-sized value).
impl<T: ?Sized> SameInstance for Box<T> {
    #[inline]
    fn same_instance(&self, other: &Self) -> bool {
        core::ptr::eq::<T>(&**self, &**other)
    }
}
