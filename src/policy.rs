//! Resize configuration for [`RingDeque`](crate::RingDeque).

/// Controls how small a [`RingDeque`](crate::RingDeque) may get and whether it gives
/// memory back after mass removal.
///
/// Capacities are always powers of two, so `min_capacity` is rounded up on construction.
///
/// ```rust
/// use ring_deque::{ResizePolicy, RingDeque};
///
/// let policy = ResizePolicy::new().min_capacity(20).shrink(false);
/// assert_eq!(policy.get_min_capacity(), 32);
///
/// let d: RingDeque<u8> = RingDeque::with_policy(policy);
/// assert_eq!(d.capacity(), 32);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResizePolicy {
    min_capacity: usize,
    shrink: bool,
}

impl ResizePolicy {
    /// Capacity of a deque created with [`RingDeque::new`](crate::RingDeque::new).
    pub const DEFAULT_MIN_CAPACITY: usize = 8;

    /// Shrinking is considered once `len <= capacity / SHRINK_DIVISOR`.
    pub const SHRINK_DIVISOR: usize = 4;

    pub const fn new() -> Self {
        Self {
            min_capacity: Self::DEFAULT_MIN_CAPACITY,
            shrink: true,
        }
    }

    /// Sets the floor below which the backing store never shrinks.
    ///
    /// # Panics
    /// Panics if no power of two `>= min` fits in `usize`.
    pub fn min_capacity(mut self, min: usize) -> Self {
        self.min_capacity = match min.max(1).checked_next_power_of_two() {
            Some(capacity) => capacity,
            None => panic!("min_capacity {min} has no power-of-two capacity in usize"),
        };
        self
    }

    /// Enables or disables the quarter-full shrink rule.
    pub const fn shrink(mut self, enabled: bool) -> Self {
        self.shrink = enabled;
        self
    }

    #[inline(always)]
    pub const fn get_min_capacity(&self) -> usize {
        self.min_capacity
    }

    #[inline(always)]
    pub const fn shrinks(&self) -> bool {
        self.shrink
    }

    /// Capacity to allocate for a deque that must hold at least `requested` elements.
    ///
    /// Returns `None` if the rounded-up capacity overflows `usize`.
    pub fn initial_capacity(&self, requested: usize) -> Option<usize> {
        requested.max(self.min_capacity).checked_next_power_of_two()
    }

    /// Target capacity after removing down to `len` from `capacity`, or `None` if the
    /// store should be left alone.
    pub(crate) fn shrink_target(&self, len: usize, capacity: usize) -> Option<usize> {
        if self.shrink
            && capacity > self.min_capacity
            && len <= capacity / Self::SHRINK_DIVISOR
        {
            Some((capacity / 2).max(self.min_capacity).max(1))
        } else {
            None
        }
    }
}

impl Default for ResizePolicy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_defaults() {
        let p = ResizePolicy::default();
        assert_eq!(p.get_min_capacity(), 8);
        assert!(p.shrinks());
        assert_eq!(p, ResizePolicy::new());
    }

    #[test]
    fn test_policy_min_capacity_rounds_up() {
        assert_eq!(ResizePolicy::new().min_capacity(0).get_min_capacity(), 1);
        assert_eq!(ResizePolicy::new().min_capacity(1).get_min_capacity(), 1);
        assert_eq!(ResizePolicy::new().min_capacity(5).get_min_capacity(), 8);
        assert_eq!(ResizePolicy::new().min_capacity(64).get_min_capacity(), 64);
    }

    #[test]
    fn test_policy_initial_capacity() {
        let p = ResizePolicy::new();
        assert_eq!(p.initial_capacity(0), Some(8));
        assert_eq!(p.initial_capacity(9), Some(16));
        assert_eq!(p.initial_capacity(usize::MAX), None);
    }

    #[test]
    fn test_policy_shrink_target() {
        let p = ResizePolicy::new();
        assert_eq!(p.shrink_target(8, 64), Some(32));
        assert_eq!(p.shrink_target(16, 64), Some(32));
        assert_eq!(p.shrink_target(17, 64), None);
        // never below the minimum
        assert_eq!(p.shrink_target(0, 8), None);
        assert_eq!(p.shrink_target(0, 16), Some(8));
        assert_eq!(p.shrink(false).shrink_target(0, 64), None);
    }

    #[test]
    fn test_policy_shrink_target_never_zero() {
        let p = ResizePolicy::new().min_capacity(1);
        assert_eq!(p.shrink_target(0, 2), Some(1));
        assert_eq!(p.shrink_target(0, 1), None);
    }

    #[test]
    #[should_panic(expected = "no power-of-two capacity")]
    fn test_policy_min_capacity_overflow_panics() {
        let _ = ResizePolicy::new().min_capacity(usize::MAX);
    }

    #[test]
    #[should_panic(expected = "no power-of-two capacity")]
    fn test_policy_min_capacity_just_above_largest_power_panics() {
        let _ = ResizePolicy::new().min_capacity((usize::MAX >> 1) + 2);
    }
}
