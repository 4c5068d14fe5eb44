//! # Ring Deque
//!
//! A growable double-ended queue backed by a single power-of-two ring buffer.
//!
//! [`RingDeque`] offers amortized *O*(1) insertion and removal at both ends, *O*(1)
//! access to either endpoint, and a front-to-back snapshot of its contents.  It is meant
//! as a building block for stacks, FIFO queues, sliding windows and work buffers.
//!
//! ## Key Features
//!
//! * **Doubling growth:** a full deque doubles its capacity before the next insertion.
//! * **Optional shrink:** once a removal leaves the deque at most a quarter full, the
//!   capacity is halved, never below the configured minimum.  See [`ResizePolicy`].
//! * **Relinearization:** every resize copies the elements into slots `0..len` of the new
//!   store, so wrap-around is removed.
//! * **No stale values:** removed elements are taken out of their slots immediately.
//! * **Two kinds of membership:** [`RingDeque::contains`] compares by value,
//!   [`RingDeque::contains_identical`] by identity (see [`SameInstance`]).
//! * **Fallible variants:** every allocating operation has a `try_*` form returning
//!   [`DequeError`] and leaving the deque unchanged on failure.
//!
//! ## Bulk insertion order
//!
//! `append_all` keeps the order of its input.  `prepend_all` prepends one element at a
//! time, so the input comes out reversed at the front:
//!
//! ```rust
//! use ring_deque::RingDeque;
//!
//! let mut d = RingDeque::from_sequence(["x"]);
//! d.append_all(["a", "b", "c"]);
//! d.prepend_all(["a", "b", "c"]);
//! assert_eq!(d.to_vec(), vec!["c", "b", "a", "x", "a", "b", "c"]);
//! ```
//!
//! ## Thread safety
//!
//! The deque does no locking of its own.  Wrap it in a `Mutex` (or keep it owned by a
//! single task) when several threads need to mutate it.

// --- Module Declarations ---

pub mod deque;
pub mod error;
pub mod identity;
pub mod iter;
pub mod policy;

// --- Re-exports ---

pub use deque::{AnyDeque, RingDeque};
pub use error::DequeError;
pub use identity::SameInstance;
pub use iter::{IntoIter, Iter};
pub use policy::ResizePolicy;
