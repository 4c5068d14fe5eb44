//! Errors returned by the fallible (`try_*`) deque operations.

use std::collections::TryReserveError;

use thiserror::Error;

/// Failure to obtain storage for a [`RingDeque`](crate::RingDeque).
///
/// Every operation that returns this error leaves the deque exactly as it was before
/// the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DequeError {
    /// The requested capacity does not fit in `usize`.
    #[error("deque capacity overflow")]
    CapacityOverflow,
    /// The allocator could not provide storage for `capacity` slots.
    #[error("failed to allocate storage for {capacity} slots: {source}")]
    AllocFailed {
        capacity: usize,
        #[source]
        source: TryReserveError,
    },
}

impl DequeError {
    pub(crate) fn alloc(capacity: usize, source: TryReserveError) -> Self {
        DequeError::AllocFailed { capacity, source }
    }
}
