use std::alloc::Layout;
use std::collections::TryReserveError;
use thiserror::Error;

/// Failures reported by the fallible queue operations.
///
/// None of them leaves the queue in a partially modified state: an insert that
/// fails has released everything it allocated before returning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// The operation was invoked without a queue.
    #[error("no queue to operate on")]
    Absent,
    /// A node (the ghost node or an element node) could not be allocated.
    #[error("failed to allocate a node of {} bytes", .layout.size())]
    Alloc { layout: Layout },
    /// The payload copy could not be allocated.
    #[error("failed to allocate a payload of {len} bytes")]
    Payload {
        len: usize,
        #[source]
        source: TryReserveError,
    },
}
