//! Error type for heap operations

use std::fmt;

/// Error type for heap operations
///
/// Every variant except [`HeapError::CapacityOverflow`] is a contract
/// violation by the caller. The panicking methods on
/// [`MinHeap`](crate::MinHeap) abort with this error's `Display` text; the
/// `try_*` methods return it and leave the heap unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// `peek_min` or `extract_min` on a heap with no entries
    EmptyHeap,
    /// `decrease_key` was given a priority greater than the current one
    InvalidKeyChange,
    /// The slot does not name a live entry
    InvalidSlot {
        /// The slot that was requested
        slot: usize,
        /// Number of live entries at the time of the call
        len: usize,
    },
    /// The position cell is not attached to the entry it points at
    DetachedCell,
    /// Growing the backing storage overflowed or the allocator refused
    CapacityOverflow,
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::EmptyHeap => write!(f, "heap is empty"),
            HeapError::InvalidKeyChange => {
                write!(f, "new priority is greater than current priority")
            }
            HeapError::InvalidSlot { slot, len } => {
                write!(f, "slot {slot} is not a live slot (heap has {len} entries)")
            }
            HeapError::DetachedCell => {
                write!(f, "position cell is not attached to a live entry")
            }
            HeapError::CapacityOverflow => write!(f, "heap capacity overflow"),
        }
    }
}

impl std::error::Error for HeapError {}
