//! Caller-owned position cells
//!
//! A [`PositionCell`] is storage the caller owns and the heap keeps in sync
//! with the slot of one entry. Holding on to it lets the caller hand the
//! current slot to [`MinHeap::decrease_key`](crate::MinHeap::decrease_key)
//! in O(1) instead of scanning the heap for the entry.
//!
//! The heap only keeps a [`Weak`] reference to the cell. It never extends the
//! cell's lifetime; if the caller drops every clone of a cell, the heap simply
//! stops writing to it.

use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Slot value of a cell that is not attached to any live entry.
pub const DETACHED: usize = 0;

/// Caller-owned cell holding the current slot of a heap entry.
///
/// Clones share the same underlying cell.
///
/// # Example
///
/// ```rust
/// use position_heap::{MinHeap, PositionCell};
///
/// let mut heap = MinHeap::new();
/// let cell = PositionCell::new();
/// heap.insert("b", 2);
/// heap.insert_tracked("a", 5, &cell);
/// assert_eq!(cell.slot(), Some(2));
///
/// heap.decrease_key(cell.slot().unwrap(), 1);
/// assert_eq!(cell.slot(), Some(1));
/// ```
#[derive(Clone, Default)]
pub struct PositionCell(Rc<Cell<usize>>);

impl PositionCell {
    /// Creates a detached cell.
    pub fn new() -> Self {
        PositionCell(Rc::new(Cell::new(DETACHED)))
    }

    /// Returns the slot of the tracked entry, or `None` if it is not in a heap.
    #[inline]
    pub fn slot(&self) -> Option<usize> {
        match self.0.get() {
            DETACHED => None,
            slot => Some(slot),
        }
    }

    /// Returns true if the cell currently tracks a live entry.
    #[inline]
    pub fn is_attached(&self) -> bool {
        self.0.get() != DETACHED
    }

    pub(crate) fn downgrade(&self) -> CellRef {
        CellRef(Rc::downgrade(&self.0))
    }
}

impl PartialEq for PositionCell {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for PositionCell {}

impl fmt::Debug for PositionCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PositionCell").field(&self.slot()).finish()
    }
}

/// The heap's non-owning side of a [`PositionCell`].
#[derive(Clone)]
pub(crate) struct CellRef(Weak<Cell<usize>>);

impl CellRef {
    /// Writes `slot` into the cell if the caller still holds it.
    #[inline]
    pub(crate) fn set(&self, slot: usize) {
        if let Some(cell) = self.0.upgrade() {
            cell.set(slot);
        }
    }

    pub(crate) fn refers_to(&self, cell: &PositionCell) -> bool {
        std::ptr::eq(self.0.as_ptr(), Rc::as_ptr(&cell.0))
    }
}

impl fmt::Debug for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CellRef").field(&self.0.as_ptr()).finish()
    }
}
