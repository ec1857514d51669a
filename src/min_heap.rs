//! Binary min-heap with caller-tracked positions
//!
//! [`MinHeap`] stores `(priority, value)` entries in an array-backed binary
//! tree and always yields the entry with the smallest priority first.
//!
//! Slots are 1-based: the root is slot 1 and the children of slot `i` are
//! `2i` and `2i + 1`. An entry may be inserted together with a
//! [`PositionCell`]; the heap then keeps that cell equal to the entry's
//! current slot, so the caller can run [`MinHeap::decrease_key`] without
//! searching for the entry first.
//!
//! # Time Complexity
//!
//! | Operation      | Complexity          |
//! |----------------|---------------------|
//! | `insert`       | O(log n) amortized  |
//! | `peek_min`     | O(1)                |
//! | `extract_min`  | O(log n) amortized  |
//! | `decrease_key` | O(log n)            |
//! | bulk `extend`  | O(n)                |
//!
//! # Resizing
//!
//! The heap tracks a logical capacity separate from the number of entries.
//! Inserting into a full heap doubles the capacity. After an extraction, if
//! fewer than a third of the slots are in use and the capacity is at least
//! twice the initial capacity, the capacity is halved. The capacity never
//! drops below the initial capacity.
//!
//! # Example
//!
//! ```rust
//! use position_heap::{MinHeap, PositionCell};
//!
//! let mut heap = MinHeap::new();
//! let c = PositionCell::new();
//! heap.insert("a", 5);
//! heap.insert("b", 3);
//! heap.insert_tracked("c", 8, &c);
//! heap.insert("d", 1);
//!
//! assert_eq!(heap.extract_min(), "d");
//! heap.decrease_key(c.slot().unwrap(), 0);
//! assert_eq!(heap.extract_min(), "c");
//! assert_eq!(heap.extract_min(), "b");
//! assert_eq!(heap.extract_min(), "a");
//! assert!(heap.is_empty());
//! ```

use crate::error::HeapError;
use crate::position::{CellRef, PositionCell, DETACHED};
use log::{debug, trace};

/// Initial capacity used by [`MinHeap::new`].
pub const DEFAULT_INITIAL_CAPACITY: usize = 128;

#[derive(Debug)]
struct Entry<P, V> {
    priority: P,
    value: V,
    cell: Option<CellRef>,
}

impl<P, V> Entry<P, V> {
    /// Records `slot` in the caller's cell, if any.
    #[inline]
    fn place(&self, slot: usize) {
        if let Some(cell) = &self.cell {
            cell.set(slot);
        }
    }
}

/// An array-backed binary min-heap supporting decrease-key.
///
/// `P` is the priority type and `V` the value type. Entries with equal
/// priorities are extracted in unspecified order.
///
/// The heap is single-threaded: tracked entries hold weak references to
/// caller-owned cells, so a heap with tracked entries is neither `Send` nor
/// `Sync`.
#[derive(Debug)]
pub struct MinHeap<P, V> {
    /// Live entries; the entry at slot `s` lives at index `s - 1`
    entries: Vec<Entry<P, V>>,
    capacity: usize,
    initial_capacity: usize,
}

impl<P: Ord, V> MinHeap<P, V> {
    /// Creates an empty heap with [`DEFAULT_INITIAL_CAPACITY`].
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_INITIAL_CAPACITY)
    }

    /// Creates an empty heap whose capacity never drops below `initial_capacity`.
    ///
    /// An initial capacity of zero is treated as one.
    pub fn with_capacity(initial_capacity: usize) -> Self {
        let initial_capacity = initial_capacity.max(1);
        MinHeap {
            entries: Vec::with_capacity(initial_capacity),
            capacity: initial_capacity,
            initial_capacity,
        }
    }

    /// Returns the number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the heap holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the current logical capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the capacity the heap was constructed with.
    #[inline]
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// Inserts `value` with `priority`.
    ///
    /// # Panics
    /// Panics if the backing storage cannot grow.
    #[track_caller]
    pub fn insert(&mut self, value: V, priority: P) {
        if let Err(err) = self.try_insert(value, priority) {
            panic!("insert failed: {err}");
        }
    }

    /// Inserts `value` with `priority`, keeping `cell` equal to its slot.
    ///
    /// A cell should track one entry at a time. Once the entry is extracted
    /// (or the heap is cleared or dropped) the cell is detached again and may
    /// be reused.
    ///
    /// # Panics
    /// Panics if the backing storage cannot grow.
    #[track_caller]
    pub fn insert_tracked(&mut self, value: V, priority: P, cell: &PositionCell) {
        if let Err(err) = self.try_insert_tracked(value, priority, cell) {
            panic!("insert failed: {err}");
        }
    }

    /// Fallible form of [`insert`](Self::insert).
    ///
    /// # Errors
    /// Returns [`HeapError::CapacityOverflow`] if the storage cannot grow. The
    /// heap is left unchanged in that case.
    pub fn try_insert(&mut self, value: V, priority: P) -> Result<(), HeapError> {
        self.push_entry(Entry {
            priority,
            value,
            cell: None,
        })
    }

    /// Fallible form of [`insert_tracked`](Self::insert_tracked).
    ///
    /// # Errors
    /// Returns [`HeapError::CapacityOverflow`] if the storage cannot grow. The
    /// heap and the cell are left unchanged in that case.
    pub fn try_insert_tracked(
        &mut self,
        value: V,
        priority: P,
        cell: &PositionCell,
    ) -> Result<(), HeapError> {
        self.push_entry(Entry {
            priority,
            value,
            cell: Some(cell.downgrade()),
        })
    }

    /// Returns the minimum priority and its value.
    ///
    /// # Panics
    /// Panics with [`HeapError::EmptyHeap`] if the heap is empty.
    #[track_caller]
    pub fn peek_min(&self) -> (&P, &V) {
        match self.try_peek_min() {
            Ok(min) => min,
            Err(err) => panic!("peek_min failed: {err}"),
        }
    }

    /// Fallible form of [`peek_min`](Self::peek_min).
    pub fn try_peek_min(&self) -> Result<(&P, &V), HeapError> {
        self.entries
            .first()
            .map(|entry| (&entry.priority, &entry.value))
            .ok_or(HeapError::EmptyHeap)
    }

    /// Removes the minimum entry and returns its value.
    ///
    /// # Panics
    /// Panics with [`HeapError::EmptyHeap`] if the heap is empty.
    #[track_caller]
    pub fn extract_min(&mut self) -> V {
        self.extract_min_entry().1
    }

    /// Removes the minimum entry and returns its priority and value.
    ///
    /// # Panics
    /// Panics with [`HeapError::EmptyHeap`] if the heap is empty.
    #[track_caller]
    pub fn extract_min_entry(&mut self) -> (P, V) {
        match self.try_extract_min_entry() {
            Ok(min) => min,
            Err(err) => panic!("extract_min failed: {err}"),
        }
    }

    /// Fallible form of [`extract_min`](Self::extract_min).
    pub fn try_extract_min(&mut self) -> Result<V, HeapError> {
        self.try_extract_min_entry().map(|(_, value)| value)
    }

    /// Fallible form of [`extract_min_entry`](Self::extract_min_entry).
    pub fn try_extract_min_entry(&mut self) -> Result<(P, V), HeapError> {
        if self.entries.is_empty() {
            return Err(HeapError::EmptyHeap);
        }

        // The old last leaf takes over slot 1
        let min = self.entries.swap_remove(0);
        min.place(DETACHED);

        if !self.entries.is_empty() {
            self.sift_down(1);
        }
        self.maybe_shrink();

        Ok((min.priority, min.value))
    }

    /// Lowers the priority of the entry at `slot` to `new_priority`.
    ///
    /// An equal priority is accepted and leaves the order unchanged.
    ///
    /// # Panics
    /// Panics with [`HeapError::InvalidSlot`] if `slot` is not live, or with
    /// [`HeapError::InvalidKeyChange`] if `new_priority` is greater than the
    /// entry's current priority.
    #[track_caller]
    pub fn decrease_key(&mut self, slot: usize, new_priority: P) {
        if let Err(err) = self.try_decrease_key(slot, new_priority) {
            panic!("decrease_key failed: {err}");
        }
    }

    /// Fallible form of [`decrease_key`](Self::decrease_key).
    ///
    /// The heap is unchanged when an error is returned.
    pub fn try_decrease_key(&mut self, slot: usize, new_priority: P) -> Result<(), HeapError> {
        let index = self.index_of(slot)?;
        let entry = &mut self.entries[index];
        if new_priority > entry.priority {
            return Err(HeapError::InvalidKeyChange);
        }
        entry.priority = new_priority;
        self.sift_up(slot);
        Ok(())
    }

    /// Lowers the priority of the entry tracked by `cell`.
    ///
    /// # Panics
    /// Panics with [`HeapError::DetachedCell`] if `cell` does not track a live
    /// entry of this heap, or with [`HeapError::InvalidKeyChange`] if
    /// `new_priority` is greater than the current priority.
    #[track_caller]
    pub fn decrease_key_tracked(&mut self, cell: &PositionCell, new_priority: P) {
        if let Err(err) = self.try_decrease_key_tracked(cell, new_priority) {
            panic!("decrease_key failed: {err}");
        }
    }

    /// Fallible form of [`decrease_key_tracked`](Self::decrease_key_tracked).
    pub fn try_decrease_key_tracked(
        &mut self,
        cell: &PositionCell,
        new_priority: P,
    ) -> Result<(), HeapError> {
        let slot = cell.slot().ok_or(HeapError::DetachedCell)?;
        let attached = self
            .entries
            .get(slot - 1)
            .and_then(|entry| entry.cell.as_ref())
            .is_some_and(|tracked| tracked.refers_to(cell));
        if !attached {
            return Err(HeapError::DetachedCell);
        }
        self.try_decrease_key(slot, new_priority)
    }

    /// Returns the priority of the entry at `slot`.
    pub fn priority(&self, slot: usize) -> Option<&P> {
        let index = self.index_of(slot).ok()?;
        Some(&self.entries[index].priority)
    }

    /// Returns the value of the entry at `slot`.
    pub fn value(&self, slot: usize) -> Option<&V> {
        let index = self.index_of(slot).ok()?;
        Some(&self.entries[index].value)
    }

    /// Iterates over live entries as `(slot, priority, value)` in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &P, &V)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, entry)| (index + 1, &entry.priority, &entry.value))
    }

    /// Removes every entry and resets the capacity to the initial capacity.
    ///
    /// Cells of removed entries are detached.
    pub fn clear(&mut self) {
        trace!(
            "clearing heap: len={} capacity={} initial_capacity={}",
            self.entries.len(),
            self.capacity,
            self.initial_capacity
        );
        self.detach_all();
        self.entries = Vec::with_capacity(self.initial_capacity);
        self.capacity = self.initial_capacity;
    }

    /// Adds entries without restoring heap order per entry, then rebuilds the
    /// heap in O(n).
    ///
    /// # Panics
    /// Panics if the backing storage cannot grow.
    #[track_caller]
    pub fn extend_unordered<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = (V, P)>,
    {
        if let Err(err) = self.try_extend_unordered(items) {
            panic!("extend failed: {err}");
        }
    }

    /// Fallible form of [`extend_unordered`](Self::extend_unordered).
    ///
    /// # Errors
    /// Returns [`HeapError::CapacityOverflow`] if the storage cannot grow.
    /// Entries taken from `items` so far are dropped and the heap is left as
    /// it was before the call.
    pub fn try_extend_unordered<I>(&mut self, items: I) -> Result<(), HeapError>
    where
        I: IntoIterator<Item = (V, P)>,
    {
        self.append_unordered(items.into_iter().map(|(value, priority)| Entry {
            priority,
            value,
            cell: None,
        }))
    }

    /// Bulk form of [`insert_tracked`](Self::insert_tracked).
    ///
    /// # Panics
    /// Panics if the backing storage cannot grow.
    #[track_caller]
    pub fn extend_tracked<'a, I>(&mut self, items: I)
    where
        I: IntoIterator<Item = (V, P, &'a PositionCell)>,
    {
        if let Err(err) = self.try_extend_tracked(items) {
            panic!("extend failed: {err}");
        }
    }

    /// Fallible form of [`extend_tracked`](Self::extend_tracked).
    pub fn try_extend_tracked<'a, I>(&mut self, items: I) -> Result<(), HeapError>
    where
        I: IntoIterator<Item = (V, P, &'a PositionCell)>,
    {
        self.append_unordered(items.into_iter().map(|(value, priority, cell)| Entry {
            priority,
            value,
            cell: Some(cell.downgrade()),
        }))
    }

    /// Drains the heap into a vector of `(priority, value)` in non-decreasing
    /// priority order.
    pub fn into_sorted_vec(mut self) -> Vec<(P, V)> {
        let mut sorted = Vec::with_capacity(self.entries.len());
        while let Ok(entry) = self.try_extract_min_entry() {
            sorted.push(entry);
        }
        sorted
    }

    fn index_of(&self, slot: usize) -> Result<usize, HeapError> {
        if slot == 0 || slot > self.entries.len() {
            return Err(HeapError::InvalidSlot {
                slot,
                len: self.entries.len(),
            });
        }
        Ok(slot - 1)
    }

    #[inline]
    fn at(&self, slot: usize) -> &Entry<P, V> {
        &self.entries[slot - 1]
    }

    fn push_entry(&mut self, entry: Entry<P, V>) -> Result<(), HeapError> {
        if self.entries.len() == self.capacity {
            self.grow()?;
        }
        self.entries.push(entry);
        self.sift_up(self.entries.len());
        Ok(())
    }

    fn append_unordered<I>(&mut self, entries: I) -> Result<(), HeapError>
    where
        I: Iterator<Item = Entry<P, V>>,
    {
        let start = self.entries.len();
        for entry in entries {
            if self.entries.len() == self.capacity {
                if let Err(err) = self.grow() {
                    self.entries.truncate(start);
                    return Err(err);
                }
            }
            self.entries.push(entry);
        }

        if self.entries.len() > start {
            // Cells of new entries that make_heap leaves in place still need their slot
            for slot in start + 1..=self.entries.len() {
                self.at(slot).place(slot);
            }
            self.make_heap();
        }
        Ok(())
    }

    /// Restores heap order over the whole array in O(n).
    fn make_heap(&mut self) {
        for slot in (1..=self.entries.len() / 2).rev() {
            self.sift_down(slot);
        }
    }

    /// Moves the entry at `slot` towards the root until its parent is no
    /// greater.
    ///
    /// Each displaced parent gets one cell write; the rising entry is written
    /// once, at its final slot.
    fn sift_up(&mut self, mut slot: usize) {
        while slot > 1 {
            let parent = slot / 2;
            if self.at(parent).priority <= self.at(slot).priority {
                break;
            }
            self.entries.swap(parent - 1, slot - 1);
            self.at(slot).place(slot);
            slot = parent;
        }
        self.at(slot).place(slot);
    }

    /// Moves the entry at `slot` towards the leaves until no child is smaller.
    fn sift_down(&mut self, mut slot: usize) {
        let len = self.entries.len();
        loop {
            let left = 2 * slot;
            let right = left + 1;
            let mut smallest = slot;

            if left <= len && self.at(left).priority < self.at(smallest).priority {
                smallest = left;
            }
            if right <= len && self.at(right).priority < self.at(smallest).priority {
                smallest = right;
            }

            if smallest == slot {
                // The entry may have just been moved here by extract_min
                self.at(slot).place(slot);
                return;
            }

            self.entries.swap(slot - 1, smallest - 1);
            self.at(slot).place(slot);
            self.at(smallest).place(smallest);
            slot = smallest;
        }
    }

    fn grow(&mut self) -> Result<(), HeapError> {
        let new_capacity = self
            .capacity
            .checked_mul(2)
            .ok_or(HeapError::CapacityOverflow)?;
        self.entries
            .try_reserve_exact(new_capacity - self.entries.len())
            .map_err(|_| HeapError::CapacityOverflow)?;
        debug!(
            "growing heap: capacity {} -> {} (len={})",
            self.capacity,
            new_capacity,
            self.entries.len()
        );
        self.capacity = new_capacity;
        Ok(())
    }

    /// Halves the capacity once fewer than a third of the slots are in use.
    ///
    /// Halving only happens while the capacity is at least twice the initial
    /// capacity, so consecutive shrinks are separated by about `capacity / 6`
    /// extractions.
    fn maybe_shrink(&mut self) {
        let len = self.entries.len();
        let floor = self.initial_capacity.saturating_mul(2) - 1;
        if len < self.capacity / 3 && self.capacity > floor {
            let new_capacity = self.capacity / 2;
            debug!(
                "shrinking heap: capacity {} -> {} (len={})",
                self.capacity, new_capacity, len
            );
            self.entries.shrink_to(new_capacity);
            self.capacity = new_capacity;
        }
    }
}

impl<P: Ord, V> Default for MinHeap<P, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, V> MinHeap<P, V> {
    fn detach_all(&self) {
        for entry in &self.entries {
            entry.place(DETACHED);
        }
    }
}

impl<P, V> Drop for MinHeap<P, V> {
    fn drop(&mut self) {
        self.detach_all();
    }
}

impl<P: Ord, V> Extend<(V, P)> for MinHeap<P, V> {
    fn extend<I: IntoIterator<Item = (V, P)>>(&mut self, iter: I) {
        self.extend_unordered(iter);
    }
}

impl<P: Ord, V> FromIterator<(V, P)> for MinHeap<P, V> {
    fn from_iter<I: IntoIterator<Item = (V, P)>>(iter: I) -> Self {
        let mut heap = MinHeap::new();
        heap.extend_unordered(iter);
        heap
    }
}
