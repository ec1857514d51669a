//! Binary min-heap with decrease-key for graph algorithms
//!
//! This crate provides [`MinHeap`], an array-backed binary min-heap offering
//! exactly the operations incremental graph algorithms need: insert,
//! peek-minimum, extract-minimum and decrease-key.
//!
//! Decrease-key needs the slot of the entry to lower. Rather than scanning
//! for it, callers insert entries together with a [`PositionCell`] that the
//! heap keeps equal to the entry's slot.
//!
//! # Features
//!
//! - **MinHeap**: O(log n) insert, extract-min and decrease-key; O(1) peek;
//!   O(n) bulk loading
//! - **PositionCell**: caller-owned, weakly referenced slot tracking
//! - **Pathfinding**: Dijkstra and A* built on decrease-key
//!
//! # Example
//!
//! ```rust
//! use position_heap::{MinHeap, PositionCell};
//!
//! let mut heap = MinHeap::new();
//! let cell = PositionCell::new();
//! heap.insert("item2", 3);
//! heap.insert_tracked("item1", 5, &cell);
//! heap.decrease_key_tracked(&cell, 1);
//! assert_eq!(heap.peek_min(), (&1, &"item1"));
//! ```

pub mod error;
pub mod min_heap;
pub mod pathfinding;
pub mod position;

pub use error::HeapError;
pub use min_heap::{MinHeap, DEFAULT_INITIAL_CAPACITY};
pub use position::PositionCell;
