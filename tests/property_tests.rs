//! Property-based tests using proptest
//!
//! These tests generate random sequences of operations and verify
//! that the heap invariants are always maintained.

use position_heap::{HeapError, MinHeap, PositionCell};
use proptest::prelude::*;

/// Heap order plus cell/slot agreement, checked through the public API
fn check_invariants(heap: &MinHeap<i32, usize>, cells: &[PositionCell]) -> Result<(), TestCaseError> {
    for slot in 2..=heap.len() {
        prop_assert!(heap.priority(slot / 2) <= heap.priority(slot));
    }
    prop_assert!(heap.len() <= heap.capacity());
    prop_assert!(heap.capacity() >= heap.initial_capacity());
    for (id, cell) in cells.iter().enumerate() {
        if let Some(slot) = cell.slot() {
            prop_assert_eq!(heap.value(slot), Some(&id));
        }
    }
    Ok(())
}

/// Inserts interleaved with valid decreases; drain must be sorted and complete
fn test_decrease_key_drain(
    initial: Vec<i32>,
    decreases: Vec<(usize, i32)>,
    capacity: usize,
) -> Result<(), TestCaseError> {
    let mut heap = MinHeap::with_capacity(capacity);
    let cells: Vec<PositionCell> = initial.iter().map(|_| PositionCell::new()).collect();
    let mut priorities = initial.clone();

    for (id, priority) in initial.iter().enumerate() {
        heap.insert_tracked(id, *priority, &cells[id]);
        check_invariants(&heap, &cells)?;
    }

    for (id, delta) in decreases {
        let id = id % cells.len();
        let slot = cells[id].slot().unwrap();
        let new_priority = priorities[id] - delta.abs();
        heap.decrease_key(slot, new_priority);
        priorities[id] = new_priority;
        check_invariants(&heap, &cells)?;
    }

    let mut drained = Vec::new();
    let mut last = i32::MIN;
    while let Ok((priority, id)) = heap.try_extract_min_entry() {
        prop_assert!(priority >= last, "popped {} after {}", priority, last);
        prop_assert_eq!(priority, priorities[id]);
        last = priority;
        drained.push(id);
        check_invariants(&heap, &cells)?;
    }

    drained.sort_unstable();
    prop_assert_eq!(drained, (0..initial.len()).collect::<Vec<_>>());
    Ok(())
}

/// An increasing "decrease" must fail and change nothing
fn test_increase_rejected(values: Vec<i32>, target: usize, bump: i32) -> Result<(), TestCaseError> {
    let mut heap = MinHeap::new();
    for (id, value) in values.iter().enumerate() {
        heap.insert(id, *value);
    }

    let slot = target % heap.len() + 1;
    let current = *heap.priority(slot).unwrap();
    let before: Vec<(usize, i32, usize)> = heap.iter().map(|(s, p, v)| (s, *p, *v)).collect();

    prop_assert_eq!(
        heap.try_decrease_key(slot, current + bump),
        Err(HeapError::InvalidKeyChange)
    );

    let after: Vec<(usize, i32, usize)> = heap.iter().map(|(s, p, v)| (s, *p, *v)).collect();
    prop_assert_eq!(before, after);
    Ok(())
}

/// Random push/pop mix: peek always equals the model minimum
fn test_push_pop_invariant(ops: Vec<(bool, i32)>) -> Result<(), TestCaseError> {
    let mut heap = MinHeap::with_capacity(1);
    let mut model: Vec<i32> = Vec::new();

    for (should_pop, value) in ops {
        if should_pop && !heap.is_empty() {
            let popped = heap.extract_min_entry().0;
            let pos = model.iter().position(|&p| p == popped).unwrap();
            prop_assert_eq!(model.iter().min().copied(), Some(popped));
            model.swap_remove(pos);
        } else {
            heap.insert(value, value);
            model.push(value);
        }

        prop_assert_eq!(heap.len(), model.len());
        prop_assert_eq!(heap.try_peek_min().ok().map(|(p, _)| *p), model.iter().min().copied());
    }
    Ok(())
}

/// Bulk loading produces the same drain as sorting
fn test_bulk_load_sorted(values: Vec<i32>) -> Result<(), TestCaseError> {
    let heap: MinHeap<i32, i32> = values.iter().map(|&v| (v, v)).collect();
    let drained: Vec<i32> = heap.into_sorted_vec().into_iter().map(|(p, _)| p).collect();
    let mut expected = values;
    expected.sort_unstable();
    prop_assert_eq!(drained, expected);
    Ok(())
}

proptest! {
    #[test]
    fn test_random_decrease_key_drain(
        initial in prop::collection::vec(-1000i32..1000, 1..120),
        decreases in prop::collection::vec((0usize..120, -50i32..50), 0..60),
        capacity in 1usize..16,
    ) {
        test_decrease_key_drain(initial, decreases, capacity)?;
    }

    #[test]
    fn test_random_increase_rejected(
        values in prop::collection::vec(-100i32..100, 1..50),
        target in 0usize..50,
        bump in 1i32..100,
    ) {
        test_increase_rejected(values, target, bump)?;
    }

    #[test]
    fn test_random_push_pop(ops in prop::collection::vec((prop::bool::ANY, -100i32..100), 0..200)) {
        test_push_pop_invariant(ops)?;
    }

    #[test]
    fn test_random_bulk_load(values in prop::collection::vec(-100i32..100, 0..200)) {
        test_bulk_load_sorted(values)?;
    }
}
