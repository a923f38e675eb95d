//! Pluggable backends for the id → slot position index
//!
//! An [`IndexedMaxHeap`](crate::IndexedMaxHeap) keeps, next to its element
//! array, a mapping from every task id to the array slot that currently holds
//! it. This module abstracts over how that mapping is stored:
//!
//! - [`HashIndex`]: Default, works for any `Hash + Eq` id, backed by `FxHashMap`
//! - [`DenseIndex`]: Direct-addressed `Vec<Option<usize>>` for small dense `usize` ids
//!
//! # Example
//!
//! ```rust
//! use indexed_task_heap::{DenseTaskHeap, IndexedMaxHeap, Task};
//!
//! // Any hashable id
//! let mut by_name: IndexedMaxHeap<&str, u8> = IndexedMaxHeap::new();
//! by_name.insert(Task::new("compile", 2, 0)).unwrap();
//!
//! // Ids known to be small integers
//! let mut by_slot: DenseTaskHeap<u8> = DenseTaskHeap::new();
//! by_slot.insert(Task::new(3, 2, 0)).unwrap();
//! ```

use rustc_hash::FxHashMap;
use std::hash::Hash;

/// Trait for position index backends
///
/// Implementations only store the mapping. Keeping it consistent with the
/// element array is the heap's job: every swap in the array is paired with two
/// `set` calls before any other operation observes the heap.
pub trait PositionIndex<I>: Default {
    /// Creates an empty index sized for roughly `capacity` ids
    fn with_capacity(capacity: usize) -> Self;

    /// Returns the slot recorded for `id`
    fn get(&self, id: &I) -> Option<usize>;

    /// Records `slot` for `id`, replacing any previous entry
    fn set(&mut self, id: &I, slot: usize);

    /// Removes the entry for `id`, returning the slot it held
    fn remove(&mut self, id: &I) -> Option<usize>;

    /// Number of ids with an entry
    fn len(&self) -> usize;

    /// Returns true if no id has an entry
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every entry
    fn clear(&mut self);
}

// ============================================================================
// HashIndex - default implementation
// ============================================================================

/// Hash-map position index (default)
///
/// Uses FxHash, which is fast for the small integer and string ids typical of
/// schedulers. Ids are cloned into the map on insertion.
#[derive(Debug, Clone)]
pub struct HashIndex<I> {
    slots: FxHashMap<I, usize>,
}

impl<I> Default for HashIndex<I> {
    fn default() -> Self {
        Self {
            slots: FxHashMap::default(),
        }
    }
}

impl<I: Hash + Eq + Clone> PositionIndex<I> for HashIndex<I> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    #[inline]
    fn get(&self, id: &I) -> Option<usize> {
        self.slots.get(id).copied()
    }

    #[inline]
    fn set(&mut self, id: &I, slot: usize) {
        match self.slots.get_mut(id) {
            Some(existing) => *existing = slot,
            None => {
                self.slots.insert(id.clone(), slot);
            }
        }
    }

    #[inline]
    fn remove(&mut self, id: &I) -> Option<usize> {
        self.slots.remove(id)
    }

    fn len(&self) -> usize {
        self.slots.len()
    }

    fn clear(&mut self) {
        self.slots.clear();
    }
}

// ============================================================================
// DenseIndex - direct addressing
// ============================================================================

/// Direct-addressed position index for `usize` ids
///
/// Slot lookups are a single bounds-checked array read. The table grows to
/// `max id + 1` entries, so this backend only makes sense when ids are small
/// and dense (for example, indices into a task table owned by the caller).
///
/// # Panics
/// [`set`](PositionIndex::set) panics for the id `usize::MAX`, whose table
/// length does not fit in a `usize`, and aborts like any `Vec` growth if the
/// table cannot be allocated.
#[derive(Debug, Clone, Default)]
pub struct DenseIndex {
    slots: Vec<Option<usize>>,
    occupied: usize,
}

impl PositionIndex<usize> for DenseIndex {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            occupied: 0,
        }
    }

    #[inline]
    fn get(&self, id: &usize) -> Option<usize> {
        self.slots.get(*id).copied().flatten()
    }

    fn set(&mut self, id: &usize, slot: usize) {
        if *id >= self.slots.len() {
            let Some(len) = id.checked_add(1) else {
                panic!("DenseIndex cannot address id {}", id);
            };
            self.slots.resize(len, None);
        }
        if self.slots[*id].replace(slot).is_none() {
            self.occupied += 1;
        }
    }

    fn remove(&mut self, id: &usize) -> Option<usize> {
        let removed = self.slots.get_mut(*id)?.take();
        if removed.is_some() {
            self.occupied -= 1;
        }
        removed
    }

    fn len(&self) -> usize {
        self.occupied
    }

    fn clear(&mut self) {
        self.slots.clear();
        self.occupied = 0;
    }
}
