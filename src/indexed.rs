//! Indexed binary max-heap
//!
//! An array-backed binary heap of [`Task`] records, paired with a position
//! index that maps every task id to the slot currently holding it. The index
//! turns "find the task with this id" from an O(n) scan into an O(1) lookup,
//! which is what makes priority changes and removals by id O(log n).
//!
//! # Time Complexity
//!
//! | Operation         | Complexity |
//! |-------------------|------------|
//! | `build`           | O(n)       |
//! | `insert`          | O(log n)   |
//! | `peek`            | O(1)       |
//! | `extract_max`     | O(log n)   |
//! | `change_priority` | O(log n)   |
//! | `remove`          | O(log n)   |
//! | `contains`/`get`  | O(1)       |
//!
//! # Example
//!
//! ```rust
//! use indexed_task_heap::{IndexedMaxHeap, Task};
//!
//! let tasks = (0..8).zip([3, 1, 4, 1, 5, 9, 2, 6]).map(|(id, p)| Task::new(id, p, 0));
//! let mut heap: IndexedMaxHeap<u32, i32> = IndexedMaxHeap::build(tasks).unwrap();
//!
//! assert_eq!(heap.extract_max().map(|t| t.priority), Some(9));
//! assert_eq!(heap.peek().map(|t| t.priority), Some(6));
//!
//! // Boost task 1 (priority 1) above everything else
//! heap.change_priority(&1, 10).unwrap();
//! assert_eq!(heap.peek().map(|t| t.id), Some(1));
//!
//! // Cancel it again
//! assert_eq!(heap.remove(&1).map(|t| t.priority), Some(10));
//! assert_eq!(heap.remove(&1), None);
//! ```

use crate::position::{DenseIndex, HashIndex, PositionIndex};
use crate::task::Task;
use crate::traits::{HeapError, IndexedPriorityQueue, PriorityQueue};
use log::{debug, trace};
use std::cmp::Ordering;
use std::fmt;

#[inline]
fn parent(child: usize) -> usize {
    (child - 1) / 2
}

#[inline]
fn left(parent: usize) -> usize {
    2 * parent + 1
}

/// Indexed binary max-heap of tasks
///
/// The heap owns both the element slots and the index entries. Tasks are only
/// ever mutated through the heap's API, so the two can never disagree.
///
/// The index backend `X` defaults to [`HashIndex`]. See [`DenseTaskHeap`] for
/// the direct-addressed variant.
#[derive(Clone)]
pub struct IndexedMaxHeap<I, P, X = HashIndex<I>> {
    /// Implicit binary tree: children of `i` are `2i + 1` and `2i + 2`
    elements: Vec<Task<I, P>>,
    /// id → index into `elements`, one entry per queued task
    position: X,
}

/// Indexed max-heap over small dense `usize` ids with a direct-addressed index
///
/// Ids must stay below `usize::MAX`, see [`DenseIndex`].
pub type DenseTaskHeap<P> = IndexedMaxHeap<usize, P, DenseIndex>;

impl<I, P, X> IndexedMaxHeap<I, P, X>
where
    I: Clone + fmt::Debug,
    P: Ord,
    X: PositionIndex<I>,
{
    /// Creates an empty heap
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            position: X::default(),
        }
    }

    /// Creates an empty heap with room for `capacity` tasks
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elements: Vec::with_capacity(capacity),
            position: X::with_capacity(capacity),
        }
    }

    /// Builds a heap from a collection of tasks in O(n)
    ///
    /// Tasks are stored in input order, indexed in one pass, then heapified
    /// bottom-up from the last internal node.
    ///
    /// # Errors
    /// Returns [`HeapError::DuplicateId`] for the first id that appears twice.
    pub fn build<T>(tasks: T) -> Result<Self, HeapError<I>>
    where
        T: IntoIterator<Item = Task<I, P>>,
    {
        let elements: Vec<Task<I, P>> = tasks.into_iter().collect();
        let mut position = X::with_capacity(elements.len());
        for (slot, task) in elements.iter().enumerate() {
            if position.get(&task.id).is_some() {
                debug!("build rejected: duplicate task id {:?}", task.id);
                return Err(HeapError::DuplicateId(task.id.clone()));
            }
            position.set(&task.id, slot);
        }

        let mut heap = Self { elements, position };
        for slot in (0..heap.elements.len() / 2).rev() {
            heap.sift_down(slot);
        }
        debug!("built heap of {} tasks", heap.elements.len());
        Ok(heap)
    }

    /// Returns true if the heap holds no tasks
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the number of tasks in the heap
    #[inline]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns the highest-priority task without removing it
    #[inline]
    pub fn peek(&self) -> Option<&Task<I, P>> {
        self.elements.first()
    }

    /// Returns true if a task with this id is in the heap
    #[inline]
    pub fn contains(&self, id: &I) -> bool {
        self.position.get(id).is_some()
    }

    /// Returns the task with this id
    pub fn get(&self, id: &I) -> Option<&Task<I, P>> {
        self.position.get(id).map(|slot| &self.elements[slot])
    }

    /// Returns the current priority of the task with this id
    pub fn priority_of(&self, id: &I) -> Option<&P> {
        self.get(id).map(|task| &task.priority)
    }

    /// Iterates over the tasks in storage order, not priority order
    pub fn iter(&self) -> std::slice::Iter<'_, Task<I, P>> {
        self.elements.iter()
    }

    /// Inserts a task
    ///
    /// # Errors
    /// Returns [`HeapError::DuplicateId`] if a task with the same id is already
    /// in the heap. The heap is left unchanged.
    pub fn insert(&mut self, task: Task<I, P>) -> Result<(), HeapError<I>> {
        if self.contains(&task.id) {
            debug!("insert rejected: duplicate task id {:?}", task.id);
            return Err(HeapError::DuplicateId(task.id));
        }
        let slot = self.elements.len();
        self.position.set(&task.id, slot);
        self.elements.push(task);
        self.sift_up(slot);
        Ok(())
    }

    /// Inserts tasks in order, stopping at the first duplicate id
    ///
    /// Tasks inserted before the duplicate stay in the heap.
    pub fn try_extend<T>(&mut self, tasks: T) -> Result<(), HeapError<I>>
    where
        T: IntoIterator<Item = Task<I, P>>,
    {
        let tasks = tasks.into_iter();
        self.elements.reserve(tasks.size_hint().0);
        for task in tasks {
            self.insert(task)?;
        }
        Ok(())
    }

    /// Removes and returns the highest-priority task
    pub fn extract_max(&mut self) -> Option<Task<I, P>> {
        if self.elements.is_empty() {
            return None;
        }

        // swap_remove moves the last element into slot 0
        let max = self.elements.swap_remove(0);
        self.position.remove(&max.id);
        if !self.elements.is_empty() {
            self.position.set(&self.elements[0].id, 0);
            self.sift_down(0);
        }
        Some(max)
    }

    /// Sets the priority of the task with this id
    ///
    /// A higher priority moves the task toward the root, a lower one toward the
    /// leaves. An unchanged priority leaves the structure alone.
    ///
    /// # Errors
    /// Returns [`HeapError::NotFound`] if no task with this id is in the heap.
    pub fn change_priority(&mut self, id: &I, new_priority: P) -> Result<(), HeapError<I>> {
        let Some(slot) = self.position.get(id) else {
            debug!("change_priority rejected: task {:?} not found", id);
            return Err(HeapError::NotFound(id.clone()));
        };

        let old_priority = std::mem::replace(&mut self.elements[slot].priority, new_priority);
        match self.elements[slot].priority.cmp(&old_priority) {
            Ordering::Greater => self.sift_up(slot),
            Ordering::Less => self.sift_down(slot),
            Ordering::Equal => {}
        }
        Ok(())
    }

    /// Removes the task with this id
    ///
    /// Returns `None` if it is not in the heap.
    pub fn remove(&mut self, id: &I) -> Option<Task<I, P>> {
        let slot = self.position.get(id)?;
        self.position.remove(id);

        if slot == self.elements.len() - 1 {
            return self.elements.pop();
        }

        let removed = self.elements.swap_remove(slot);
        self.position.set(&self.elements[slot].id, slot);
        if self.elements[slot].priority > removed.priority {
            self.sift_up(slot);
        } else {
            self.sift_down(slot);
        }
        Some(removed)
    }

    /// Removes every task
    pub fn clear(&mut self) {
        self.elements.clear();
        self.position.clear();
    }

    /// Consumes the heap, returning its tasks by descending priority
    pub fn into_sorted_vec(mut self) -> Vec<Task<I, P>> {
        let mut sorted = Vec::with_capacity(self.elements.len());
        while let Some(task) = self.extract_max() {
            sorted.push(task);
        }
        sorted
    }

    /// Extracts tasks by descending priority as the iterator is advanced
    ///
    /// Tasks not yet yielded when the iterator is dropped stay in the heap.
    pub fn drain_sorted(&mut self) -> DrainSorted<'_, I, P, X> {
        DrainSorted { heap: self }
    }

    /// Checks the heap order and the position index against each other
    ///
    /// Returns true if every parent's priority is at least its children's,
    /// every task's recorded slot is the slot holding it, and the index has no
    /// extra entries. O(n).
    pub fn verify_invariants(&self) -> bool {
        let ordered = (1..self.elements.len())
            .all(|i| self.elements[parent(i)].priority >= self.elements[i].priority);
        let indexed = self
            .elements
            .iter()
            .enumerate()
            .all(|(slot, task)| self.position.get(&task.id) == Some(slot));
        ordered && indexed && self.position.len() == self.elements.len()
    }

    /// Swaps two slots and their index entries as a single step
    #[inline]
    fn swap(&mut self, a: usize, b: usize) {
        self.elements.swap(a, b);
        self.position.set(&self.elements[a].id, a);
        self.position.set(&self.elements[b].id, b);
    }

    /// Moves the task at `slot` up while it outranks its parent
    fn sift_up(&mut self, mut slot: usize) {
        let start = slot;
        while slot > 0 {
            let parent = parent(slot);
            if self.elements[slot].priority <= self.elements[parent].priority {
                break;
            }
            self.swap(slot, parent);
            slot = parent;
        }
        trace!("sift_up {} -> {}", start, slot);
    }

    /// Moves the task at `slot` down while a child outranks it
    fn sift_down(&mut self, mut slot: usize) {
        let start = slot;
        let len = self.elements.len();
        loop {
            let left = left(slot);
            let right = left + 1;
            let mut largest = slot;

            if left < len && self.elements[left].priority > self.elements[largest].priority {
                largest = left;
            }
            if right < len && self.elements[right].priority > self.elements[largest].priority {
                largest = right;
            }

            if largest == slot {
                break;
            }
            self.swap(slot, largest);
            slot = largest;
        }
        trace!("sift_down {} -> {}", start, slot);
    }
}

impl<I, P, X> Default for IndexedMaxHeap<I, P, X>
where
    I: Clone + fmt::Debug,
    P: Ord,
    X: PositionIndex<I>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<I: fmt::Debug, P: fmt::Debug, X> fmt::Debug for IndexedMaxHeap<I, P, X> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.elements.iter()).finish()
    }
}

impl<'a, I, P, X> IntoIterator for &'a IndexedMaxHeap<I, P, X> {
    type Item = &'a Task<I, P>;
    type IntoIter = std::slice::Iter<'a, Task<I, P>>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

/// Iterator returned by [`IndexedMaxHeap::drain_sorted`]
pub struct DrainSorted<'a, I, P, X> {
    heap: &'a mut IndexedMaxHeap<I, P, X>,
}

impl<I, P, X> Iterator for DrainSorted<'_, I, P, X>
where
    I: Clone + fmt::Debug,
    P: Ord,
    X: PositionIndex<I>,
{
    type Item = Task<I, P>;

    fn next(&mut self) -> Option<Self::Item> {
        self.heap.extract_max()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.heap.len();
        (len, Some(len))
    }
}

impl<I, P, X> ExactSizeIterator for DrainSorted<'_, I, P, X>
where
    I: Clone + fmt::Debug,
    P: Ord,
    X: PositionIndex<I>,
{
}

impl<I, P, X> PriorityQueue<I, P> for IndexedMaxHeap<I, P, X>
where
    I: Clone + fmt::Debug,
    P: Ord,
    X: PositionIndex<I>,
{
    fn is_empty(&self) -> bool {
        IndexedMaxHeap::is_empty(self)
    }

    fn len(&self) -> usize {
        IndexedMaxHeap::len(self)
    }

    fn insert(&mut self, task: Task<I, P>) -> Result<(), HeapError<I>> {
        IndexedMaxHeap::insert(self, task)
    }

    fn peek(&self) -> Option<&Task<I, P>> {
        IndexedMaxHeap::peek(self)
    }

    fn extract_max(&mut self) -> Option<Task<I, P>> {
        IndexedMaxHeap::extract_max(self)
    }

    fn iter<'a>(&'a self) -> impl Iterator<Item = &'a Task<I, P>>
    where
        I: 'a,
        P: 'a,
    {
        self.elements.iter()
    }
}

impl<I, P, X> IndexedPriorityQueue<I, P> for IndexedMaxHeap<I, P, X>
where
    I: Clone + fmt::Debug,
    P: Ord,
    X: PositionIndex<I>,
{
    fn contains(&self, id: &I) -> bool {
        IndexedMaxHeap::contains(self, id)
    }

    fn get(&self, id: &I) -> Option<&Task<I, P>> {
        IndexedMaxHeap::get(self, id)
    }

    fn change_priority(&mut self, id: &I, new_priority: P) -> Result<(), HeapError<I>> {
        IndexedMaxHeap::change_priority(self, id, new_priority)
    }

    fn remove(&mut self, id: &I) -> Option<Task<I, P>> {
        IndexedMaxHeap::remove(self, id)
    }
}
