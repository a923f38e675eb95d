//! Common traits for task queues
//!
//! This module provides a two-tier trait hierarchy:
//!
//! - [`PriorityQueue`]: insert, peek and extract the highest-priority task
//! - [`IndexedPriorityQueue`]: adds operations that address a task by its id
//!
//! Unlike the standard `BinaryHeap`, these queues store [`Task`] records and
//! order them by their `priority` field only. Larger priorities come out first.

use crate::task::Task;
use std::fmt;

/// Error type for id-addressed heap operations
///
/// Both variants are programming errors on the caller's side. An empty heap is
/// not an error and is reported as `None` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError<I> {
    /// No task with this id is currently in the heap
    NotFound(I),
    /// A task with this id is already in the heap
    DuplicateId(I),
}

impl<I> HeapError<I> {
    /// Returns the id the failed operation referred to
    pub fn id(&self) -> &I {
        match self {
            HeapError::NotFound(id) | HeapError::DuplicateId(id) => id,
        }
    }
}

impl<I: fmt::Debug> fmt::Display for HeapError<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::NotFound(id) => {
                write!(f, "task {:?} not found", id)
            }
            HeapError::DuplicateId(id) => {
                write!(f, "task {:?} is already in the heap", id)
            }
        }
    }
}

impl<I: fmt::Debug> std::error::Error for HeapError<I> {}

/// Base trait for max-priority task queues
///
/// # Example
///
/// ```rust
/// use indexed_task_heap::{IndexedMaxHeap, PriorityQueue, Task};
///
/// fn drain_ids<Q: PriorityQueue<u32, i32>>(queue: &mut Q) -> Vec<u32> {
///     let mut ids = Vec::with_capacity(queue.len());
///     while let Some(task) = queue.extract_max() {
///         ids.push(task.id);
///     }
///     ids
/// }
///
/// let mut queue: IndexedMaxHeap<u32, i32> = IndexedMaxHeap::new();
/// queue.insert(Task::new(1, 3, 0)).unwrap();
/// queue.insert(Task::new(2, 8, 1)).unwrap();
///
/// assert_eq!(queue.peek().map(|t| t.id), Some(2));
/// assert_eq!(drain_ids(&mut queue), vec![2, 1]);
/// ```
pub trait PriorityQueue<I, P: Ord> {
    /// Returns true if the queue holds no tasks
    fn is_empty(&self) -> bool;

    /// Returns the number of tasks in the queue
    fn len(&self) -> usize;

    /// Adds a task to the queue
    ///
    /// # Errors
    /// Returns [`HeapError::DuplicateId`] if a task with the same id is
    /// already queued. The queue is left unchanged.
    ///
    /// # Time Complexity
    /// O(log n)
    fn insert(&mut self, task: Task<I, P>) -> Result<(), HeapError<I>>;

    /// Returns the highest-priority task without removing it
    ///
    /// # Time Complexity
    /// O(1)
    fn peek(&self) -> Option<&Task<I, P>>;

    /// Removes and returns the highest-priority task
    ///
    /// # Time Complexity
    /// O(log n)
    fn extract_max(&mut self) -> Option<Task<I, P>>;

    /// Iterates over the queued tasks in no particular order
    fn iter<'a>(&'a self) -> impl Iterator<Item = &'a Task<I, P>>
    where
        I: 'a,
        P: 'a;
}

/// Extended queue trait with id-addressed operations
///
/// These are the operations a scheduler needs to react to external events,
/// such as a priority boost or a cancellation, that name a task by its id.
///
/// Priority changes are bidirectional: there is no separate
/// `increase`/`decrease` pair that rejects a change in the "wrong" direction.
pub trait IndexedPriorityQueue<I, P: Ord>: PriorityQueue<I, P> {
    /// Returns true if a task with this id is queued
    fn contains(&self, id: &I) -> bool;

    /// Returns the queued task with this id
    fn get(&self, id: &I) -> Option<&Task<I, P>>;

    /// Sets the priority of a queued task and restores heap order
    ///
    /// # Errors
    /// Returns [`HeapError::NotFound`] if no task with this id is queued.
    ///
    /// # Time Complexity
    /// O(log n)
    fn change_priority(&mut self, id: &I, new_priority: P) -> Result<(), HeapError<I>>;

    /// Removes the task with this id, if it is queued
    ///
    /// Absence is an ordinary outcome and yields `None`.
    ///
    /// # Time Complexity
    /// O(log n)
    fn remove(&mut self, id: &I) -> Option<Task<I, P>>;
}
