//! Task records stored in the heap

use std::fmt;

/// A unit of schedulable work
///
/// Only `priority` takes part in ordering. `arrival_time` and `deadline` are
/// carried along for the consumer and never compared by the heap.
///
/// Once a task is handed to a heap, its priority can only be changed through
/// the heap's own API (for example
/// [`IndexedMaxHeap::change_priority`](crate::IndexedMaxHeap::change_priority)),
/// which keeps the heap order intact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task<I, P> {
    /// Unique identifier, used as the index key
    pub id: I,
    /// Larger values are extracted first
    pub priority: P,
    /// When the task was submitted
    pub arrival_time: u64,
    /// Optional latest useful completion time
    pub deadline: Option<u64>,
}

impl<I, P> Task<I, P> {
    /// Creates a task without a deadline
    pub fn new(id: I, priority: P, arrival_time: u64) -> Self {
        Self {
            id,
            priority,
            arrival_time,
            deadline: None,
        }
    }

    /// Sets the deadline
    pub fn with_deadline(mut self, deadline: u64) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Returns true if the deadline lies strictly before `now`
    pub fn is_overdue(&self, now: u64) -> bool {
        self.deadline.is_some_and(|deadline| deadline < now)
    }
}

impl<I: fmt::Display, P: fmt::Display> fmt::Display for Task<I, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Task(id={}, prio={})", self.id, self.priority)
    }
}
