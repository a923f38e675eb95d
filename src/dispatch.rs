//! Scheduler dispatch loop over an indexed priority queue
//!
//! A [`Dispatcher`] hands out the highest-priority pending task on each call
//! to [`Dispatcher::next`] and reacts to external events that name a task by
//! id: priority boosts ([`Dispatcher::reprioritize`]) and cancellations
//! ([`Dispatcher::cancel`]). It keeps a logical clock that stamps arrival
//! times and decides which deadlines have passed.
//!
//! The dispatcher is generic over any [`IndexedPriorityQueue`], so the
//! default hash-indexed heap can be swapped for a dense one or another
//! implementation entirely.
//!
//! # Example
//!
//! ```rust
//! use indexed_task_heap::dispatch::Dispatcher;
//!
//! let mut dispatcher: Dispatcher<i32> = Dispatcher::new();
//! let report = dispatcher.submit(1, None).unwrap();
//! let backup = dispatcher.submit(5, Some(10)).unwrap();
//! let _cleanup = dispatcher.submit(3, None).unwrap();
//!
//! // An operator escalates the report
//! dispatcher.reprioritize(report, 9).unwrap();
//! assert_eq!(dispatcher.next().map(|t| t.id), Some(report));
//!
//! // The backup window closes before it runs
//! dispatcher.advance(11);
//! let shed = dispatcher.shed_overdue();
//! assert_eq!(shed.len(), 1);
//! assert_eq!(shed[0].id, backup);
//! ```

use crate::indexed::IndexedMaxHeap;
use crate::task::Task;
use crate::traits::{HeapError, IndexedPriorityQueue};
use log::debug;
use std::marker::PhantomData;

/// Dispatcher that owns a task queue and a logical clock
///
/// Ids handed out by [`submit`](Self::submit) are increasing integers starting
/// at zero. Tasks added with [`submit_task`](Self::submit_task) bring their own
/// id and must not collide with queued ones.
///
/// Once `u64::MAX` has been handed out no further ids can be generated, but
/// `submit_task` keeps working.
pub struct Dispatcher<P: Ord, Q = IndexedMaxHeap<u64, P>>
where
    Q: IndexedPriorityQueue<u64, P>,
{
    queue: Q,
    clock: u64,
    /// `None` once the id space is used up
    next_id: Option<u64>,
    _phantom: PhantomData<P>,
}

impl<P: Ord, Q> Dispatcher<P, Q>
where
    Q: IndexedPriorityQueue<u64, P> + Default,
{
    /// Creates an idle dispatcher at time zero
    pub fn new() -> Self {
        Self::with_queue(Q::default())
    }
}

impl<P: Ord, Q> Dispatcher<P, Q>
where
    Q: IndexedPriorityQueue<u64, P>,
{
    /// Creates a dispatcher around an existing queue
    ///
    /// Generated ids start above the largest id already in `queue`.
    pub fn with_queue(queue: Q) -> Self {
        let next_id = match queue.iter().map(|task| task.id).max() {
            Some(largest) => largest.checked_add(1),
            None => Some(0),
        };
        Self {
            queue,
            clock: 0,
            next_id,
            _phantom: PhantomData,
        }
    }

    /// Current logical time
    pub fn now(&self) -> u64 {
        self.clock
    }

    /// Moves the logical clock forward
    pub fn advance(&mut self, ticks: u64) {
        self.clock = self.clock.saturating_add(ticks);
    }

    /// Number of tasks waiting to be dispatched
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if no task is waiting
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Read-only access to the underlying queue
    pub fn queue(&self) -> &Q {
        &self.queue
    }

    /// Queues a new task stamped with the current time and returns its id
    ///
    /// # Errors
    /// Returns [`HeapError::DuplicateId`] carrying the last id tried when every
    /// id up to `u64::MAX` is taken. The dispatcher is left unchanged.
    pub fn submit(
        &mut self,
        priority: P,
        deadline: Option<u64>,
    ) -> Result<u64, HeapError<u64>> {
        let Some(mut id) = self.next_id else {
            debug!("submit: id space exhausted");
            return Err(HeapError::DuplicateId(u64::MAX));
        };
        // skip ids claimed by submit_task
        while self.queue.contains(&id) {
            id = match id.checked_add(1) {
                Some(next) => next,
                None => {
                    debug!("submit: id space exhausted");
                    return Err(HeapError::DuplicateId(id));
                }
            };
        }

        let task = Task {
            id,
            priority,
            arrival_time: self.clock,
            deadline,
        };
        self.queue.insert(task)?;
        self.next_id = id.checked_add(1);
        Ok(id)
    }

    /// Queues a caller-built task as is
    ///
    /// # Errors
    /// Returns [`HeapError::DuplicateId`] if its id is already queued.
    pub fn submit_task(&mut self, task: Task<u64, P>) -> Result<(), HeapError<u64>> {
        self.queue.insert(task)
    }

    /// Changes the priority of a queued task
    ///
    /// # Errors
    /// Returns [`HeapError::NotFound`] if the task is not queued, for example
    /// because it was already dispatched or cancelled.
    pub fn reprioritize(&mut self, id: u64, priority: P) -> Result<(), HeapError<u64>> {
        self.queue.change_priority(&id, priority)
    }

    /// Withdraws a queued task
    ///
    /// Cancelling a task that already left the queue is not an error.
    pub fn cancel(&mut self, id: u64) -> Option<Task<u64, P>> {
        let cancelled = self.queue.remove(&id);
        if cancelled.is_none() {
            debug!("cancel: task {} is not queued", id);
        }
        cancelled
    }

    /// Takes the highest-priority task off the queue
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<Task<u64, P>> {
        self.queue.extract_max()
    }

    /// Removes every queued task whose deadline lies strictly before `now()`
    ///
    /// Returned tasks are ordered by their id.
    pub fn shed_overdue(&mut self) -> Vec<Task<u64, P>> {
        let now = self.clock;
        let mut overdue: Vec<u64> = self
            .queue
            .iter()
            .filter(|task| task.is_overdue(now))
            .map(|task| task.id)
            .collect();
        overdue.sort_unstable();

        let shed: Vec<Task<u64, P>> = overdue
            .into_iter()
            .filter_map(|id| self.queue.remove(&id))
            .collect();
        if !shed.is_empty() {
            debug!("shed {} overdue tasks at t={}", shed.len(), now);
        }
        shed
    }
}

impl<P: Ord, Q> Default for Dispatcher<P, Q>
where
    Q: IndexedPriorityQueue<u64, P> + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_order_and_arrival_times() {
        let mut dispatcher: Dispatcher<u32> = Dispatcher::new();
        let low = dispatcher.submit(1, None).unwrap();
        dispatcher.advance(5);
        let high = dispatcher.submit(10, None).unwrap();

        assert_eq!(dispatcher.pending(), 2);
        let first = dispatcher.next().unwrap();
        assert_eq!((first.id, first.arrival_time), (high, 5));
        let second = dispatcher.next().unwrap();
        assert_eq!((second.id, second.arrival_time), (low, 0));
        assert!(dispatcher.is_idle());
        assert!(dispatcher.next().is_none());
    }

    #[test]
    fn test_reprioritize_and_cancel() {
        let mut dispatcher: Dispatcher<i64> = Dispatcher::new();
        let a = dispatcher.submit(5, None).unwrap();
        let b = dispatcher.submit(3, None).unwrap();

        dispatcher.reprioritize(b, 8).unwrap();
        assert_eq!(dispatcher.queue().peek().map(|t| t.id), Some(b));

        assert_eq!(dispatcher.cancel(b).map(|t| t.priority), Some(8));
        assert!(dispatcher.cancel(b).is_none());
        assert_eq!(dispatcher.reprioritize(b, 1), Err(HeapError::NotFound(b)));

        assert_eq!(dispatcher.next().map(|t| t.id), Some(a));
    }

    #[test]
    fn test_submit_skips_ids_taken_by_submit_task() {
        let mut dispatcher: Dispatcher<u8> = Dispatcher::new();
        dispatcher.submit_task(Task::new(0, 1, 0)).unwrap();
        dispatcher.submit_task(Task::new(1, 1, 0)).unwrap();
        assert_eq!(
            dispatcher.submit_task(Task::new(1, 2, 0)),
            Err(HeapError::DuplicateId(1))
        );

        let id = dispatcher.submit(4, None).unwrap();
        assert_eq!(id, 2);
        assert_eq!(dispatcher.pending(), 3);
    }

    #[test]
    fn test_with_queue_continues_after_existing_ids() {
        let queue: IndexedMaxHeap<u64, i32> =
            IndexedMaxHeap::build(vec![Task::new(7, 1, 0), Task::new(3, 2, 0)]).unwrap();
        let mut dispatcher = Dispatcher::with_queue(queue);
        assert_eq!(dispatcher.submit(0, None), Ok(8));
    }

    #[test]
    fn test_submit_after_largest_id_is_exhausted() {
        let queue: IndexedMaxHeap<u64, i32> =
            IndexedMaxHeap::build(vec![Task::new(u64::MAX, 1, 0)]).unwrap();
        let mut dispatcher = Dispatcher::with_queue(queue);

        assert_eq!(dispatcher.submit(2, None), Err(HeapError::DuplicateId(u64::MAX)));
        assert_eq!(dispatcher.pending(), 1);

        // caller-built ids are still accepted
        dispatcher.submit_task(Task::new(4, 3, 0)).unwrap();
        assert_eq!(dispatcher.next().map(|t| t.id), Some(4));
    }

    #[test]
    fn test_submit_hands_out_largest_id_once() {
        let queue: IndexedMaxHeap<u64, i32> =
            IndexedMaxHeap::build(vec![Task::new(u64::MAX - 1, 1, 0)]).unwrap();
        let mut dispatcher = Dispatcher::with_queue(queue);

        assert_eq!(dispatcher.submit(2, None), Ok(u64::MAX));
        assert_eq!(dispatcher.submit(3, None), Err(HeapError::DuplicateId(u64::MAX)));
        assert_eq!(dispatcher.pending(), 2);
    }

    #[test]
    fn test_submit_skip_runs_off_the_end() {
        let queue: IndexedMaxHeap<u64, i32> =
            IndexedMaxHeap::build(vec![Task::new(u64::MAX - 1, 1, 0)]).unwrap();
        let mut dispatcher = Dispatcher::with_queue(queue);
        dispatcher.submit_task(Task::new(u64::MAX, 5, 0)).unwrap();

        assert_eq!(dispatcher.submit(2, None), Err(HeapError::DuplicateId(u64::MAX)));
        assert_eq!(dispatcher.pending(), 2);
        assert!(dispatcher.queue().verify_invariants());
    }

    #[test]
    fn test_shed_overdue() {
        let mut dispatcher: Dispatcher<i32> = Dispatcher::new();
        let soon = dispatcher.submit(1, Some(3)).unwrap();
        let later = dispatcher.submit(2, Some(20)).unwrap();
        let never = dispatcher.submit(3, None).unwrap();
        let also_soon = dispatcher.submit(4, Some(2)).unwrap();

        dispatcher.advance(3);
        let shed: Vec<u64> = dispatcher.shed_overdue().into_iter().map(|t| t.id).collect();
        assert_eq!(shed, vec![also_soon]);

        dispatcher.advance(1);
        let shed: Vec<u64> = dispatcher.shed_overdue().into_iter().map(|t| t.id).collect();
        assert_eq!(shed, vec![soon]);

        assert_eq!(dispatcher.pending(), 2);
        assert!(dispatcher.queue().contains(&later));
        assert!(dispatcher.queue().contains(&never));
    }
}
