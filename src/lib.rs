//! Indexed Priority Queues for Task Scheduling
//!
//! This crate provides a binary max-heap of scheduling tasks that, unlike
//! `std::collections::BinaryHeap`, lets callers reach any queued task by its
//! id. A position index from id to heap slot is kept in step with every swap,
//! so a task can be re-prioritized or removed in O(log n) without scanning.
//!
//! # Features
//!
//! - **[`IndexedMaxHeap`]**: O(n) build; O(log n) insert, extract-max, priority change and removal by id
//! - **Pluggable position index**: [`HashIndex`] for any hashable id, [`DenseIndex`] for small integer ids
//! - **[`Dispatcher`](dispatch::Dispatcher)**: a scheduler loop that dispatches, boosts, cancels and sheds overdue tasks
//!
//! # Example
//!
//! ```rust
//! use indexed_task_heap::{IndexedMaxHeap, Task};
//!
//! let mut heap: IndexedMaxHeap<u32, i32> = IndexedMaxHeap::new();
//! heap.insert(Task::new(1, 5, 0)).unwrap();
//! heap.insert(Task::new(2, 3, 1)).unwrap();
//! heap.change_priority(&2, 8).unwrap();
//! assert_eq!(heap.extract_max().map(|t| t.id), Some(2));
//! ```

pub mod dispatch;
pub mod indexed;
pub mod position;
pub mod task;
pub mod traits;

// Re-export the main types for convenience
pub use indexed::{DenseTaskHeap, DrainSorted, IndexedMaxHeap};
pub use position::{DenseIndex, HashIndex, PositionIndex};
pub use task::Task;
pub use traits::{HeapError, IndexedPriorityQueue, PriorityQueue};
