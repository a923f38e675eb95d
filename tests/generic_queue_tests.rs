//! Generic tests for IndexedPriorityQueue implementations
//!
//! The helpers only use the trait interface, so each one is run against both
//! position index backends.

use indexed_task_heap::{
    DenseTaskHeap, HeapError, IndexedMaxHeap, IndexedPriorityQueue, PriorityQueue, Task,
};

type HashHeap = IndexedMaxHeap<usize, i32>;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn fill<Q: IndexedPriorityQueue<usize, i32> + Default>(priorities: &[i32]) -> Q {
    let mut queue = Q::default();
    for (id, &priority) in priorities.iter().enumerate() {
        queue.insert(Task::new(id, priority, id as u64)).unwrap();
    }
    queue
}

fn drain_priorities<Q: PriorityQueue<usize, i32>>(queue: &mut Q) -> Vec<i32> {
    let mut out = Vec::with_capacity(queue.len());
    while let Some(task) = queue.extract_max() {
        out.push(task.priority);
    }
    out
}

// Test helpers that work with any IndexedPriorityQueue implementation

/// Test that an empty queue reports emptiness instead of failing
fn test_empty_queue<Q: IndexedPriorityQueue<usize, i32> + Default>() {
    let mut queue = Q::default();
    assert!(queue.is_empty());
    assert_eq!(queue.len(), 0);
    assert_eq!(queue.peek(), None);
    assert_eq!(queue.extract_max(), None);
    assert_eq!(queue.remove(&0), None);
    assert!(!queue.contains(&0));
}

/// Build from [3,1,4,1,5,9,2,6]: extract gives 9, then peek gives 6
fn test_extract_then_peek<Q: IndexedPriorityQueue<usize, i32> + Default>() {
    let mut queue: Q = fill(&[3, 1, 4, 1, 5, 9, 2, 6]);

    let first = queue.extract_max().unwrap();
    assert_eq!(first.priority, 9);
    assert_eq!(first.id, 5);
    assert_eq!(queue.peek().map(|t| t.priority), Some(6));
    assert_eq!(queue.len(), 7);
}

/// Inserting above the current max makes the new task the root
fn test_insert_new_max<Q: IndexedPriorityQueue<usize, i32> + Default>() {
    let mut queue: Q = fill(&[3, 1, 4, 1, 5, 2, 6]);
    assert_eq!(queue.peek().map(|t| t.priority), Some(6));

    queue.insert(Task::new(99, 7, 100)).unwrap();
    assert_eq!(queue.peek().map(|t| t.id), Some(99));
}

/// Unknown ids: change_priority fails, remove quietly returns None
fn test_missing_ids<Q: IndexedPriorityQueue<usize, i32> + Default>() {
    let mut queue: Q = fill(&[1, 2, 3]);

    assert_eq!(queue.change_priority(&42, 10), Err(HeapError::NotFound(42)));
    assert_eq!(queue.remove(&42), None);
    assert_eq!(queue.len(), 3);
    assert_eq!(drain_priorities(&mut queue), vec![3, 2, 1]);
}

/// Duplicate ids are rejected without touching the queue
fn test_duplicate_insert<Q: IndexedPriorityQueue<usize, i32> + Default>() {
    let mut queue: Q = fill(&[5, 6]);
    let err = queue.insert(Task::new(1, 100, 0)).unwrap_err();
    assert_eq!(err, HeapError::DuplicateId(1));
    assert_eq!(err.to_string(), "task 1 is already in the heap");
    assert_eq!(queue.get(&1).map(|t| t.priority), Some(6));
    assert_eq!(queue.len(), 2);
}

/// Removing the max promotes the next highest
fn test_remove_max_promotes_next<Q: IndexedPriorityQueue<usize, i32> + Default>() {
    let mut queue: Q = fill(&[3, 1, 4, 1, 5, 9, 2, 6]);
    let top = queue.peek().map(|t| t.id).unwrap();

    let removed = queue.remove(&top).unwrap();
    assert_eq!(removed.priority, 9);
    assert_eq!(queue.peek().map(|t| t.priority), Some(6));
    assert!(!queue.contains(&top));
    assert_eq!(drain_priorities(&mut queue), vec![6, 5, 4, 3, 2, 1, 1]);
}

/// Priority boosts and demotions in both directions
fn test_change_priority_sequence<Q: IndexedPriorityQueue<usize, i32> + Default>() {
    let mut queue: Q = fill(&[10, 20, 30, 40, 50, 60, 70]);

    queue.change_priority(&0, 100).unwrap();
    assert_eq!(queue.peek().map(|t| t.id), Some(0));

    queue.change_priority(&0, 0).unwrap();
    assert_eq!(queue.peek().map(|t| t.id), Some(6));

    queue.change_priority(&3, 65).unwrap();
    assert_eq!(queue.peek().map(|t| t.id), Some(6));

    queue.change_priority(&6, 1).unwrap();
    assert_eq!(queue.peek().map(|t| t.id), Some(3));

    assert_eq!(queue.len(), 7);
    assert_eq!(drain_priorities(&mut queue), vec![65, 60, 50, 30, 20, 1, 0]);
}

/// Task metadata rides along untouched
fn test_metadata_preserved<Q: IndexedPriorityQueue<usize, i32> + Default>() {
    let mut queue = Q::default();
    queue
        .insert(Task::new(1, 5, 17).with_deadline(40))
        .unwrap();
    queue.insert(Task::new(2, 9, 18)).unwrap();
    queue.change_priority(&1, 10).unwrap();

    let task = queue.extract_max().unwrap();
    assert_eq!(task, Task { id: 1, priority: 10, arrival_time: 17, deadline: Some(40) });
}

/// Alternating inserts, boosts, removals and extractions
fn test_interleaved_operations<Q: IndexedPriorityQueue<usize, i32> + Default>() {
    let mut queue = Q::default();
    let mut next_id = 0;

    for round in 0..50 {
        for _ in 0..4 {
            queue.insert(Task::new(next_id, (next_id * 37 % 101) as i32, round)).unwrap();
            next_id += 1;
        }
        let boosted = next_id - 3;
        queue.change_priority(&boosted, 1000 + round as i32).unwrap();
        assert_eq!(queue.peek().map(|t| t.id), Some(boosted));

        let cancelled = next_id - 1;
        assert!(queue.remove(&cancelled).is_some());

        let extracted = queue.extract_max().unwrap();
        assert_eq!(extracted.id, boosted);
    }

    assert_eq!(queue.len(), 100);
    let drained = drain_priorities(&mut queue);
    assert!(drained.windows(2).all(|w| w[0] >= w[1]));
}

macro_rules! generic_queue_tests {
    ($($name:ident),* $(,)?) => {
        mod hash_index {
            use super::*;
            $(
                #[test]
                fn $name() {
                    init_logging();
                    super::$name::<HashHeap>();
                }
            )*
        }

        mod dense_index {
            use super::*;
            $(
                #[test]
                fn $name() {
                    init_logging();
                    super::$name::<DenseTaskHeap<i32>>();
                }
            )*
        }
    };
}

generic_queue_tests!(
    test_empty_queue,
    test_extract_then_peek,
    test_insert_new_max,
    test_missing_ids,
    test_duplicate_insert,
    test_remove_max_promotes_next,
    test_change_priority_sequence,
    test_metadata_preserved,
    test_interleaved_operations,
);

#[test]
fn test_remove_max_full_scan() {
    init_logging();
    let tasks = [3, 1, 4, 1, 5, 9, 2, 6]
        .iter()
        .enumerate()
        .map(|(id, &p)| Task::new(id, p, 0));
    let mut heap: HashHeap = IndexedMaxHeap::build(tasks).unwrap();

    let top = heap.peek().unwrap().id;
    heap.remove(&top);
    assert!(heap.verify_invariants());
    for task in heap.iter() {
        assert_eq!(heap.get(&task.id), Some(task));
    }
}

#[test]
fn test_not_found_message() {
    let mut heap: HashHeap = IndexedMaxHeap::new();
    let err = heap.change_priority(&7, 1).unwrap_err();
    assert_eq!(err.to_string(), "task 7 not found");
    assert_eq!(*err.id(), 7);
}
