//! Walkthrough of the indexed heap and the dispatcher
//!
//! ## Running
//!
//! ```bash
//! RUST_LOG=debug cargo run --example scheduler
//! ```

use indexed_task_heap::dispatch::Dispatcher;
use indexed_task_heap::{HeapError, IndexedMaxHeap, Task};

fn show(label: &str, heap: &IndexedMaxHeap<u32, u32>) {
    let tasks: Vec<String> = heap.iter().map(|t| t.to_string()).collect();
    println!("{label}: [{}]", tasks.join(", "));
}

fn main() {
    env_logger::init();

    // Ten tasks, priorities cycling through 0..5
    let tasks = (0..10).map(|i| Task::new(i, i % 5, u64::from(i)));
    let mut heap: IndexedMaxHeap<u32, u32> = match IndexedMaxHeap::build(tasks) {
        Ok(heap) => heap,
        Err(err) => {
            eprintln!("build failed: {err}");
            return;
        }
    };
    show("Initial heap", &heap);

    if let Some(max) = heap.peek() {
        println!("Peek max: {max}");
    }
    if let Some(extracted) = heap.extract_max() {
        println!("Extracted: {extracted}");
    }
    show("After extraction", &heap);

    if let Err(err) = heap.insert(Task::new(99, 7, 100)) {
        eprintln!("insert failed: {err}");
    }
    show("After insert", &heap);

    if let Err(err) = heap.change_priority(&2, 10) {
        eprintln!("change_priority failed: {err}");
    }
    show("After priority change", &heap);

    match heap.remove(&5) {
        Some(removed) => println!("Removed: {removed}"),
        None => println!("Task 5 was not queued"),
    }
    show("Final heap", &heap);

    // The same flow through a dispatcher with deadlines
    if let Err(err) = run_dispatcher() {
        eprintln!("dispatcher failed: {err}");
    }
}

fn run_dispatcher() -> Result<(), HeapError<u64>> {
    let mut dispatcher: Dispatcher<u32> = Dispatcher::new();
    let nightly = dispatcher.submit(2, None)?;
    let hotfix = dispatcher.submit(1, None)?;
    let report = dispatcher.submit(3, Some(5))?;

    println!("Queued nightly={nightly} hotfix={hotfix} report={report}");

    dispatcher.reprioritize(hotfix, 9)?;
    dispatcher.advance(10);
    for task in dispatcher.shed_overdue() {
        println!("Shed overdue: {task} (deadline {:?})", task.deadline);
    }
    while let Some(task) = dispatcher.next() {
        println!("Dispatched: {task}");
    }
    Ok(())
}
