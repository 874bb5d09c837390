//! Memory benchmark: heap array allocation, list construction and traversal,
//! and filling a stack array.

use std::hint::black_box;
use std::io::Write;

use tracing::{info, warn};

use crate::config::MemoryConfig;
use crate::error::{Error, Result};
use crate::linked_list::LinkedList;
use crate::record::{Operation, Record, ResultSink, measure};
use crate::testcase;

pub const STATIC_ARRAY_LEN: usize = 100_000;

pub fn array_allocation(size: usize) -> Record {
    let (array, elapsed) = measure(|| Vec::<i32>::with_capacity(black_box(size)));
    black_box(array);
    Record::new(Operation::DynamicArrayCreation, size, elapsed)
}

/// Builds a list from `values` with `push_back`, returning it so the caller
/// decides when teardown happens.
pub fn list_creation(values: &[i32]) -> (LinkedList<i32>, Record) {
    let (list, elapsed) = measure(|| {
        let mut list = LinkedList::new();
        for &elem in values {
            list.push_back(elem);
        }
        list
    });
    info!(?elapsed, "time to create linked list");
    (list, Record::new(Operation::LinkedListCreation, values.len(), elapsed))
}

pub fn list_traversal(list: &LinkedList<i32>) -> Record {
    let ((), elapsed) = measure(|| list.walk());
    Record::new(Operation::LinkedListTraversal, list.len(), elapsed)
}

pub fn static_fill() -> Record {
    let mut array = [0i32; STATIC_ARRAY_LEN];
    let ((), elapsed) = measure(|| {
        for (idx, el) in array.iter_mut().enumerate() {
            *el = idx as i32 + 1;
        }
    });
    black_box(&array);
    Record::new(Operation::StaticMemory, STATIC_ARRAY_LEN, elapsed)
}

/// Runs every memory measurement on the first `array_size` values of `values`.
pub fn run_with_values<W: Write>(
    values: &[i32],
    array_size: usize,
    sink: &mut ResultSink<W>,
) -> Result<()> {
    if values.len() < array_size {
        return Err(Error::Parse(format!(
            "testcase holds {} values, expected at least {array_size}",
            values.len()
        )));
    }
    if values.len() > array_size {
        warn!(
            available = values.len(),
            array_size, "testcase is longer than array_size, extra values ignored"
        );
    }
    let values = &values[..array_size];

    let record = array_allocation(array_size);
    info!(nanos = record.duration_ns, "array alloc");
    sink.append(&record)?;

    let (list, record) = list_creation(values);
    sink.append(&record)?;

    let record = list_traversal(&list);
    info!(nanos = record.duration_ns, "list traversal");
    sink.append(&record)?;
    drop(list);

    sink.append(&static_fill())?;
    sink.flush()
}

pub fn run<W: Write>(config: &MemoryConfig, sink: &mut ResultSink<W>) -> Result<()> {
    let values = testcase::read(&config.testcase_path)?;
    run_with_values(&values, config.array_size, sink)
}
