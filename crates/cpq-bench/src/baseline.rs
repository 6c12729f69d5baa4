//! Reference queues the causal queue is timed against.
//!
//! Neither knows about causes; both implement only `TaskQueue`.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap, VecDeque};

use cpq_core::domain::PriorityKey;
use cpq_core::{Priority, QueueError, TaskQueue};

/// Heap entry. Ordered by (priority, insertion counter); the task itself
/// takes no part in the ordering.
struct HeapEntry<T, P> {
    priority: PriorityKey<P>,
    counter: u64,
    task: T,
}

impl<T, P: Priority> PartialEq for HeapEntry<T, P> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl<T, P: Priority> Eq for HeapEntry<T, P> {}

impl<T, P: Priority> PartialOrd for HeapEntry<T, P> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T, P: Priority> Ord for HeapEntry<T, P> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.priority
            .cmp(&other.priority)
            .then(self.counter.cmp(&other.counter))
    }
}

/// Binary min-heap with an insertion counter for stable ties.
pub struct HeapQueue<T, P> {
    heap: BinaryHeap<Reverse<HeapEntry<T, P>>>,
    counter: u64,
}

impl<T, P: Priority> HeapQueue<T, P> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            counter: 0,
        }
    }
}

impl<T, P: Priority> Default for HeapQueue<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P: Priority> TaskQueue<T, P> for HeapQueue<T, P> {
    fn name(&self) -> &'static str {
        "HeapQueue"
    }

    fn enqueue(&mut self, task: T, priority: P) -> Result<(), QueueError> {
        self.heap.push(Reverse(HeapEntry {
            priority: PriorityKey(priority),
            counter: self.counter,
            task,
        }));
        self.counter += 1;
        Ok(())
    }

    fn dequeue(&mut self) -> Result<(T, P), QueueError> {
        let Reverse(entry) = self.heap.pop().ok_or(QueueError::EmptyQueue)?;
        Ok((entry.task, entry.priority.0))
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

/// Ordered map from priority to a FIFO of tasks.
pub struct SortedMapQueue<T, P> {
    buckets: BTreeMap<PriorityKey<P>, VecDeque<T>>,
    len: usize,
}

impl<T, P: Priority> SortedMapQueue<T, P> {
    pub fn new() -> Self {
        Self {
            buckets: BTreeMap::new(),
            len: 0,
        }
    }
}

impl<T, P: Priority> Default for SortedMapQueue<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P: Priority> TaskQueue<T, P> for SortedMapQueue<T, P> {
    fn name(&self) -> &'static str {
        "SortedMapQueue"
    }

    fn enqueue(&mut self, task: T, priority: P) -> Result<(), QueueError> {
        self.buckets
            .entry(PriorityKey(priority))
            .or_default()
            .push_back(task);
        self.len += 1;
        Ok(())
    }

    fn dequeue(&mut self) -> Result<(T, P), QueueError> {
        let Some(mut bucket) = self.buckets.first_entry() else {
            return Err(QueueError::EmptyQueue);
        };
        let priority = bucket.key().0;
        let Some(task) = bucket.get_mut().pop_front() else {
            return Err(QueueError::EmptyQueue);
        };
        if bucket.get().is_empty() {
            bucket.remove();
        }
        self.len -= 1;
        Ok((task, priority))
    }

    fn len(&self) -> usize {
        self.len
    }
}
