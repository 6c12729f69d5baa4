//! Queue module: priority store, causal graph, propagation, and the façade
//! that composes them.

mod causal;
mod graph;
mod propagation;
mod record;
mod state;
mod store;

pub use causal::CausalPriorityQueue;
pub use graph::CausalGraph;
pub use propagation::{Adjustment, Propagation, PropagationEngine};
pub use record::TaskRecord;
pub use state::TaskState;
pub use store::PriorityStore;

use crate::domain::Priority;
use crate::error::QueueError;

/// Plain priority-queue interface.
///
/// The seam that lets a harness drive the causal queue and simpler queues
/// with the same workload. Causal features stay on `CausalPriorityQueue`.
pub trait TaskQueue<T, P> {
    /// Short label for reports.
    fn name(&self) -> &'static str;

    fn enqueue(&mut self, task: T, priority: P) -> Result<(), QueueError>;

    fn dequeue(&mut self) -> Result<(T, P), QueueError>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn enqueue_all<I>(&mut self, items: I) -> Result<(), QueueError>
    where
        I: IntoIterator<Item = (T, P)>,
        Self: Sized,
    {
        for (task, priority) in items {
            self.enqueue(task, priority)?;
        }
        Ok(())
    }
}

impl<T, P: Priority> TaskQueue<T, P> for CausalPriorityQueue<T, P> {
    fn name(&self) -> &'static str {
        "CausalPriorityQueue"
    }

    fn enqueue(&mut self, task: T, priority: P) -> Result<(), QueueError> {
        self.add_task(task, priority).map(|_| ())
    }

    fn dequeue(&mut self) -> Result<(T, P), QueueError> {
        self.pop_task()
    }

    fn len(&self) -> usize {
        CausalPriorityQueue::len(self)
    }
}
