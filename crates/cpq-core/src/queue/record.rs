//! Task record: payload + weight of a pending task.

use crate::domain::TaskId;

/// Bookkeeping for a pending task.
///
/// The current priority is not stored here: the priority store is the only
/// place that knows it, so a rekey can never leave two copies disagreeing.
#[derive(Debug, Clone)]
pub struct TaskRecord<T, P> {
    pub id: TaskId,
    pub task: T,

    /// Weight given at insertion. Edges created later through `add_cause`
    /// release this task by this amount.
    pub weight: P,
}

impl<T, P> TaskRecord<T, P> {
    pub fn new(id: TaskId, task: T, weight: P) -> Self {
        Self { id, task, weight }
    }
}
