use thiserror::Error;

use crate::domain::TaskId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("pop from an empty priority queue")]
    EmptyQueue,

    #[error("linking {parent} -> {child} would create a cycle")]
    Cycle { parent: TaskId, child: TaskId },

    #[error("{0} cannot be its own cause")]
    SelfLoop(TaskId),

    #[error("unknown cause {0}")]
    UnknownCause(TaskId),

    #[error("unknown or resolved task {0}")]
    UnknownTask(TaskId),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// First failure of a `bulk_add_tasks` batch.
///
/// Batches are not atomic: `inserted` holds the ids added before the failing
/// item, and those tasks stay in the queue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("bulk add stopped at item {index}: {source}")]
pub struct BulkAddError {
    pub index: usize,
    pub inserted: Vec<TaskId>,
    #[source]
    pub source: QueueError,
}
