use super::{Priority, TaskId};
use crate::queue::Propagation;

/// Arguments of one insertion, as accepted by `bulk_add_tasks`.
///
/// Converts from `(task, priority)` and from
/// `(task, priority, cause, weight)`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask<T, P> {
    pub task: T,
    pub priority: P,
    pub cause: Option<TaskId>,
    pub weight: P,
}

impl<T, P: Priority> NewTask<T, P> {
    pub fn new(task: T, priority: P) -> Self {
        Self {
            task,
            priority,
            cause: None,
            weight: P::one(),
        }
    }

    pub fn caused_by(mut self, cause: TaskId) -> Self {
        self.cause = Some(cause);
        self
    }

    pub fn with_weight(mut self, weight: P) -> Self {
        self.weight = weight;
        self
    }
}

impl<T, P: Priority> From<(T, P)> for NewTask<T, P> {
    fn from((task, priority): (T, P)) -> Self {
        Self::new(task, priority)
    }
}

impl<T, P: Priority> From<(T, P, Option<TaskId>, P)> for NewTask<T, P> {
    fn from((task, priority, cause, weight): (T, P, Option<TaskId>, P)) -> Self {
        Self {
            task,
            priority,
            cause,
            weight,
        }
    }
}

/// Everything a pop produced: the task, the priority it left the queue at,
/// and what its resolution did to its dependents.
#[derive(Debug, Clone)]
pub struct PoppedTask<T, P> {
    pub id: TaskId,
    pub task: T,
    pub priority: P,
    pub propagation: Propagation<P>,
}

impl<T, P> PoppedTask<T, P> {
    pub fn into_pair(self) -> (T, P) {
        (self.task, self.priority)
    }
}
