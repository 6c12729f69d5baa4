//! The causal priority queue façade.

use std::collections::HashMap;

use super::graph::CausalGraph;
use super::propagation::PropagationEngine;
use super::record::TaskRecord;
use super::state::TaskState;
use super::store::PriorityStore;
use crate::config::{QueueConfig, ResolvedCausePolicy};
use crate::domain::{IdSequence, NewTask, PoppedTask, Priority, TaskId};
use crate::error::{BulkAddError, QueueError};
use crate::observability::QueueCounts;

/// Priority queue whose tasks can release each other.
///
/// Lower priority values pop first; equal priorities pop in insertion order.
/// A task added with a cause is a dependent of that cause: when the cause is
/// popped, the dependent's priority drops by the weight it was added with
/// (never below zero), and it is re-queued behind tasks already at its new
/// priority.
///
/// The queue is synchronous and not internally synchronized. A pop and the
/// propagation it triggers must be observed as one step, so share it behind a
/// single lock (`Mutex<CausalPriorityQueue<..>>`) rather than splitting access.
///
/// ```
/// use cpq_core::CausalPriorityQueue;
///
/// let mut queue = CausalPriorityQueue::new();
/// let a = queue.add_task("A", 5).unwrap();
/// queue.add_task_with("B", 10, Some(a), 3).unwrap();
/// queue.add_task("C", 2).unwrap();
///
/// assert_eq!(queue.pop_task().unwrap(), ("C", 2));
/// assert_eq!(queue.pop_task().unwrap(), ("A", 5));
/// assert_eq!(queue.pop_task().unwrap(), ("B", 7));
/// assert!(queue.pop_task().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct CausalPriorityQueue<T, P = i64> {
    config: QueueConfig,
    ids: IdSequence,
    store: PriorityStore<P>,
    graph: CausalGraph<P>,
    engine: PropagationEngine,

    /// Pending tasks only; a record leaves this map when its task is popped.
    /// An issued id with no record is resolved, so resolved ids are not kept.
    records: HashMap<TaskId, TaskRecord<T, P>>,
}

impl<T, P: Priority> CausalPriorityQueue<T, P> {
    pub fn new() -> Self {
        Self::with_config(QueueConfig::default())
    }

    pub fn with_config(config: QueueConfig) -> Self {
        Self {
            ids: IdSequence::new(),
            store: PriorityStore::with_capacity(config.initial_capacity),
            graph: CausalGraph::new(),
            engine: PropagationEngine::new(),
            records: HashMap::with_capacity(config.initial_capacity),
            config,
        }
    }

    /// Add a task with no cause and unit weight.
    pub fn add_task(&mut self, task: T, priority: P) -> Result<TaskId, QueueError> {
        self.add_task_with(task, priority, None, P::one())
    }

    /// Add a task, optionally as a dependent of `cause`.
    ///
    /// `weight` is how far this task's priority drops when `cause` is
    /// popped. Everything is validated before the queue is touched: on error
    /// nothing was inserted and no id was consumed.
    pub fn add_task_with(
        &mut self,
        task: T,
        priority: P,
        cause: Option<TaskId>,
        weight: P,
    ) -> Result<TaskId, QueueError> {
        if !priority.is_valid() {
            return Err(QueueError::InvalidArgument(format!(
                "priority {priority} has no place in the ordering"
            )));
        }
        if !weight.is_valid_weight() {
            return Err(QueueError::InvalidArgument(format!(
                "weight must be positive, got {weight}"
            )));
        }

        let id = self.ids.peek();
        let parent = match cause {
            Some(cause) => self.check_cause(cause, id)?,
            None => None,
        };

        let allocated = self.ids.allocate();
        debug_assert_eq!(allocated, id);
        self.records
            .insert(id, TaskRecord::new(id, task, weight));
        if let Some(parent) = parent {
            self.graph.insert_edge(parent, id, weight);
        }
        self.store.insert(id, priority);

        tracing::debug!(task_id = %id, %priority, cause = ?parent, %weight, "task added");
        Ok(id)
    }

    /// Add items in order, stopping at the first failure.
    ///
    /// Not atomic: tasks added before the failing item stay queued, and their
    /// ids are reported in the error.
    pub fn bulk_add_tasks<I, N>(&mut self, items: I) -> Result<Vec<TaskId>, BulkAddError>
    where
        I: IntoIterator<Item = N>,
        N: Into<NewTask<T, P>>,
    {
        let items = items.into_iter();
        let mut inserted = Vec::with_capacity(items.size_hint().0);
        for (index, item) in items.enumerate() {
            let NewTask {
                task,
                priority,
                cause,
                weight,
            } = item.into();
            match self.add_task_with(task, priority, cause, weight) {
                Ok(id) => inserted.push(id),
                Err(source) => {
                    tracing::debug!(index, error = %source, "bulk add stopped");
                    return Err(BulkAddError {
                        index,
                        inserted,
                        source,
                    });
                }
            }
        }
        Ok(inserted)
    }

    /// Make an existing pending task also depend on `cause`.
    ///
    /// The new edge releases `task_id` by the weight it was added with.
    /// Returns whether an edge was recorded: with
    /// `ResolvedCausePolicy::Ignore`, an already-popped cause records nothing.
    pub fn add_cause(&mut self, task_id: TaskId, cause: TaskId) -> Result<bool, QueueError> {
        let Some(record) = self.records.get(&task_id) else {
            return Err(QueueError::UnknownTask(task_id));
        };
        let weight = record.weight;
        let Some(parent) = self.check_cause(cause, task_id)? else {
            return Ok(false);
        };
        self.graph.insert_edge(parent, task_id, weight);
        tracing::debug!(%task_id, %cause, "cause added");
        Ok(true)
    }

    /// Pop the most urgent task and release its dependents.
    pub fn pop_task(&mut self) -> Result<(T, P), QueueError> {
        self.pop_task_entry().map(PoppedTask::into_pair)
    }

    /// Like `pop_task`, also returning the id and the propagation report.
    pub fn pop_task_entry(&mut self) -> Result<PoppedTask<T, P>, QueueError> {
        let (id, priority) = self.store.extract_min()?;
        let record = self
            .records
            .remove(&id)
            .expect("every stored task has a record");

        let (ids, records) = (&self.ids, &self.records);
        let propagation = self.engine.on_resolve(id, &mut self.store, &mut self.graph, |child| {
            ids.issued(child) && !records.contains_key(&child)
        });
        tracing::debug!(
            task_id = %id,
            %priority,
            released = propagation.adjustments.len(),
            "task resolved"
        );

        Ok(PoppedTask {
            id,
            task: record.task,
            priority,
            propagation,
        })
    }

    /// Pop until empty.
    pub fn drain(&mut self) -> impl Iterator<Item = (T, P)> + '_ {
        std::iter::from_fn(move || self.pop_task().ok())
    }

    /// The task `pop_task` would return next.
    pub fn peek(&self) -> Option<(TaskId, &T, P)> {
        let (id, priority) = self.store.peek_min()?;
        let record = self.records.get(&id)?;
        Some((id, &record.task, priority))
    }

    /// Current priority of a pending task.
    pub fn priority_of(&self, task_id: TaskId) -> Option<P> {
        self.store.priority_of(task_id)
    }

    pub fn status_of(&self, task_id: TaskId) -> Option<TaskState> {
        if self.records.contains_key(&task_id) {
            Some(TaskState::Pending)
        } else if self.is_resolved(task_id) {
            Some(TaskState::Resolved)
        } else {
            None
        }
    }

    /// Pending causes of `task_id`.
    pub fn causes_of(&self, task_id: TaskId) -> Vec<TaskId> {
        self.graph.causes_of(task_id).collect()
    }

    /// Tasks that `task_id`'s resolution will release.
    pub fn dependents_of(&self, task_id: TaskId) -> Vec<TaskId> {
        self.graph.children_of(task_id).collect()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn counts(&self) -> QueueCounts {
        QueueCounts {
            pending: self.store.len(),
            resolved: self.engine.resolutions() as usize,
            live_edges: self.graph.edge_count(),
            priority_buckets: self.store.bucket_count(),
            resolutions: self.engine.resolutions(),
            adjustments: self.engine.adjustments(),
        }
    }

    /// Validate `cause -> child`. `Ok(None)` means the cause already fired
    /// and the policy says to proceed without an edge.
    fn check_cause(&self, cause: TaskId, child: TaskId) -> Result<Option<TaskId>, QueueError> {
        if cause == child {
            return Err(QueueError::SelfLoop(child));
        }
        if self.records.contains_key(&cause) {
            self.graph
                .check_link(cause, child, self.config.max_cycle_search)?;
            return Ok(Some(cause));
        }
        if self.is_resolved(cause) {
            return match self.config.resolved_cause {
                ResolvedCausePolicy::Reject => Err(QueueError::UnknownCause(cause)),
                ResolvedCausePolicy::Ignore => {
                    tracing::debug!(%cause, %child, "cause already resolved, no edge");
                    Ok(None)
                }
            };
        }
        Err(QueueError::UnknownCause(cause))
    }

    fn is_resolved(&self, task_id: TaskId) -> bool {
        self.ids.issued(task_id) && !self.records.contains_key(&task_id)
    }
}

impl<T, P: Priority> Default for CausalPriorityQueue<T, P> {
    fn default() -> Self {
        Self::new()
    }
}
