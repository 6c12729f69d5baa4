//! Priority store: pending task ids bucketed by priority.
//!
//! Design:
//! - `buckets`: priority -> (ticket -> TaskId). Tickets come from a single
//!   counter, so a bucket iterates in insertion order (FIFO tie-break).
//! - `index`: TaskId -> (priority, ticket), for O(log n) rekey.
//! - Invariant: a task is in `index` iff it is in exactly one bucket, and
//!   buckets are never empty.

use std::collections::{BTreeMap, HashMap};

use crate::domain::{Priority, PriorityKey, TaskId};
use crate::error::QueueError;

type Ticket = u64;

#[derive(Debug, Clone)]
pub struct PriorityStore<P> {
    buckets: BTreeMap<PriorityKey<P>, BTreeMap<Ticket, TaskId>>,
    index: HashMap<TaskId, (P, Ticket)>,
    next_ticket: Ticket,
}

impl<P: Priority> PriorityStore<P> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buckets: BTreeMap::new(),
            index: HashMap::with_capacity(capacity),
            next_ticket: 0,
        }
    }

    /// Place `task_id` at `priority`, after every task already there.
    ///
    /// Inserting an id that is already stored moves it, like `rekey`.
    pub fn insert(&mut self, task_id: TaskId, priority: P) {
        self.detach(task_id);
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.buckets
            .entry(PriorityKey(priority))
            .or_default()
            .insert(ticket, task_id);
        self.index.insert(task_id, (priority, ticket));
    }

    /// Remove the most urgent task: lowest priority, earliest insertion.
    pub fn extract_min(&mut self) -> Result<(TaskId, P), QueueError> {
        let Some(mut bucket) = self.buckets.first_entry() else {
            return Err(QueueError::EmptyQueue);
        };
        let priority = bucket.key().0;
        let (_, task_id) = bucket
            .get_mut()
            .pop_first()
            .expect("priority store buckets are never empty");
        if bucket.get().is_empty() {
            bucket.remove();
        }
        self.index.remove(&task_id);
        Ok((task_id, priority))
    }

    /// Move a stored task to `new_priority` as a fresh insertion.
    ///
    /// Returns the previous priority, or `None` if the task is not stored.
    pub fn rekey(&mut self, task_id: TaskId, new_priority: P) -> Option<P> {
        let previous = self.detach(task_id)?;
        self.insert(task_id, new_priority);
        Some(previous)
    }

    pub fn peek_min(&self) -> Option<(TaskId, P)> {
        let (key, bucket) = self.buckets.first_key_value()?;
        let (_, task_id) = bucket.first_key_value()?;
        Some((*task_id, key.0))
    }

    pub fn priority_of(&self, task_id: TaskId) -> Option<P> {
        self.index.get(&task_id).map(|(priority, _)| *priority)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of distinct priorities currently held.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    fn detach(&mut self, task_id: TaskId) -> Option<P> {
        let (priority, ticket) = self.index.remove(&task_id)?;
        let key = PriorityKey(priority);
        if let Some(bucket) = self.buckets.get_mut(&key) {
            bucket.remove(&ticket);
            if bucket.is_empty() {
                self.buckets.remove(&key);
            }
        }
        Some(priority)
    }
}

impl<P: Priority> Default for PriorityStore<P> {
    fn default() -> Self {
        Self::new()
    }
}
