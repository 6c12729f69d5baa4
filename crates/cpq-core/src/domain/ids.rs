//! Task identifiers.
//!
//! A `TaskId` wraps the sequence number the queue assigns on insertion.
//! Ids are never reused, so ordering ids is ordering by creation time; the
//! causal graph relies on this to walk children deterministically.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a task inside one `CausalPriorityQueue`.
///
/// Ids are only meaningful for the queue that issued them.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    pub fn new(seq: u64) -> Self {
        Self(seq)
    }

    /// Sequence number assigned at insertion.
    pub fn seq(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

/// Monotonic id allocator.
///
/// `peek` lets a caller validate against the next id before committing to it,
/// so a rejected insertion does not burn a sequence number.
#[derive(Debug, Clone)]
pub struct IdSequence {
    next: u64,
}

impl IdSequence {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn peek(&self) -> TaskId {
        TaskId(self.next)
    }

    pub fn allocate(&mut self) -> TaskId {
        let id = TaskId(self.next);
        self.next += 1;
        id
    }

    /// Whether `id` has already been handed out by `allocate`.
    pub fn issued(&self, id: TaskId) -> bool {
        (1..self.next).contains(&id.0)
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_ordered_by_allocation() {
        let mut seq = IdSequence::new();
        let a = seq.allocate();
        let b = seq.allocate();
        let c = seq.allocate();

        assert!(a < b);
        assert!(b < c);
        assert_eq!(c.seq(), 3);
    }

    #[test]
    fn peek_does_not_consume() {
        let mut seq = IdSequence::new();
        let peeked = seq.peek();
        assert_eq!(seq.peek(), peeked);
        assert_eq!(seq.allocate(), peeked);
        assert_ne!(seq.peek(), peeked);
    }

    #[test]
    fn issued_covers_allocated_range_only() {
        let mut seq = IdSequence::new();
        assert!(!seq.issued(seq.peek()));

        let a = seq.allocate();
        let b = seq.allocate();
        assert!(seq.issued(a));
        assert!(seq.issued(b));
        assert!(!seq.issued(seq.peek()));
        assert!(!seq.issued(TaskId::new(0)));
    }

    #[test]
    fn display_has_task_prefix() {
        assert_eq!(TaskId::new(42).to_string(), "task-42");
    }

    #[test]
    fn serializes_as_plain_number() {
        let id = TaskId::new(7);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "7");
        let back: TaskId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
