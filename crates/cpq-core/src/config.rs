//! Queue configuration.

use serde::{Deserialize, Serialize};

/// What `add_task_with` does when the cause has already been popped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvedCausePolicy {
    /// Fail with `QueueError::UnknownCause`.
    #[default]
    Reject,

    /// Accept the task without an edge: its cause has already fired.
    Ignore,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueConfig {
    pub resolved_cause: ResolvedCausePolicy,

    /// Pre-allocated slots for pending tasks.
    pub initial_capacity: usize,

    /// Upper bound on nodes visited by one cycle check. `None` searches the
    /// whole reachable subgraph.
    pub max_cycle_search: Option<usize>,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            resolved_cause: ResolvedCausePolicy::Reject,
            initial_capacity: 0,
            max_cycle_search: None,
        }
    }
}

impl QueueConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
