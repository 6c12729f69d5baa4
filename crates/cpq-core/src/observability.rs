use serde::{Deserialize, Serialize};

/// Snapshot of a queue's counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueCounts {
    pub pending: usize,
    pub resolved: usize,

    /// Causal edges whose parent is still pending.
    pub live_edges: usize,

    /// Distinct priority values among pending tasks.
    pub priority_buckets: usize,

    pub resolutions: u64,
    pub adjustments: u64,
}
