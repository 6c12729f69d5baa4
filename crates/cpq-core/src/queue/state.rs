//! Task lifecycle.

use serde::{Deserialize, Serialize};

/// Task state.
///
/// State transitions:
/// - Pending -> Resolved (on pop, exactly once)
///
/// Propagation only ever targets `Pending` tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// In the priority store, waiting to be popped.
    Pending,

    /// Popped. Never re-enters the store.
    Resolved,
}
