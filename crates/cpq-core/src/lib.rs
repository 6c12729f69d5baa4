//! cpq-core
//!
//! A causal priority queue: a min-priority queue whose tasks can be linked
//! by cause -> dependent edges. Popping a cause releases its dependents,
//! lowering their priority by the weight of the edge (floored at zero).
//!
//! # Modules
//! - **domain**: ids, the `Priority` contract, insertion/pop values
//! - **queue**: priority store, causal graph, propagation engine, façade
//! - **config**: `QueueConfig`
//! - **error**: `QueueError`, `BulkAddError`
//! - **observability**: `QueueCounts`

pub mod config;
pub mod domain;
pub mod error;
pub mod observability;
pub mod queue;

pub use config::{QueueConfig, ResolvedCausePolicy};
pub use domain::{NewTask, PoppedTask, Priority, TaskId};
pub use error::{BulkAddError, QueueError};
pub use observability::QueueCounts;
pub use queue::{CausalPriorityQueue, Propagation, TaskQueue, TaskState};
