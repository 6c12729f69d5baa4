//! Domain model: ids, the priority contract, insertion and pop values.

pub mod ids;
pub mod priority;
pub mod task;

pub use ids::{IdSequence, TaskId};
pub use priority::{Priority, PriorityKey};
pub use task::{NewTask, PoppedTask};
