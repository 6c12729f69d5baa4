//! Benchmark harness for `cpq-core`.
//!
//! - `baseline`: heap and sorted-map queues without causes
//! - `workload`: seeded task streams shared by every queue under test
//! - `runner`: single-shot timed runs for the CLI report
//! - `contended`: tokio workers popping through one lock
//! - `report`: serializable run report

pub mod baseline;
pub mod contended;
pub mod report;
pub mod runner;
pub mod workload;
