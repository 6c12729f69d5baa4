//! Runs over a generated workload, untimed for the benches and timed once
//! for the CLI report.

use std::time::Instant;

use anyhow::{Context, Result, ensure};
use serde::Serialize;

use cpq_core::{CausalPriorityQueue, QueueConfig, QueueCounts, TaskQueue};

use crate::workload::Workload;

#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub name: String,
    pub elapsed_ms: f64,
    pub pops: usize,
    pub remaining: usize,
}

/// Insert the workload without causes, then pop `spec.pops` times.
///
/// Untimed; `time_plain` and the criterion benches both measure this.
pub fn run_plain<Q>(queue: &mut Q, workload: &Workload) -> Result<usize>
where
    Q: TaskQueue<String, i64>,
{
    let pops = workload.spec.pops.min(workload.items.len());
    queue.enqueue_all(workload.plain())?;
    for _ in 0..pops {
        queue.dequeue()?;
    }
    Ok(pops)
}

pub fn time_plain<Q>(mut queue: Q, workload: &Workload) -> Result<RunResult>
where
    Q: TaskQueue<String, i64>,
{
    let start = Instant::now();
    let pops = run_plain(&mut queue, workload)?;
    let elapsed = start.elapsed();

    tracing::debug!(queue = queue.name(), ?elapsed, "plain run finished");
    Ok(RunResult {
        name: queue.name().to_string(),
        elapsed_ms: elapsed.as_secs_f64() * 1e3,
        pops,
        remaining: queue.len(),
    })
}

/// Bulk-insert the workload with its causes, then pop `spec.pops` times.
pub fn run_causal(
    queue: &mut CausalPriorityQueue<String>,
    workload: &Workload,
) -> Result<usize> {
    let pops = workload.spec.pops.min(workload.items.len());
    let ids = queue
        .bulk_add_tasks(workload.causal())
        .context("bulk insert into causal queue")?;
    for _ in 0..pops {
        queue.pop_task()?;
    }

    if let Some(last) = ids.last() {
        ensure!(
            *last == Workload::task_id(ids.len() - 1),
            "causal queue numbered tasks unexpectedly (last id {last})"
        );
    }
    Ok(pops)
}

pub fn time_causal(workload: &Workload, config: &QueueConfig) -> Result<(RunResult, QueueCounts)> {
    let mut queue: CausalPriorityQueue<String> = CausalPriorityQueue::with_config(config.clone());

    let start = Instant::now();
    let pops = run_causal(&mut queue, workload)?;
    let elapsed = start.elapsed();

    let counts = queue.counts();
    tracing::debug!(?elapsed, ?counts, "causal run finished");
    Ok((
        RunResult {
            name: TaskQueue::name(&queue).to_string(),
            elapsed_ms: elapsed.as_secs_f64() * 1e3,
            pops,
            remaining: queue.len(),
        },
        counts,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::{HeapQueue, SortedMapQueue};
    use crate::workload::WorkloadSpec;

    fn workload(causal_ratio: f64) -> Workload {
        Workload::generate(WorkloadSpec {
            tasks: 500,
            pops: 250,
            distinct: 10,
            causal_ratio,
            max_weight: 3,
            seed: 1,
        })
    }

    #[test]
    fn plain_runs_pop_requested_count() {
        let workload = workload(0.0);
        let heap = time_plain(HeapQueue::new(), &workload).unwrap();
        let map = time_plain(SortedMapQueue::new(), &workload).unwrap();

        assert_eq!(heap.pops, 250);
        assert_eq!(heap.remaining, 250);
        assert_eq!(map.remaining, 250);
        assert_eq!(map.name, "SortedMapQueue");
    }

    #[test]
    fn causal_run_consumes_edges() {
        let workload = workload(0.4);
        let (result, counts) = time_causal(&workload, &QueueConfig::default()).unwrap();

        assert_eq!(result.remaining, 250);
        assert_eq!(counts.resolutions, 250);
        assert!(counts.live_edges <= workload.causal_edges());
    }

    #[test]
    fn pops_are_capped_by_task_count() {
        let mut workload = workload(0.0);
        workload.spec.pops = 10_000;
        let (result, _) = time_causal(&workload, &QueueConfig::default()).unwrap();
        assert_eq!(result.pops, 500);
        assert_eq!(result.remaining, 0);
    }
}
