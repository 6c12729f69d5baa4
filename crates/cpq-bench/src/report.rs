use chrono::{DateTime, Utc};
use serde::Serialize;

use cpq_core::{QueueConfig, QueueCounts};

use crate::contended::ContendedResult;
use crate::runner::RunResult;
use crate::workload::WorkloadSpec;

#[derive(Debug, Clone, Serialize)]
pub struct BenchReport {
    pub started_at: DateTime<Utc>,
    pub workload: WorkloadSpec,
    pub causal_edges: usize,
    pub config: QueueConfig,
    pub results: Vec<RunResult>,
    pub causal_counts: QueueCounts,
    pub contended: Option<ContendedResult>,
}

impl BenchReport {
    /// Human-readable summary, one line per queue.
    pub fn render(&self) -> String {
        let mut out = format!(
            "workload: {} tasks, {} pops, {} distinct priorities, {} causal edges (seed {})\n",
            self.workload.tasks,
            self.workload.pops,
            self.workload.distinct,
            self.causal_edges,
            self.workload.seed,
        );
        for result in &self.results {
            out.push_str(&format!(
                "{:<22} {:>10.3} ms  ({} popped, {} left)\n",
                result.name, result.elapsed_ms, result.pops, result.remaining
            ));
        }
        out.push_str(&format!(
            "propagation: {} resolutions, {} adjustments, {} live edges\n",
            self.causal_counts.resolutions,
            self.causal_counts.adjustments,
            self.causal_counts.live_edges,
        ));
        if let Some(contended) = &self.contended {
            out.push_str(&format!(
                "contended: {} workers, {:.3} ms, pops per worker {:?}\n",
                contended.workers, contended.elapsed_ms, contended.pops_per_worker
            ));
        }
        out
    }
}
