//! Benchmark input generation.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use cpq_core::{NewTask, TaskId};

#[derive(Debug, Clone, Serialize)]
pub struct WorkloadSpec {
    pub tasks: usize,
    pub pops: usize,

    /// Priorities cycle through `0..distinct`.
    pub distinct: i64,

    /// Fraction of tasks given a random earlier task as cause.
    pub causal_ratio: f64,

    pub max_weight: i64,
    pub seed: u64,
}

/// One generated task. `cause` indexes an earlier item of the same workload.
#[derive(Debug, Clone)]
pub struct WorkItem {
    pub name: String,
    pub priority: i64,
    pub cause: Option<usize>,
    pub weight: i64,
}

pub struct Workload {
    pub spec: WorkloadSpec,
    pub items: Vec<WorkItem>,
}

/// Parse a causal ratio: a finite fraction within `0..=1`.
pub fn parse_ratio(raw: &str) -> Result<f64, String> {
    let ratio: f64 = raw
        .parse()
        .map_err(|err| format!("`{raw}` is not a number: {err}"))?;
    if !ratio.is_finite() || !(0.0..=1.0).contains(&ratio) {
        return Err(format!("`{raw}` is not a fraction between 0 and 1"));
    }
    Ok(ratio)
}

impl Workload {
    pub fn generate(spec: WorkloadSpec) -> Self {
        let mut rng = StdRng::seed_from_u64(spec.seed);
        let distinct = spec.distinct.max(1);
        let ratio = if spec.causal_ratio.is_finite() {
            spec.causal_ratio.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let items = (0..spec.tasks)
            .map(|i| {
                let cause = (i > 0 && rng.gen_bool(ratio))
                    .then(|| rng.gen_range(0..i));
                WorkItem {
                    name: format!("Task {i}"),
                    priority: i as i64 % distinct,
                    cause,
                    weight: if cause.is_some() {
                        rng.gen_range(1..=spec.max_weight.max(1))
                    } else {
                        1
                    },
                }
            })
            .collect();
        Self { spec, items }
    }

    /// `(name, priority)` pairs for queues without causes.
    pub fn plain(&self) -> impl Iterator<Item = (String, i64)> + '_ {
        self.items
            .iter()
            .map(|item| (item.name.clone(), item.priority))
    }

    /// Insertion arguments for a fresh causal queue.
    ///
    /// A fresh queue numbers its tasks from 1 in insertion order, so item `i`
    /// becomes `TaskId::new(i + 1)`; causes are expressed that way.
    pub fn causal(&self) -> impl Iterator<Item = NewTask<String, i64>> + '_ {
        self.items.iter().map(|item| NewTask {
            task: item.name.clone(),
            priority: item.priority,
            cause: item.cause.map(Self::task_id),
            weight: item.weight,
        })
    }

    pub fn task_id(index: usize) -> TaskId {
        TaskId::new(index as u64 + 1)
    }

    pub fn causal_edges(&self) -> usize {
        self.items.iter().filter(|item| item.cause.is_some()).count()
    }
}
