//! Contended mode: several tokio workers popping from one queue behind a
//! single lock.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::sync::Mutex;

use cpq_core::{CausalPriorityQueue, QueueConfig, QueueError};

use crate::workload::Workload;

#[derive(Debug, Clone, Serialize)]
pub struct ContendedResult {
    pub workers: usize,
    pub elapsed_ms: f64,
    pub pops: usize,
    pub pops_per_worker: Vec<usize>,
}

type SharedQueue = Arc<Mutex<CausalPriorityQueue<String>>>;

pub async fn run_contended(
    workload: &Workload,
    config: &QueueConfig,
    workers: usize,
) -> Result<ContendedResult> {
    let queue: SharedQueue = Arc::new(Mutex::new(CausalPriorityQueue::with_config(
        config.clone(),
    )));
    queue
        .lock()
        .await
        .bulk_add_tasks(workload.causal())
        .context("bulk insert into shared queue")?;

    let target = workload.spec.pops.min(workload.items.len());
    let claimed = Arc::new(AtomicUsize::new(0));

    let start = Instant::now();
    let handles: Vec<_> = (0..workers.max(1))
        .map(|worker| {
            let queue = Arc::clone(&queue);
            let claimed = Arc::clone(&claimed);
            tokio::spawn(async move { worker_loop(worker, queue, claimed, target).await })
        })
        .collect();

    let mut pops_per_worker = Vec::with_capacity(handles.len());
    for handle in handles {
        pops_per_worker.push(handle.await.context("worker panicked")??);
    }
    let elapsed = start.elapsed();

    Ok(ContendedResult {
        workers: pops_per_worker.len(),
        elapsed_ms: elapsed.as_secs_f64() * 1e3,
        pops: pops_per_worker.iter().sum(),
        pops_per_worker,
    })
}

/// Pop until `target` pops have been claimed across all workers, or the
/// queue runs dry.
async fn worker_loop(
    worker: usize,
    queue: SharedQueue,
    claimed: Arc<AtomicUsize>,
    target: usize,
) -> Result<usize, QueueError> {
    let mut popped = 0;
    while claimed.fetch_add(1, Ordering::Relaxed) < target {
        // pop + propagation happen under one guard
        let mut guard = queue.lock().await;
        match guard.pop_task() {
            Ok(_) => popped += 1,
            Err(QueueError::EmptyQueue) => break,
            Err(e) => return Err(e),
        }
        drop(guard);
        tokio::task::yield_now().await;
    }
    tracing::debug!(worker, popped, "worker finished");
    Ok(popped)
}
