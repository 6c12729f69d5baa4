//! Quick single-shot timing of the causal priority queue against a
//! binary-heap queue and a sorted-map queue on the same workload.
//! `cargo bench` runs the statistical version.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::info;

use cpq_core::QueueConfig;

use cpq_bench::baseline::{HeapQueue, SortedMapQueue};
use cpq_bench::report::BenchReport;
use cpq_bench::workload::{Workload, WorkloadSpec, parse_ratio};
use cpq_bench::{contended, runner};

#[derive(Parser, Debug)]
#[command(name = "cpq-bench", about = "Benchmark the causal priority queue")]
struct BenchArgs {
    /// Number of tasks to insert
    #[arg(long, default_value = "10000")]
    tasks: usize,

    /// Number of pops after insertion
    #[arg(long, default_value = "5000")]
    pops: usize,

    /// Priorities cycle through 0..distinct
    #[arg(long, default_value = "10")]
    distinct: i64,

    /// Fraction of tasks caused by a random earlier task (0.0 - 1.0)
    #[arg(long, default_value = "0.0", value_parser = parse_ratio)]
    causal_ratio: f64,

    /// Largest weight given to a causal edge
    #[arg(long, default_value = "3")]
    max_weight: i64,

    #[arg(long, default_value = "42")]
    seed: u64,

    /// Also run N tokio workers popping through one shared lock (0 = off)
    #[arg(long, default_value = "0")]
    workers: usize,

    /// JSON file with a QueueConfig
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn load_config(path: Option<&PathBuf>) -> Result<QueueConfig> {
    let Some(path) = path else {
        return Ok(QueueConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    QueueConfig::from_json_str(&raw).with_context(|| format!("invalid config in {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = BenchArgs::parse();
    let config = load_config(args.config.as_ref())?;
    let started_at = Utc::now();

    let workload = Workload::generate(WorkloadSpec {
        tasks: args.tasks,
        pops: args.pops,
        distinct: args.distinct,
        causal_ratio: args.causal_ratio,
        max_weight: args.max_weight,
        seed: args.seed,
    });
    info!(
        tasks = workload.items.len(),
        edges = workload.causal_edges(),
        "workload generated"
    );

    let (causal, causal_counts) = runner::time_causal(&workload, &config)?;
    info!(elapsed_ms = causal.elapsed_ms, "causal queue done");
    let heap = runner::time_plain(HeapQueue::new(), &workload)?;
    info!(elapsed_ms = heap.elapsed_ms, "heap queue done");
    let sorted = runner::time_plain(SortedMapQueue::new(), &workload)?;
    info!(elapsed_ms = sorted.elapsed_ms, "sorted-map queue done");

    let contended = if args.workers > 0 {
        let result = contended::run_contended(&workload, &config, args.workers).await?;
        info!(
            workers = result.workers,
            elapsed_ms = result.elapsed_ms,
            "contended run done"
        );
        Some(result)
    } else {
        None
    };

    let report = BenchReport {
        started_at,
        causal_edges: workload.causal_edges(),
        workload: workload.spec.clone(),
        config,
        results: vec![causal, heap, sorted],
        causal_counts,
        contended,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render());
    }
    Ok(())
}
