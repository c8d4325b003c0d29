//! Sequential vs parallel: the same kind of batch, two wall-clock profiles.
//!
//! The sequential batch totals roughly the sum of the per-task costs; the
//! parallel batch totals roughly the slowest task. Run with:
//! `cargo run --example race --features logging`

use std::sync::Arc;
use std::time::Instant;

use fetchrace::{BatchOrchestrator, Config, HttpSource, LogWriter, Policy, TaskSpec};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cfg = Config::default();
    let source = Arc::new(HttpSource::new(&cfg.endpoint_base));
    let orchestrator = BatchOrchestrator::new(cfg, source, vec![Arc::new(LogWriter)]);

    let pika_family = vec![
        TaskSpec::new("pichu"),
        TaskSpec::new("pikachu"),
        TaskSpec::new("raichu"),
    ];
    let started = Instant::now();
    let result = orchestrator.run(pika_family, Policy::Sequential).await;
    println!(
        "sequential: status={} total={:.2?}",
        result.status,
        started.elapsed()
    );

    let bulba_family = vec![
        TaskSpec::new("bulbasaur"),
        TaskSpec::new("ivysaur"),
        TaskSpec::new("venusaur"),
    ];
    let started = Instant::now();
    let result = orchestrator.run(bulba_family, Policy::ParallelAll).await;
    println!(
        "parallel-all: status={} total={:.2?}",
        result.status,
        started.elapsed()
    );

    Ok(())
}
