//! All-or-nothing vs best-effort: the same failing batch, two policies.
//!
//! The middle spec is marked to fail deterministically. Under `ParallelAll`
//! the whole batch settles as a total failure and the sibling results are
//! discarded; under `ParallelBestEffort` every task keeps its own outcome.
//! Run with: `cargo run --example failover --features logging`

use std::sync::Arc;

use fetchrace::{
    BatchOrchestrator, Config, HttpSource, LogWriter, Policy, TaskOutcome, TaskSpec,
};

fn char_family() -> Vec<TaskSpec> {
    vec![
        TaskSpec::new("charmander"),
        TaskSpec::new("charmeleon").with_failure(),
        TaskSpec::new("charizard"),
    ]
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cfg = Config::default();
    let source = Arc::new(HttpSource::new(&cfg.endpoint_base));
    let orchestrator = BatchOrchestrator::new(cfg, source, vec![Arc::new(LogWriter)]);

    let result = orchestrator.run(char_family(), Policy::ParallelAll).await;
    println!("all-or-nothing: status={} (no partial data)", result.status);
    if let Some(err) = &result.error {
        println!("  triggering error: {err}");
    }

    let result = orchestrator
        .run(char_family(), Policy::ParallelBestEffort)
        .await;
    println!("best-effort: status={}", result.status);
    for outcome in &result.outcomes {
        match outcome {
            TaskOutcome::Fulfilled {
                id,
                value,
                elapsed_ms,
            } => println!("  {id}: fulfilled as {} in {elapsed_ms}ms", value.name),
            TaskOutcome::Rejected {
                id,
                error,
                elapsed_ms,
            } => println!("  {id}: rejected ({}) in {elapsed_ms}ms", error.as_label()),
        }
    }

    Ok(())
}
