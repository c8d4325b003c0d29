//! # Batch orchestrator: policy-driven execution of a batch of fetch tasks.
//!
//! The [`BatchOrchestrator`] owns the event bus, a [`SinkSet`], and the
//! shared [`DelayedFetcher`]. Given an ordered list of [`TaskSpec`]s and a
//! [`Policy`], it drives one [`TaskRunner`] per spec, enforces the policy's
//! ordering and failure rules, and produces a single [`BatchResult`].
//!
//! ## High-level architecture
//! ```text
//! Inputs to run():
//!   Vec<TaskSpec> + Policy ──► BatchOrchestrator::run
//!
//! Launch (per policy):
//!   Sequential:          runner(i+1) starts only after runner(i) settles
//!   ParallelAll:         all runners spawned immediately; first rejection
//!                        settles the batch, siblings are ignored (not
//!                        cancelled — they run to settlement detached)
//!   ParallelBestEffort:  all runners spawned immediately; batch waits for
//!                        every runner to settle
//!
//! Event flow:
//!   Runner/Fetcher ── publish(Event) ──► Bus ──► sink listener ──► SinkSet
//!                                          └──► subscribe() receivers
//!
//! Settlement:
//!   outcomes (input order) + AggregateStatus ──► BatchResult
//!   Bus ◄── BatchSettled{status}
//! ```
//!
//! ## Rules
//! - Each `run()` call is one batch: Idle → Running → Settled, exactly once.
//! - Outcome order always matches input spec order, never completion order.
//! - Rejections are terminal; nothing is retried.
//! - Only this layer converts a per-task rejection into a batch-level
//!   `TotalFailure`, and only under [`Policy::ParallelAll`].
//! - Under `ParallelAll`, discarded sibling runners keep running after the
//!   batch settles and still emit their events; sinks must tolerate
//!   settlement events arriving after `BatchSettled`.
//! - No timeouts: an unresponsive source stalls the batch indefinitely.

use std::sync::Arc;
use std::time::SystemTime;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::broadcast;
use tokio::task::JoinError;

use crate::batch::outcome::{AggregateStatus, BatchResult, Policy, TaskOutcome};
use crate::batch::runner::TaskRunner;
use crate::batch::spec::TaskSpec;
use crate::config::Config;
use crate::error::FetchError;
use crate::events::{Bus, Event, EventKind};
use crate::fetch::{DelayedFetcher, SourceRef};
use crate::sinks::{EventSink, SinkSet};

/// Coordinates task runners, event delivery, and batch settlement.
///
/// Reusable across batches: each [`run`](BatchOrchestrator::run) call is an
/// independent batch over the same source, configuration, and sinks.
pub struct BatchOrchestrator {
    bus: Bus,
    sinks: Arc<SinkSet>,
    fetcher: Arc<DelayedFetcher>,
}

impl BatchOrchestrator {
    /// Creates an orchestrator over the given source, with the provided
    /// sinks attached to the event stream.
    ///
    /// Must be called from within a tokio runtime (sink workers and the
    /// bus listener are spawned here).
    pub fn new(cfg: Config, source: SourceRef, sinks: Vec<Arc<dyn EventSink>>) -> Self {
        let bus = Bus::new(cfg.bus_capacity);
        let sinks = Arc::new(SinkSet::new(sinks));
        let fetcher = Arc::new(DelayedFetcher::new(source, cfg.latency));

        let orchestrator = Self { bus, sinks, fetcher };
        orchestrator.sink_listener();
        orchestrator
    }

    /// Creates a receiver observing all subsequent events.
    ///
    /// For consumers that want to buffer or inspect the stream themselves
    /// instead of implementing [`EventSink`].
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Runs one batch of specs under the given policy to settlement.
    pub async fn run(&self, specs: Vec<TaskSpec>, policy: Policy) -> BatchResult {
        let started_at = SystemTime::now();

        let (status, outcomes, error) = match policy {
            Policy::Sequential => self.run_sequential(specs).await,
            Policy::ParallelAll => self.run_parallel_all(specs).await,
            Policy::ParallelBestEffort => self.run_best_effort(specs).await,
        };

        self.bus
            .publish(Event::new(EventKind::BatchSettled).with_reason(status.as_label()));

        BatchResult {
            policy,
            started_at,
            finished_at: SystemTime::now(),
            outcomes,
            status,
            error,
        }
    }

    /// Subscribes to the bus and forwards events to the sinks.
    fn sink_listener(&self) {
        let mut rx = self.bus.subscribe();
        let sinks = Arc::clone(&self.sinks);
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => sinks.emit(&ev),
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }

    fn runner(&self) -> TaskRunner {
        TaskRunner::new(Arc::clone(&self.fetcher), self.bus.clone())
    }

    /// One at a time, in input order; a failure does not halt the sequence.
    async fn run_sequential(
        &self,
        specs: Vec<TaskSpec>,
    ) -> (AggregateStatus, Vec<TaskOutcome>, Option<FetchError>) {
        let runner = self.runner();
        let mut outcomes = Vec::with_capacity(specs.len());
        for spec in specs {
            outcomes.push(runner.start(spec).await);
        }
        (AggregateStatus::for_sequential(&outcomes), outcomes, None)
    }

    /// All launched immediately; the first rejection settles the batch with
    /// a total failure and discards sibling results.
    ///
    /// Siblings already in flight are not cancelled, merely ignored: the
    /// dropped join handles detach, and the runners still settle and emit
    /// their events.
    async fn run_parallel_all(
        &self,
        specs: Vec<TaskSpec>,
    ) -> (AggregateStatus, Vec<TaskOutcome>, Option<FetchError>) {
        let runner = self.runner();
        let ids: Vec<String> = specs.iter().map(|s| s.id().to_owned()).collect();

        // start() emits TaskStarted synchronously, so collecting the spawn
        // handles launches every task in input order before any suspension.
        let handles: Vec<_> = specs
            .into_iter()
            .map(|spec| tokio::spawn(runner.start(spec)))
            .collect();

        let mut pending: FuturesUnordered<_> = handles
            .into_iter()
            .enumerate()
            .map(|(index, handle)| async move { (index, handle.await) })
            .collect();

        let mut slots: Vec<Option<TaskOutcome>> = (0..ids.len()).map(|_| None).collect();
        while let Some((index, joined)) = pending.next().await {
            let outcome = settle(joined, &ids[index]);
            if outcome.is_rejected() {
                let error = outcome.error().cloned();
                return (AggregateStatus::TotalFailure, Vec::new(), error);
            }
            slots[index] = Some(outcome);
        }

        let outcomes: Vec<TaskOutcome> = slots.into_iter().flatten().collect();
        (AggregateStatus::Success, outcomes, None)
    }

    /// All launched immediately; waits for every runner to settle and keeps
    /// one outcome per spec, index-aligned.
    async fn run_best_effort(
        &self,
        specs: Vec<TaskSpec>,
    ) -> (AggregateStatus, Vec<TaskOutcome>, Option<FetchError>) {
        let runner = self.runner();
        let ids: Vec<String> = specs.iter().map(|s| s.id().to_owned()).collect();

        let handles: Vec<_> = specs
            .into_iter()
            .map(|spec| tokio::spawn(runner.start(spec)))
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for (index, handle) in handles.into_iter().enumerate() {
            outcomes.push(settle(handle.await, &ids[index]));
        }
        (AggregateStatus::for_best_effort(&outcomes), outcomes, None)
    }
}

/// Normalizes a join result into an outcome.
///
/// Runner futures catch their own panics, so a join error here can only mean
/// the runtime aborted the task; it is converted rather than propagated.
fn settle(joined: Result<TaskOutcome, JoinError>, id: &str) -> TaskOutcome {
    match joined {
        Ok(outcome) => outcome,
        Err(err) => TaskOutcome::Rejected {
            id: id.to_owned(),
            error: FetchError::Internal {
                message: err.to_string(),
            },
            elapsed_ms: 0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::time::Instant;

    use crate::fetch::{Entity, FetchSource};

    struct EchoSource;

    #[async_trait]
    impl FetchSource for EchoSource {
        async fn get(&self, id: &str) -> Result<Entity, FetchError> {
            Ok(Entity {
                name: id.to_owned(),
                image: None,
            })
        }
    }

    fn orchestrator() -> BatchOrchestrator {
        let mut cfg = Config::default();
        cfg.latency = Duration::from_millis(10);
        BatchOrchestrator::new(cfg, Arc::new(EchoSource), Vec::new())
    }

    fn spec(id: &str, ms: u64) -> TaskSpec {
        TaskSpec::new(id).with_latency(Duration::from_millis(ms))
    }

    fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
        let mut events = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            events.push(ev);
        }
        events
    }

    fn started_seq(events: &[Event], id: &str) -> u64 {
        events
            .iter()
            .find(|e| e.kind == EventKind::TaskStarted && e.task.as_deref() == Some(id))
            .unwrap_or_else(|| panic!("no TaskStarted for {id}"))
            .seq
    }

    fn settlement_seq(events: &[Event], id: &str) -> u64 {
        events
            .iter()
            .find(|e| e.is_settlement() && e.task.as_deref() == Some(id))
            .unwrap_or_else(|| panic!("no settlement for {id}"))
            .seq
    }

    #[tokio::test(start_paused = true)]
    async fn test_sequential_all_succeed() {
        let orch = orchestrator();
        let mut rx = orch.subscribe();
        let specs = vec![spec("pichu", 100), spec("pikachu", 150), spec("raichu", 200)];

        let t0 = Instant::now();
        let result = orch.run(specs, Policy::Sequential).await;
        let total = t0.elapsed();

        assert_eq!(result.status, AggregateStatus::Success);
        assert_eq!(result.outcomes.len(), 3);
        assert!(result.outcomes.iter().all(TaskOutcome::is_fulfilled));
        let ids: Vec<&str> = result.outcomes.iter().map(TaskOutcome::id).collect();
        assert_eq!(ids, vec!["pichu", "pikachu", "raichu"]);
        assert!(
            total >= Duration::from_millis(450),
            "sequential total must be the sum of latencies, got {total:?}"
        );

        // Runner i+1 launches only after runner i settles.
        let events = drain(&mut rx);
        assert!(started_seq(&events, "pikachu") > settlement_seq(&events, "pichu"));
        assert!(started_seq(&events, "raichu") > settlement_seq(&events, "pikachu"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_best_effort_all_succeed() {
        let orch = orchestrator();
        let specs = vec![
            spec("bulbasaur", 100),
            spec("ivysaur", 150),
            spec("venusaur", 200),
        ];

        let t0 = Instant::now();
        let result = orch.run(specs, Policy::ParallelBestEffort).await;
        let total = t0.elapsed();

        assert_eq!(result.status, AggregateStatus::Success);
        let ids: Vec<&str> = result.outcomes.iter().map(TaskOutcome::id).collect();
        assert_eq!(ids, vec!["bulbasaur", "ivysaur", "venusaur"]);
        assert!(
            total >= Duration::from_millis(200) && total < Duration::from_millis(450),
            "parallel total must track the slowest task, got {total:?}"
        );
        assert!(result.outcomes[2].elapsed_ms() >= 200);
    }

    #[tokio::test(start_paused = true)]
    async fn test_parallel_launches_all_before_any_settlement() {
        let orch = orchestrator();
        let mut rx = orch.subscribe();
        let specs = vec![spec("a", 50), spec("b", 100), spec("c", 150)];

        orch.run(specs, Policy::ParallelBestEffort).await;

        let events = drain(&mut rx);
        let started: Vec<&Event> = events
            .iter()
            .filter(|e| e.kind == EventKind::TaskStarted)
            .collect();
        let launch_order: Vec<&str> = started.iter().filter_map(|e| e.task.as_deref()).collect();
        assert_eq!(launch_order, vec!["a", "b", "c"], "launch follows input order");

        let max_started = started.iter().map(|e| e.seq).max().unwrap();
        let min_settled = events
            .iter()
            .filter(|e| e.is_settlement())
            .map(|e| e.seq)
            .min()
            .unwrap();
        assert!(
            max_started < min_settled,
            "all tasks must be launched before any settles"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_parallel_all_success_keeps_input_order() {
        let orch = orchestrator();
        // Completion order (c, b, a) is the reverse of input order.
        let specs = vec![spec("a", 300), spec("b", 200), spec("c", 100)];

        let result = orch.run(specs, Policy::ParallelAll).await;

        assert_eq!(result.status, AggregateStatus::Success);
        let ids: Vec<&str> = result.outcomes.iter().map(TaskOutcome::id).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(result.error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_parallel_all_discards_siblings_on_first_rejection() {
        let orch = orchestrator();
        let mut rx = orch.subscribe();
        let specs = vec![
            spec("charmander", 100),
            spec("charmeleon", 50).with_failure(),
            spec("charizard", 200),
        ];

        let result = orch.run(specs, Policy::ParallelAll).await;

        assert_eq!(result.status, AggregateStatus::TotalFailure);
        assert!(
            result.outcomes.is_empty(),
            "sibling results are discarded even though they would have succeeded"
        );
        assert_eq!(
            result.error,
            Some(FetchError::NotFound {
                entity: "charmeleon".into()
            })
        );

        // The siblings were never cancelled: let them settle and observe
        // their events arriving after BatchSettled.
        tokio::time::sleep(Duration::from_millis(300)).await;
        let events = drain(&mut rx);
        let settled_seq = events
            .iter()
            .find(|e| e.kind == EventKind::BatchSettled)
            .expect("BatchSettled must be published")
            .seq;
        for id in ["charmander", "charizard"] {
            let fetched = events
                .iter()
                .find(|e| e.kind == EventKind::TaskFetched && e.task.as_deref() == Some(id))
                .unwrap_or_else(|| panic!("{id} must still run to settlement"));
            assert!(fetched.seq > settled_seq);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_best_effort_keeps_every_outcome() {
        let orch = orchestrator();
        let specs = vec![
            spec("charmander", 100),
            spec("charmeleon", 50).with_failure(),
            spec("charizard", 200),
        ];

        let result = orch.run(specs, Policy::ParallelBestEffort).await;

        assert_eq!(result.status, AggregateStatus::PartialFailure);
        assert_eq!(result.outcomes.len(), 3);
        assert!(result.outcomes[0].is_fulfilled());
        assert!(result.outcomes[2].is_fulfilled());
        assert_eq!(
            result.outcomes[1].error().map(FetchError::as_label),
            Some("not_found")
        );
        assert!(result.error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sequential_failure_does_not_halt_sequence() {
        let orch = orchestrator();
        let specs = vec![
            spec("a", 10),
            spec("b", 10).with_failure(),
            spec("c", 10),
        ];

        let result = orch.run(specs, Policy::Sequential).await;

        assert_eq!(result.status, AggregateStatus::PartialFailure);
        assert_eq!(result.outcomes.len(), 3);
        assert!(result.outcomes[1].is_rejected());
        assert!(result.outcomes[2].is_fulfilled(), "c still runs after b fails");
    }

    #[tokio::test(start_paused = true)]
    async fn test_best_effort_all_rejected_is_total_failure() {
        let orch = orchestrator();
        let specs = vec![
            spec("a", 10).with_failure(),
            spec("b", 10).with_failure(),
        ];

        let result = orch.run(specs, Policy::ParallelBestEffort).await;

        assert_eq!(result.status, AggregateStatus::TotalFailure);
        assert_eq!(result.outcomes.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_identical_batches_settle_identically() {
        let orch = orchestrator();
        let specs = vec![
            spec("a", 20),
            spec("b", 10).with_failure(),
            spec("c", 30),
        ];

        let first = orch.run(specs.clone(), Policy::ParallelBestEffort).await;
        let second = orch.run(specs, Policy::ParallelBestEffort).await;

        assert_eq!(first.status, second.status);
        let first_ids: Vec<&str> = first.outcomes.iter().map(TaskOutcome::id).collect();
        let second_ids: Vec<&str> = second.outcomes.iter().map(TaskOutcome::id).collect();
        assert_eq!(first_ids, second_ids);
        assert_eq!(
            first.outcomes[1].error(),
            second.outcomes[1].error()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_batch_settles_success() {
        let orch = orchestrator();
        for policy in [
            Policy::Sequential,
            Policy::ParallelAll,
            Policy::ParallelBestEffort,
        ] {
            let result = orch.run(Vec::new(), policy).await;
            assert_eq!(result.status, AggregateStatus::Success, "policy {policy}");
            assert!(result.outcomes.is_empty());
            assert!(result.error.is_none());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_settled_carries_status_label() {
        let orch = orchestrator();
        let mut rx = orch.subscribe();
        let specs = vec![spec("a", 10), spec("b", 10).with_failure()];

        orch.run(specs, Policy::ParallelBestEffort).await;

        let events = drain(&mut rx);
        let settled = events
            .iter()
            .find(|e| e.kind == EventKind::BatchSettled)
            .expect("BatchSettled must be published");
        assert_eq!(settled.reason.as_deref(), Some("partial_failure"));
    }
}
