//! # Run a single task to settlement.
//!
//! [`TaskRunner`] executes one [`TaskSpec`] through the delayed fetcher and
//! produces exactly one [`TaskOutcome`], publishing lifecycle events along
//! the way.
//!
//! ## Event flow
//! ```text
//! Launch (synchronous):
//!   start(spec) → publish TaskStarted, stamp the clock
//!
//! Settlement (in the returned future):
//!   fetch → Ok(entity)  → publish TaskFetched → Fulfilled
//!        → Err(error)   → publish TaskFailed  → Rejected
//!        → panic        → publish TaskFailed  → Rejected(Internal)
//! ```
//!
//! ## Rules
//! - The synchronous part of [`TaskRunner::start`] emits `TaskStarted` and
//!   records the start instant **before** returning the future. Launching a
//!   whole batch therefore emits all `TaskStarted` events in input order,
//!   before any task reaches its first suspension point.
//! - Exactly one terminal event per task: `TaskFetched` or `TaskFailed`.
//! - `elapsed_ms` is computed from wall clock at settlement on both
//!   branches.
//! - Nothing escapes the runner boundary: fetch panics are caught and
//!   normalized to [`FetchError::Internal`] so the orchestrator can apply
//!   policy uniformly.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::time::Instant;

use crate::batch::outcome::TaskOutcome;
use crate::batch::spec::TaskSpec;
use crate::error::FetchError;
use crate::events::{Bus, Event, EventKind};
use crate::fetch::DelayedFetcher;

/// Executes one spec to settlement, publishing lifecycle events to the bus.
pub struct TaskRunner {
    fetcher: Arc<DelayedFetcher>,
    bus: Bus,
}

impl TaskRunner {
    /// Creates a runner over the shared fetcher and bus.
    pub fn new(fetcher: Arc<DelayedFetcher>, bus: Bus) -> Self {
        Self { fetcher, bus }
    }

    /// Launches one task: emits `TaskStarted` now, returns the settlement
    /// future.
    ///
    /// The returned future never panics past its boundary; every failure is
    /// captured and returned as a `Rejected` outcome.
    pub fn start(&self, spec: TaskSpec) -> impl Future<Output = TaskOutcome> + Send + 'static {
        let started = Instant::now();
        self.bus
            .publish(Event::new(EventKind::TaskStarted).with_task(spec.id()));

        let fetcher = Arc::clone(&self.fetcher);
        let bus = self.bus.clone();

        async move {
            let fetched = AssertUnwindSafe(fetcher.fetch(&spec, &bus))
                .catch_unwind()
                .await;
            let elapsed = started.elapsed();
            let elapsed_ms = millis(elapsed);

            match fetched {
                Ok(Ok(value)) => {
                    publish_fetched(&bus, spec.id(), elapsed);
                    TaskOutcome::Fulfilled {
                        id: spec.id().to_owned(),
                        value,
                        elapsed_ms,
                    }
                }
                Ok(Err(error)) => {
                    publish_failed(&bus, spec.id(), &error, elapsed);
                    TaskOutcome::Rejected {
                        id: spec.id().to_owned(),
                        error,
                        elapsed_ms,
                    }
                }
                Err(payload) => {
                    let error = FetchError::Internal {
                        message: panic_message(payload),
                    };
                    publish_failed(&bus, spec.id(), &error, elapsed);
                    TaskOutcome::Rejected {
                        id: spec.id().to_owned(),
                        error,
                        elapsed_ms,
                    }
                }
            }
        }
    }
}

/// Publishes `TaskFetched` (successful settlement).
fn publish_fetched(bus: &Bus, id: &str, elapsed: Duration) {
    bus.publish(
        Event::new(EventKind::TaskFetched)
            .with_task(id)
            .with_elapsed(elapsed),
    );
}

/// Publishes `TaskFailed` with error details.
fn publish_failed(bus: &Bus, id: &str, err: &FetchError, elapsed: Duration) {
    bus.publish(
        Event::new(EventKind::TaskFailed)
            .with_task(id)
            .with_reason(err.to_string())
            .with_elapsed(elapsed),
    );
}

fn millis(d: Duration) -> u64 {
    d.as_millis().min(u128::from(u64::MAX)) as u64
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "task panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;

    use crate::fetch::{Entity, FetchSource, SourceRef};

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

    struct PanickySource;

    #[async_trait]
    impl FetchSource for PanickySource {
        async fn get(&self, _id: &str) -> Result<Entity, FetchError> {
            panic!("wire tripped");
        }
    }

    fn runner(source: SourceRef, bus: &Bus) -> TaskRunner {
        let fetcher = Arc::new(DelayedFetcher::new(source, Duration::from_millis(10)));
        TaskRunner::new(fetcher, bus.clone())
    }

    fn drain(rx: &mut tokio::sync::broadcast::Receiver<Event>) -> Vec<Event> {
        let mut events = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            events.push(ev);
        }
        events
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_emits_started_delayed_fetched() {
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let runner = runner(Arc::new(EchoSource), &bus);

        let outcome = runner.start(TaskSpec::new("pichu")).await;

        assert!(outcome.is_fulfilled());
        assert_eq!(outcome.id(), "pichu");
        assert!(outcome.elapsed_ms() >= 10);

        let kinds: Vec<EventKind> = drain(&mut rx).into_iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::TaskStarted,
                EventKind::TaskDelayed,
                EventKind::TaskFetched
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_is_captured_not_thrown() {
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();
        let runner = runner(Arc::new(EchoSource), &bus);

        let outcome = runner.start(TaskSpec::new("fakemon").with_failure()).await;

        assert!(outcome.is_rejected());
        assert_eq!(outcome.error().map(FetchError::as_label), Some("not_found"));

        let events = drain(&mut rx);
        let failed = events
            .iter()
            .find(|e| e.kind == EventKind::TaskFailed)
            .expect("TaskFailed must be published");
        assert_eq!(failed.reason.as_deref(), Some("not found: fakemon"));
        assert!(failed.elapsed_ms.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_panic_normalized_to_internal_error() {
        let bus = Bus::new(64);
        let runner = runner(Arc::new(PanickySource), &bus);

        let outcome = runner.start(TaskSpec::new("pichu")).await;

        assert!(outcome.is_rejected());
        match outcome.error() {
            Some(FetchError::Internal { message }) => {
                assert!(message.contains("wire tripped"), "got message {message:?}");
            }
            other => panic!("expected internal error, got {other:?}"),
        }
    }
}
