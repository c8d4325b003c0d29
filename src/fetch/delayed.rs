//! # Delayed fetcher: artificial latency in front of the remote call.
//!
//! [`DelayedFetcher`] wraps a [`FetchSource`] with a two-phase cost:
//! an unconditional artificial wait, then the remote call. The wait is not
//! cancellable and always completes before the remote call is attempted —
//! it exists so the scheduling policies have something observable to race.
//!
//! ## Flow
//! ```text
//! fetch(spec):
//!   sleep(spec latency | default) ──► publish TaskDelayed
//!     ├─ spec marked failing ──► Err(NotFound)   (source never consulted)
//!     └─ otherwise           ──► source.get(id)
//! ```
//!
//! The failure switch on [`TaskSpec`] is deterministic by design: it models
//! the remote reporting "no such entity" without depending on the network or
//! on chance.

use std::time::Duration;

use tokio::time;

use crate::batch::TaskSpec;
use crate::error::FetchError;
use crate::events::{Bus, Event, EventKind};
use crate::fetch::source::{Entity, SourceRef};

/// Wraps a single named lookup with an artificial latency and a fallible
/// remote call.
pub struct DelayedFetcher {
    source: SourceRef,
    latency: Duration,
}

impl DelayedFetcher {
    /// Creates a fetcher over `source` with the given default latency.
    ///
    /// Individual specs may override the latency per task.
    pub fn new(source: SourceRef, latency: Duration) -> Self {
        Self { source, latency }
    }

    /// Fetches one entity, publishing `TaskDelayed` once the wait completes.
    ///
    /// The artificial wait always runs to completion first; failures from
    /// the remote source are returned as typed errors, never panics.
    pub async fn fetch(&self, spec: &TaskSpec, bus: &Bus) -> Result<Entity, FetchError> {
        let wait = spec.latency().unwrap_or(self.latency);
        time::sleep(wait).await;
        bus.publish(Event::new(EventKind::TaskDelayed).with_task(spec.id()));

        if spec.should_fail() {
            return Err(FetchError::NotFound {
                entity: spec.id().to_owned(),
            });
        }
        self.source.get(spec.id()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::time::Instant;

    use crate::fetch::source::FetchSource;

    struct CountingSource {
        calls: AtomicUsize,
    }

    impl CountingSource {
        fn arc() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl FetchSource for CountingSource {
        async fn get(&self, id: &str) -> Result<Entity, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Entity {
                name: id.to_owned(),
                image: None,
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_completes_before_source_call() {
        let source = CountingSource::arc();
        let fetcher = DelayedFetcher::new(source.clone(), Duration::from_millis(800));
        let bus = Bus::new(16);
        let spec = TaskSpec::new("pichu");

        let t0 = Instant::now();
        let entity = fetcher.fetch(&spec, &bus).await.unwrap();

        assert_eq!(entity.name, "pichu");
        assert!(
            t0.elapsed() >= Duration::from_millis(800),
            "source call must come after the artificial wait"
        );
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_per_spec_latency_override() {
        let source = CountingSource::arc();
        let fetcher = DelayedFetcher::new(source, Duration::from_millis(800));
        let bus = Bus::new(16);
        let spec = TaskSpec::new("pichu").with_latency(Duration::from_millis(50));

        let t0 = Instant::now();
        fetcher.fetch(&spec, &bus).await.unwrap();

        let elapsed = t0.elapsed();
        assert!(elapsed >= Duration::from_millis(50));
        assert!(
            elapsed < Duration::from_millis(800),
            "override must replace the default latency, got {elapsed:?}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_spec_never_reaches_source() {
        let source = CountingSource::arc();
        let fetcher = DelayedFetcher::new(source.clone(), Duration::from_millis(10));
        let bus = Bus::new(16);
        let spec = TaskSpec::new("fakemon").with_failure();

        let err = fetcher.fetch(&spec, &bus).await.unwrap_err();
        assert_eq!(
            err,
            FetchError::NotFound {
                entity: "fakemon".into()
            }
        );
        assert_eq!(
            source.calls.load(Ordering::SeqCst),
            0,
            "failure injection must not consult the source"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_delayed_event_published_after_wait() {
        let source = CountingSource::arc();
        let fetcher = DelayedFetcher::new(source, Duration::from_millis(10));
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let spec = TaskSpec::new("pichu");

        fetcher.fetch(&spec, &bus).await.unwrap();

        let ev = rx.try_recv().expect("TaskDelayed must be on the bus");
        assert_eq!(ev.kind, EventKind::TaskDelayed);
        assert_eq!(ev.task.as_deref(), Some("pichu"));
    }
}
