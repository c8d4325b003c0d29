//! # fetchrace
//!
//! **fetchrace** is a didactic batch-fetch orchestrator: it runs a fixed set
//! of named asynchronous lookups under three scheduling policies and surfaces
//! per-task timing and outcome through an ordered event stream.
//!
//! ## Architecture
//! ```text
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │   TaskSpec   │   │   TaskSpec   │   │   TaskSpec   │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────┐
//! │  BatchOrchestrator (policy engine)                        │
//! │  - Sequential / ParallelAll / ParallelBestEffort          │
//! │  - Bus (broadcast events)                                 │
//! │  - SinkSet (fans out to event sinks)                      │
//! └──────┬──────────────────┬──────────────────┬──────────────┘
//!        ▼                  ▼                  ▼
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │  TaskRunner  │   │  TaskRunner  │   │  TaskRunner  │
//!     └──────┬───────┘   └──────┬───────┘   └──────┬───────┘
//!            ▼                  ▼                  ▼
//!     DelayedFetcher ── artificial wait, then FetchSource::get
//!            │
//!            ▼
//!     Events: TaskStarted → TaskDelayed → TaskFetched | TaskFailed
//!                           ... → BatchSettled
//! ```
//!
//! ## Policies
//! | Policy               | Launch                 | Settles when             | On rejection                          |
//! |----------------------|------------------------|--------------------------|---------------------------------------|
//! | `Sequential`         | one at a time          | last runner settles      | recorded, sequence continues          |
//! | `ParallelAll`        | all at once            | first rejection or all   | total failure, sibling results dropped|
//! | `ParallelBestEffort` | all at once            | every runner settled     | recorded per task, index-aligned      |
//!
//! "Parallel" means concurrently in-flight on the async runtime, not
//! multi-core execution. Once launched, a runner always runs to settlement —
//! there is no cancellation and no timeout.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use async_trait::async_trait;
//! use fetchrace::{
//!     BatchOrchestrator, Config, Entity, FetchError, FetchSource, Policy, TaskSpec,
//! };
//!
//! struct Fixture;
//!
//! #[async_trait]
//! impl FetchSource for Fixture {
//!     async fn get(&self, id: &str) -> Result<Entity, FetchError> {
//!         Ok(Entity { name: id.to_owned(), image: None })
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let mut cfg = Config::default();
//!     cfg.latency = Duration::from_millis(5);
//!
//!     let orchestrator = BatchOrchestrator::new(cfg, Arc::new(Fixture), Vec::new());
//!     let specs = vec![TaskSpec::new("pichu"), TaskSpec::new("pikachu")];
//!
//!     let result = orchestrator.run(specs, Policy::ParallelBestEffort).await;
//!     assert!(result.is_success());
//!     assert_eq!(result.outcomes.len(), 2);
//! }
//! ```
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.

mod batch;
mod config;
mod error;
mod events;
mod fetch;
mod sinks;

// ---- Public re-exports ----

pub use batch::{AggregateStatus, BatchOrchestrator, BatchResult, Policy, TaskOutcome, TaskRunner, TaskSpec};
pub use config::Config;
pub use error::FetchError;
pub use events::{Bus, Event, EventKind};
pub use fetch::{DelayedFetcher, Entity, FetchSource, HttpSource, SourceRef};
pub use sinks::{EventSink, SinkSet};

// Optional: expose a simple built-in logging sink (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use sinks::LogWriter;
