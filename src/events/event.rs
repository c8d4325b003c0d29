//! # Lifecycle events emitted by task runners and the batch orchestrator.
//!
//! The [`EventKind`] enum classifies the stream:
//! - **Task lifecycle**: started, delayed, fetched, failed
//! - **Batch terminal**: settled
//!
//! The [`Event`] struct carries metadata such as the task id, a failure
//! reason, and the elapsed wall-clock time at settlement.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically at emission. Events from one runner appear in lifecycle
//! order; interleaving across concurrent runners is scheduler-determined,
//! so consumers must not assume all events for a task arrive contiguously.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use fetchrace::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TaskFailed)
//!     .with_task("fakemon")
//!     .with_reason("not found: fakemon")
//!     .with_elapsed(Duration::from_millis(812));
//!
//! assert_eq!(ev.kind, EventKind::TaskFailed);
//! assert_eq!(ev.task.as_deref(), Some("fakemon"));
//! assert_eq!(ev.elapsed_ms, Some(812));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A task runner was launched.
    ///
    /// Sets:
    /// - `task`: task id
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ///
    /// Under the parallel policies this is emitted synchronously, in input
    /// order, before any task reaches its first suspension point.
    TaskStarted,

    /// The artificial latency wait completed; the remote call is next.
    ///
    /// Sets:
    /// - `task`: task id
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskDelayed,

    /// The fetch settled successfully.
    ///
    /// Sets:
    /// - `task`: task id
    /// - `elapsed_ms`: wall-clock time from launch to settlement
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskFetched,

    /// The fetch settled with an error.
    ///
    /// Sets:
    /// - `task`: task id
    /// - `reason`: failure message
    /// - `elapsed_ms`: wall-clock time from launch to settlement
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    TaskFailed,

    /// The batch settled and its result was produced.
    ///
    /// Sets:
    /// - `reason`: aggregate status label
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ///
    /// Under the all-or-nothing policy, discarded sibling runners may still
    /// emit their settlement events after this one.
    BatchSettled,
}

/// Lifecycle event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Debug, Clone)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,

    /// Elapsed time from launch to settlement, in milliseconds.
    pub elapsed_ms: Option<u64>,
    /// Human-readable reason (failure message, status label).
    pub reason: Option<Arc<str>>,
    /// Id of the task, if applicable.
    pub task: Option<Arc<str>>,
    /// Event classification.
    pub kind: EventKind,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next
    /// sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            kind,
            at: SystemTime::now(),
            elapsed_ms: None,
            reason: None,
            task: None,
        }
    }

    /// Attaches a task id.
    #[inline]
    pub fn with_task(mut self, task: impl Into<Arc<str>>) -> Self {
        self.task = Some(task.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches an elapsed duration (stored as milliseconds).
    #[inline]
    pub fn with_elapsed(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u64::MAX)) as u64;
        self.elapsed_ms = Some(ms);
        self
    }

    /// True for the per-task terminal events (`TaskFetched` / `TaskFailed`).
    #[inline]
    pub fn is_settlement(&self) -> bool {
        matches!(self.kind, EventKind::TaskFetched | EventKind::TaskFailed)
    }
}
