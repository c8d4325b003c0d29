//! # Core event sink trait
//!
//! `EventSink` is the extension point for plugging renderers into the
//! engine: console loggers, terminal views, UI adapters. Each sink is driven
//! by a dedicated worker loop fed from a bounded queue owned by the
//! [`SinkSet`](crate::sinks::SinkSet).
//!
//! ## Contract
//! - Implementations may be slow (I/O, batching) — they do **not** block the
//!   publisher nor other sinks.
//! - Events arrive in emission order, but events for different tasks are
//!   interleaved when tasks run concurrently; do not assume a task's events
//!   arrive contiguously.
//! - Each sink **declares** its preferred queue capacity via
//!   [`EventSink::queue_capacity`]. If the queue overflows, events for that
//!   sink are dropped.

use async_trait::async_trait;

use crate::events::Event;

/// Contract for event consumers.
///
/// Called from a sink-dedicated worker task. Implementations should avoid
/// blocking the async runtime (prefer async I/O and cooperative waits).
#[async_trait]
pub trait EventSink: Send + Sync + 'static {
    /// Handle a single event for this sink.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for drop warnings).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred capacity of this sink's queue.
    ///
    /// On overflow, events for this sink are dropped.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
