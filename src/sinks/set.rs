//! # SinkSet: non-blocking fan-out over multiple event sinks
//!
//! [`SinkSet`] distributes each [`Event`](crate::events::Event) to multiple
//! sinks **without awaiting** their processing.
//!
//! ## What it guarantees
//! - `emit(&Event)` returns immediately.
//! - Per-sink FIFO (queue order).
//! - Panics inside sinks are caught and reported (isolation).
//!
//! ## What it does **not** guarantee
//! - No retries on per-sink queue overflow (events are dropped for that
//!   sink).

use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::events::Event;

use super::EventSink;

/// Per-sink channel with metadata
struct SinkChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Event>>,
}

/// Composite fan-out with per-sink bounded queues and worker tasks.
pub struct SinkSet {
    channels: Vec<SinkChannel>,
    workers: Vec<JoinHandle<()>>,
}

impl SinkSet {
    /// Creates a new set and spawns one worker per sink.
    #[must_use]
    pub fn new(sinks: Vec<Arc<dyn EventSink>>) -> Self {
        let mut channels = Vec::with_capacity(sinks.len());
        let mut workers = Vec::with_capacity(sinks.len());

        for sink in sinks {
            let cap = sink.queue_capacity().max(1);
            let name = sink.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Event>>(cap);
            let s = Arc::clone(&sink);

            let handle = tokio::spawn(async move {
                while let Some(ev) = rx.recv().await {
                    let fut = s.on_event(ev.as_ref());
                    if let Err(panic_err) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                        eprintln!("[fetchrace] sink '{}' panicked: {:?}", s.name(), panic_err);
                    }
                }
            });

            channels.push(SinkChannel { name, sender: tx });
            workers.push(handle);
        }

        Self { channels, workers }
    }

    /// Fan-out one event to all sinks (non-blocking).
    ///
    /// If a sink's queue is full or closed, the event is dropped for it and
    /// a warning is printed with the sink's name.
    pub fn emit(&self, event: &Event) {
        let ev = Arc::new(event.clone());
        for channel in &self.channels {
            match channel.sender.try_send(Arc::clone(&ev)) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    eprintln!(
                        "[fetchrace] sink '{}' dropped event: queue full",
                        channel.name
                    );
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    eprintln!(
                        "[fetchrace] sink '{}' dropped event: worker closed",
                        channel.name
                    );
                }
            }
        }
    }

    /// Graceful shutdown: close all queues and await worker completion.
    pub async fn shutdown(self) {
        drop(self.channels);
        for h in self.workers {
            let _ = h.await;
        }
    }

    /// True if there are no sinks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Number of sinks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.channels.len()
    }
}
