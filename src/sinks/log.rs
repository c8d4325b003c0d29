//! # Simple logging sink for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//!
//! ## Output format
//! ```text
//! [started] task=pichu
//! [delayed] task=pichu
//! [fetched] task=pichu elapsed_ms=812
//! [failed] task=fakemon err="not found: fakemon" elapsed_ms=807
//! [settled] status=partial_failure
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::sinks::EventSink;

/// Simple stdout logging sink.
///
/// Enabled via the `logging` feature. Not intended for production use —
/// implement a custom [`EventSink`] for structured output.
pub struct LogWriter;

#[async_trait]
impl EventSink for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::TaskStarted => {
                if let Some(task) = &e.task {
                    println!("[started] task={task}");
                }
            }
            EventKind::TaskDelayed => {
                if let Some(task) = &e.task {
                    println!("[delayed] task={task}");
                }
            }
            EventKind::TaskFetched => {
                println!(
                    "[fetched] task={:?} elapsed_ms={:?}",
                    e.task, e.elapsed_ms
                );
            }
            EventKind::TaskFailed => {
                println!(
                    "[failed] task={:?} err={:?} elapsed_ms={:?}",
                    e.task, e.reason, e.elapsed_ms
                );
            }
            EventKind::BatchSettled => {
                println!("[settled] status={:?}", e.reason);
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
