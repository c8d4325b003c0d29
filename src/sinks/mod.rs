//! # Event sinks: the consumer side of the event stream.
//!
//! The engine publishes lifecycle events to a bus; a [`SinkSet`] fans them
//! out to registered [`EventSink`]s without blocking the publishers. Sinks
//! decide for themselves whether to buffer, render, or drop events.
//!
//! ```text
//! Runner / Fetcher / Orchestrator ── publish ──► Bus ──► listener ──► SinkSet
//!                                                            ┌─────────┼─────────┐
//!                                                            ▼         ▼         ▼
//!                                                       [queue S1] [queue S2] [queue SN]
//!                                                            │         │         │
//!                                                       worker S1  worker S2  worker SN
//!                                                            │         │         │
//!                                                      sink.on_event(&Event) (per sink)
//! ```

mod set;
mod sink;

#[cfg(feature = "logging")]
mod log;

pub use set::SinkSet;
pub use sink::EventSink;

#[cfg(feature = "logging")]
pub use log::LogWriter;
