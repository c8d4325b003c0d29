//! # Batch execution: specs, runners, policies, outcomes.
//!
//! This module provides the orchestration core:
//! - [`TaskSpec`] — one named fetch operation
//! - [`TaskRunner`] — runs one spec to settlement, emitting events
//! - [`BatchOrchestrator`] — drives a batch under a [`Policy`]
//! - [`TaskOutcome`], [`BatchResult`], [`AggregateStatus`] — settlement model

mod orchestrator;
mod outcome;
mod runner;
mod spec;

pub use orchestrator::BatchOrchestrator;
pub use outcome::{AggregateStatus, BatchResult, Policy, TaskOutcome};
pub use runner::TaskRunner;
pub use spec::TaskSpec;
