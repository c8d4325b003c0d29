//! # Task specification for batch execution.
//!
//! [`TaskSpec`] describes one named fetch operation: the entity id, a display
//! label, an optional per-task latency override, and a deterministic failure
//! switch. Specs are immutable once submitted to a batch.
//!
//! ## Rules
//! - `id` must be unique within a batch (outcomes are keyed by it).
//! - The failure switch is deterministic by design; there is no random
//!   failure injection anywhere in the engine.

use std::time::Duration;

/// Specification for one fetch task in a batch.
///
/// ## Example
/// ```
/// use std::time::Duration;
/// use fetchrace::TaskSpec;
///
/// let spec = TaskSpec::new("pikachu")
///     .with_label("Pikachu")
///     .with_latency(Duration::from_millis(200));
///
/// assert_eq!(spec.id(), "pikachu");
/// assert_eq!(spec.label(), "Pikachu");
/// assert!(!spec.should_fail());
/// ```
#[derive(Clone, Debug)]
pub struct TaskSpec {
    id: String,
    label: String,
    latency: Option<Duration>,
    fail: bool,
}

impl TaskSpec {
    /// Creates a spec for the given entity id; the label defaults to the id.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            latency: None,
            fail: false,
        }
    }

    /// Returns a new spec with the given display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Returns a new spec with a per-task latency override.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Returns a new spec marked to fail deterministically.
    ///
    /// The delayed fetcher reports the entity as not found after the
    /// artificial wait, without consulting the remote source.
    pub fn with_failure(mut self) -> Self {
        self.fail = true;
        self
    }

    /// Entity id, unique within a batch.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Per-task latency override, if configured.
    pub fn latency(&self) -> Option<Duration> {
        self.latency
    }

    /// True when the spec is marked to fail deterministically.
    pub fn should_fail(&self) -> bool {
        self.fail
    }
}
