//! Error types produced by fetch operations.
//!
//! A single enum, [`FetchError`], covers the whole taxonomy:
//!
//! - [`FetchError::NotFound`] — the remote source has no entity for the id.
//! - [`FetchError::Network`] — any other non-success transport outcome
//!   (HTTP status, connect failure, body decode).
//! - [`FetchError::Internal`] — an unexpected panic inside a task runner,
//!   caught and converted instead of crashing the batch.
//!
//! Errors never escape a runner uncaught: every failure is normalized into a
//! `TaskOutcome::Rejected`, and only the batch orchestrator may turn a
//! per-task rejection into a batch-level total failure.

use thiserror::Error;

/// # Errors produced by a single fetch operation.
///
/// Variants carry plain string payloads so that outcomes stay cheap to clone
/// and compare; the underlying transport error is flattened into the message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The remote source reported that no entity exists for the given id.
    #[error("not found: {entity}")]
    NotFound {
        /// The entity id that was looked up.
        entity: String,
    },

    /// Any other non-success transport outcome (status, connect, decode).
    #[error("network error: {message}")]
    Network {
        /// Description of the transport failure.
        message: String,
    },

    /// Unexpected panic inside a task runner, caught at the runner boundary.
    #[error("internal error: {message}")]
    Internal {
        /// The captured panic payload, if any.
        message: String,
    },
}

impl FetchError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use fetchrace::FetchError;
    ///
    /// let err = FetchError::NotFound { entity: "fakemon".into() };
    /// assert_eq!(err.as_label(), "not_found");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            FetchError::NotFound { .. } => "not_found",
            FetchError::Network { .. } => "network",
            FetchError::Internal { .. } => "internal",
        }
    }
}
