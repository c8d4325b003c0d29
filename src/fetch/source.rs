//! # Remote source abstraction.
//!
//! This module defines the [`FetchSource`] trait — the seam between the
//! engine and the concrete data source — and the [`Entity`] value it
//! produces. The common handle type is [`SourceRef`], an
//! `Arc<dyn FetchSource>` suitable for sharing across runners.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::FetchError;

/// Decoded remote entity: a display name plus an optional image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// Canonical name reported by the source.
    pub name: String,
    /// Image URL, when the source provides one.
    pub image: Option<String>,
}

/// # Asynchronous lookup against a remote data source.
///
/// Implementations must convert every non-success condition into a typed
/// [`FetchError`] — never panic, never return transport errors raw.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use fetchrace::{Entity, FetchError, FetchSource};
///
/// struct Fixture;
///
/// #[async_trait]
/// impl FetchSource for Fixture {
///     async fn get(&self, id: &str) -> Result<Entity, FetchError> {
///         Ok(Entity { name: id.to_owned(), image: None })
///     }
/// }
/// ```
#[async_trait]
pub trait FetchSource: Send + Sync + 'static {
    /// Looks up one entity by id.
    async fn get(&self, id: &str) -> Result<Entity, FetchError>;
}

/// Shared handle to a fetch source.
pub type SourceRef = Arc<dyn FetchSource>;
