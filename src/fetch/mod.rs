//! # Fetching: the remote source seam and the delayed fetcher.
//!
//! - [`FetchSource`] — trait for the remote collaborator
//! - [`SourceRef`] — shared handle (`Arc<dyn FetchSource>`)
//! - [`HttpSource`] — reqwest-backed implementation
//! - [`DelayedFetcher`] — artificial latency in front of the source call
//! - [`Entity`] — the decoded remote body

mod delayed;
mod http;
mod source;

pub use delayed::DelayedFetcher;
pub use http::HttpSource;
pub use source::{Entity, FetchSource, SourceRef};
