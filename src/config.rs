//! Global orchestrator configuration.
//!
//! [`Config`] bundles the options passed into the
//! [`BatchOrchestrator`](crate::BatchOrchestrator) constructor: the remote
//! endpoint base, the default artificial latency, and the bus capacity.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use fetchrace::Config;
//!
//! let mut cfg = Config::default();
//! cfg.latency = Duration::from_millis(200);
//! cfg.bus_capacity = 256;
//!
//! assert_eq!(cfg.latency, Duration::from_millis(200));
//! ```

use std::time::Duration;

/// Configuration for a batch orchestrator.
///
/// Controls the remote endpoint, the default artificial latency applied
/// before every remote call, and the event bus capacity. Individual task
/// specs may override the latency per task.
#[derive(Clone, Debug)]
pub struct Config {
    /// Root URL of the remote data source (`GET {endpoint_base}/{id}`).
    pub endpoint_base: String,
    /// Default artificial latency applied before each remote call.
    pub latency: Duration,
    /// Capacity of the event bus channel.
    pub bus_capacity: usize,
}

impl Default for Config {
    /// Provides the demo defaults:
    /// - `endpoint_base = "https://pokeapi.co/api/v2/pokemon"`
    /// - `latency = 800ms`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            endpoint_base: "https://pokeapi.co/api/v2/pokemon".to_string(),
            latency: Duration::from_millis(800),
            bus_capacity: 1024,
        }
    }
}
