//! # Backend configuration.
//!
//! Provides [`Config`] centralized settings for the layout backend.
//!
//! Config is used in three places:
//! 1. **Negotiation**: `supported` / `allow_unstable` feed [`Compatibility`](crate::Compatibility)
//! 2. **Diagnostics**: `bus_capacity` sizes the event [`Bus`](crate::Bus)
//! 3. **Dispatch defaults**: `queue_capacity` via [`QueueExecutor::with_config`](crate::QueueExecutor::with_config)
//!
//! ## Sentinel values
//! - `bus_capacity = 0` → clamped to 1
//! - `queue_capacity = 0` → clamped to 1

use crate::version::ProtocolVersion;

/// Global configuration for the layout backend.
///
/// ## Field semantics
/// - `supported`: Protocol version the backend speaks (only `major` matters)
/// - `allow_unstable`: Accept providers reporting the unstable major `1`
/// - `bus_capacity`: Diagnostics bus ring buffer size (min 1)
/// - `queue_capacity`: Default per-consumer dispatch queue size (min 1)
#[derive(Clone, Debug)]
pub struct Config {
    /// Protocol version supported by this backend.
    ///
    /// Providers reporting a stable major greater than `supported.major` are rejected.
    pub supported: ProtocolVersion,

    /// Whether providers on the unstable protocol generation (major `1`) are accepted.
    ///
    /// Defaults to `true` in debug builds and `false` in release builds.
    pub allow_unstable: bool,

    /// Capacity of the diagnostics bus broadcast ring buffer.
    ///
    /// Receivers lagging more than `bus_capacity` events observe `Lagged` and skip ahead.
    pub bus_capacity: usize,

    /// Default capacity of a [`QueueExecutor`](crate::QueueExecutor) queue.
    pub queue_capacity: usize,
}

impl Config {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Returns a queue capacity clamped to a minimum of 1.
    #[inline]
    pub fn queue_capacity_clamped(&self) -> usize {
        self.queue_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `supported = ProtocolVersion::CURRENT`
    /// - `allow_unstable = cfg!(debug_assertions)`
    /// - `bus_capacity = 1024`
    /// - `queue_capacity = 1024`
    fn default() -> Self {
        Self {
            supported: ProtocolVersion::CURRENT,
            allow_unstable: cfg!(debug_assertions),
            bus_capacity: 1024,
            queue_capacity: 1024,
        }
    }
}
