//! Routing counters for a logging context

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters describing what the router did with emitted records.
///
/// # Example
///
/// ```
/// use cmd_helper::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_routed(2);
/// metrics.record_unrouted();
///
/// assert_eq!(metrics.total_records(), 2);
/// assert_eq!(metrics.deliveries(), 2);
/// ```
#[derive(Debug, Default)]
pub struct LoggerMetrics {
    /// Records accepted by at least one sink
    routed: AtomicU64,

    /// Records no sink accepted
    unrouted: AtomicU64,

    /// Sum over records of the number of accepting sinks
    deliveries: AtomicU64,

    /// Sink emit or flush calls that returned an error
    sink_failures: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            routed: AtomicU64::new(0),
            unrouted: AtomicU64::new(0),
            deliveries: AtomicU64::new(0),
            sink_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn record_routed(&self, sinks: u64) {
        self.routed.fetch_add(1, Ordering::Relaxed);
        self.deliveries.fetch_add(sinks, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_unrouted(&self) {
        self.unrouted.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_failure(&self) {
        self.sink_failures.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn routed(&self) -> u64 {
        self.routed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn unrouted(&self) -> u64 {
        self.unrouted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn deliveries(&self) -> u64 {
        self.deliveries.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures.load(Ordering::Relaxed)
    }

    pub fn total_records(&self) -> u64 {
        self.routed() + self.unrouted()
    }
}
