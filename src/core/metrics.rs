//! Logger metrics for observability
//!
//! Per-node counters describing what a logger's worker did with the messages
//! it was given.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for one logger node
///
/// # Example
///
/// ```
/// use rust_logger_tree::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_enqueued();
/// metrics.record_filtered();
///
/// assert_eq!(metrics.enqueued(), 1);
/// assert_eq!(metrics.filtered(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Messages accepted by `log` onto the node's queue
    enqueued: AtomicU64,

    /// Messages rejected by the filter chain
    filtered: AtomicU64,

    /// Messages every sink handled without error
    delivered: AtomicU64,

    /// Individual sink invocations that failed or panicked
    sink_failures: AtomicU64,

    /// Messages the parent refused (usually because it was disposed)
    forward_failures: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            enqueued: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            delivered: AtomicU64::new(0),
            sink_failures: AtomicU64::new(0),
            forward_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn forward_failures(&self) -> u64 {
        self.forward_failures.load(Ordering::Relaxed)
    }

    /// Record an enqueued message, returning the previous count
    #[inline]
    pub fn record_enqueued(&self) -> u64 {
        self.enqueued.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_delivered(&self) -> u64 {
        self.delivered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_failure(&self) -> u64 {
        self.sink_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_forward_failure(&self) -> u64 {
        self.forward_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of processed messages rejected by filters, as a percentage (0.0 - 100.0)
    ///
    /// Returns 0.0 if nothing has been processed.
    pub fn filter_rate(&self) -> f64 {
        let filtered = self.filtered() as f64;
        let total = self.delivered() as f64 + filtered;
        if total == 0.0 {
            0.0
        } else {
            (filtered / total) * 100.0
        }
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.enqueued.store(0, Ordering::Relaxed);
        self.filtered.store(0, Ordering::Relaxed);
        self.delivered.store(0, Ordering::Relaxed);
        self.sink_failures.store(0, Ordering::Relaxed);
        self.forward_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            enqueued: AtomicU64::new(self.enqueued()),
            filtered: AtomicU64::new(self.filtered()),
            delivered: AtomicU64::new(self.delivered()),
            sink_failures: AtomicU64::new(self.sink_failures()),
            forward_failures: AtomicU64::new(self.forward_failures()),
        }
    }
}
