//! Search usage telemetry

use metrics::{counter, histogram};
use std::sync::atomic::{AtomicU64, Ordering};

/// Counter incremented per successful search
pub const SEARCH_SUCCESS: &str = "search.success";
/// Counter incremented per failed search
pub const SEARCH_ERROR: &str = "search.error";
/// Histogram of backend-reported search durations
pub const SEARCH_TOOK_MS: &str = "search.took_ms";

/// Receives one call per completed search
pub trait SearchUsage: Send + Sync {
    fn track_success(&self, took_ms: u64);
    fn track_error(&self);
}

/// Reports through the `metrics` facade
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSearchUsage;

impl SearchUsage for MetricsSearchUsage {
    #[allow(clippy::cast_precision_loss)]
    fn track_success(&self, took_ms: u64) {
        counter!(SEARCH_SUCCESS).increment(1);
        histogram!(SEARCH_TOOK_MS).record(took_ms as f64);
    }

    fn track_error(&self) {
        counter!(SEARCH_ERROR).increment(1);
    }
}

/// In-process counters
#[derive(Debug, Default)]
pub struct CountingSearchUsage {
    successes: AtomicU64,
    errors: AtomicU64,
    total_took_ms: AtomicU64,
}

impl CountingSearchUsage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn successes(&self) -> u64 {
        self.successes.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn errors(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn total_took_ms(&self) -> u64 {
        self.total_took_ms.load(Ordering::Relaxed)
    }
}

impl SearchUsage for CountingSearchUsage {
    fn track_success(&self, took_ms: u64) {
        self.successes.fetch_add(1, Ordering::Relaxed);
        self.total_took_ms.fetch_add(took_ms, Ordering::Relaxed);
    }

    fn track_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counting_usage() {
        let usage = CountingSearchUsage::new();
        usage.track_success(12);
        usage.track_success(30);
        usage.track_error();
        assert_eq!(usage.successes(), 2);
        assert_eq!(usage.errors(), 1);
        assert_eq!(usage.total_took_ms(), 42);
    }

    #[test]
    fn metrics_usage_without_recorder() {
        // No recorder installed: calls are no-ops.
        MetricsSearchUsage.track_success(5);
        MetricsSearchUsage.track_error();
    }
}
