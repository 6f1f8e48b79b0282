//! Application metrics collection and reporting.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::Instant;

use metrics::{counter, histogram};

/// Metrics collector for the atlas API.
///
/// Counters are recorded twice: as atomics rendered by the `/metrics`
/// handler, and through the `metrics` facade for the Prometheus recorder.
#[derive(Debug)]
pub struct MetricsCollector {
    pub requests: AtomicU64,
    pub capabilities_requests: AtomicU64,
    pub print_requests: AtomicU64,
    pub print_errors: AtomicU64,

    export_times: RwLock<TimingStats>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            requests: AtomicU64::new(0),
            capabilities_requests: AtomicU64::new(0),
            print_requests: AtomicU64::new(0),
            print_errors: AtomicU64::new(0),
            export_times: RwLock::new(TimingStats::default()),
        }
    }

    /// Record a request hitting the OWS endpoint.
    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
        counter!("atlas_requests_total").increment(1);
    }

    /// Record a GetCapabilities request.
    pub fn record_capabilities_request(&self) {
        self.capabilities_requests.fetch_add(1, Ordering::Relaxed);
        counter!("atlas_capabilities_requests_total").increment(1);
    }

    /// Record a GetPrint request.
    pub fn record_print_request(&self) {
        self.print_requests.fetch_add(1, Ordering::Relaxed);
        counter!("atlas_prints_total").increment(1);
    }

    /// Record a GetPrint request answered with an internal error.
    pub fn record_print_error(&self) {
        self.print_errors.fetch_add(1, Ordering::Relaxed);
        counter!("atlas_print_errors_total").increment(1);
    }

    /// Record the wall time of an engine export.
    pub fn record_export_duration(&self, duration_us: u64) {
        if let Ok(mut stats) = self.export_times.write() {
            stats.record(duration_us);
        }
        histogram!("atlas_export_duration_seconds").record(duration_us as f64 / 1_000_000.0);
    }

    /// Snapshot of export timing for the `/metrics` text rendering.
    pub fn export_timing(&self) -> TimingSnapshot {
        self.export_times
            .read()
            .map(|stats| stats.snapshot())
            .unwrap_or_default()
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Timing helpers
// ============================================================================

#[derive(Debug, Default)]
struct TimingStats {
    count: u64,
    total_us: u64,
    min_us: u64,
    max_us: u64,
    last_us: u64,
}

impl TimingStats {
    fn record(&mut self, duration_us: u64) {
        self.count += 1;
        self.total_us += duration_us;
        self.last_us = duration_us;
        if self.min_us == 0 || duration_us < self.min_us {
            self.min_us = duration_us;
        }
        if duration_us > self.max_us {
            self.max_us = duration_us;
        }
    }

    fn snapshot(&self) -> TimingSnapshot {
        TimingSnapshot {
            count: self.count,
            avg_ms: if self.count == 0 {
                0.0
            } else {
                (self.total_us as f64 / self.count as f64) / 1000.0
            },
            min_ms: self.min_us as f64 / 1000.0,
            max_ms: self.max_us as f64 / 1000.0,
            last_ms: self.last_us as f64 / 1000.0,
        }
    }
}

/// Copyable view of timing stats.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimingSnapshot {
    pub count: u64,
    pub avg_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub last_ms: f64,
}

/// Simple wall clock timer.
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_micros() as f64 / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_stats_min_max() {
        let mut stats = TimingStats::default();
        stats.record(2000);
        stats.record(500);
        stats.record(4000);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.count, 3);
        assert_eq!(snapshot.min_ms, 0.5);
        assert_eq!(snapshot.max_ms, 4.0);
        assert_eq!(snapshot.last_ms, 4.0);
    }

    #[test]
    fn test_empty_timing_snapshot() {
        let collector = MetricsCollector::new();
        let snapshot = collector.export_timing();
        assert_eq!(snapshot.count, 0);
        assert_eq!(snapshot.avg_ms, 0.0);
    }

    #[test]
    fn test_counters_increment() {
        let collector = MetricsCollector::new();
        collector.record_request();
        collector.record_request();
        collector.record_print_request();

        assert_eq!(collector.requests.load(Ordering::Relaxed), 2);
        assert_eq!(collector.print_requests.load(Ordering::Relaxed), 1);
        assert_eq!(collector.print_errors.load(Ordering::Relaxed), 0);
    }
}
