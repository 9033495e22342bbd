//! Atomic counters for tracker activity.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use super::TelemetrySnapshot;

/// Counters shared between the tracker and its observers.
#[derive(Debug)]
pub struct TrackerMetrics {
    samples_processed: AtomicU64,
    enter_events: AtomicU64,
    exit_events: AtomicU64,
    vehicles_evicted: AtomicU64,
    started_at: Instant,
}

impl Default for TrackerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackerMetrics {
    pub fn new() -> Self {
        Self {
            samples_processed: AtomicU64::new(0),
            enter_events: AtomicU64::new(0),
            exit_events: AtomicU64::new(0),
            vehicles_evicted: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    #[inline]
    pub fn sample_processed(&self) {
        self.samples_processed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn enter_emitted(&self) {
        self.enter_events.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn exit_emitted(&self) {
        self.exit_events.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn vehicles_evicted(&self, count: usize) {
        self.vehicles_evicted
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    /// Take a point-in-time copy of the counters.
    ///
    /// Gauges that the metrics do not own (tracked vehicles, buffered events)
    /// are supplied by the caller.
    pub fn snapshot(&self, tracked_vehicles: usize, recent_events: usize) -> TelemetrySnapshot {
        let uptime = self.started_at.elapsed();
        let samples = self.samples_processed.load(Ordering::Relaxed);
        let secs = uptime.as_secs_f64();

        TelemetrySnapshot {
            samples_processed: samples,
            enter_events: self.enter_events.load(Ordering::Relaxed),
            exit_events: self.exit_events.load(Ordering::Relaxed),
            vehicles_evicted: self.vehicles_evicted.load(Ordering::Relaxed),
            tracked_vehicles,
            recent_events,
            uptime_secs: uptime.as_secs(),
            samples_per_second: if secs > 0.0 { samples as f64 / secs } else { 0.0 },
        }
    }
}
