//! Point-in-time telemetry view.

use std::fmt;

use serde::Serialize;

/// Copy of the tracker counters at one instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySnapshot {
    pub samples_processed: u64,
    pub enter_events: u64,
    pub exit_events: u64,
    pub vehicles_evicted: u64,
    pub tracked_vehicles: usize,
    pub recent_events: usize,
    pub uptime_secs: u64,
    pub samples_per_second: f64,
}

impl TelemetrySnapshot {
    /// Enter plus exit events emitted since startup.
    pub fn total_events(&self) -> u64 {
        self.enter_events + self.exit_events
    }
}

impl fmt::Display for TelemetrySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} samples ({:.1}/s), {} enter, {} exit, {} vehicles tracked, {} evicted",
            self.samples_processed,
            self.samples_per_second,
            self.enter_events,
            self.exit_events,
            self.tracked_vehicles,
            self.vehicles_evicted
        )
    }
}
