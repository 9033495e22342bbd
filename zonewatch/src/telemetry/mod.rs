//! Tracker telemetry.
//!
//! Lock-free counters updated by the tracker on every sample, with a
//! point-in-time snapshot type for the HTTP status endpoint and CLI output.
//!
//! ```text
//! VehicleTracker ─────► TrackerMetrics ─────► TelemetrySnapshot ─────► Views
//!                       (atomic counters)     (point-in-time copy)      (HTTP, CLI)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use zonewatch::telemetry::TrackerMetrics;
//! use std::sync::Arc;
//!
//! let metrics = Arc::new(TrackerMetrics::new());
//! metrics.sample_processed();
//! metrics.enter_emitted();
//!
//! let snapshot = metrics.snapshot(tracked_vehicles, recent_events);
//! println!("Samples: {}", snapshot.samples_processed);
//! ```

mod metrics;
mod snapshot;

pub use metrics::TrackerMetrics;
pub use snapshot::TelemetrySnapshot;
