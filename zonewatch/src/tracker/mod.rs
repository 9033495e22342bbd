//! Vehicle state tracker.
//!
//! Turns a stream of location samples into zone enter/exit events. For each
//! sample the tracker:
//!
//! 1. Finds the first catalog zone containing the sample position
//! 2. Compares it with the zone recorded for the vehicle's previous sample
//! 3. Emits `exit` for the old zone and/or `enter` for the new one
//! 4. Records the new zone, position and timestamp for the vehicle
//!
//! Steps 2 to 4 run under the store's per-vehicle lock, so samples for the same
//! vehicle are applied one at a time while different vehicles proceed in
//! parallel.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use zonewatch::tracker::{LocationSample, MemoryStateStore, VehicleTracker};
//! use zonewatch::zone::ZoneCatalog;
//!
//! let tracker = VehicleTracker::new(
//!     Arc::new(ZoneCatalog::builtin()),
//!     Arc::new(MemoryStateStore::new()),
//! );
//!
//! let events = tracker.process_sample(&LocationSample::new("v1", 40.7128, -74.006, 1_000));
//! assert_eq!(events.len(), 1); // entered Downtown Depot
//! ```

mod eviction;
mod model;
mod store;

pub use eviction::{EvictionKind, EvictionPolicy};
pub use model::{
    event_id, now_millis, LocationSample, TransitionKind, VehicleState, ZoneTransitionEvent,
};
pub use store::{MemoryStateStore, StateStore};

use std::sync::Arc;

use tracing::{debug, trace};

use crate::telemetry::TrackerMetrics;
use crate::zone::{Zone, ZoneCatalog};

/// Detects zone transitions for every tracked vehicle.
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
pub struct VehicleTracker {
    catalog: Arc<ZoneCatalog>,
    store: Arc<dyn StateStore>,
    metrics: Arc<TrackerMetrics>,
    eviction: EvictionPolicy,
}

impl VehicleTracker {
    /// Create a tracker over a catalog and an injected state store.
    pub fn new(catalog: Arc<ZoneCatalog>, store: Arc<dyn StateStore>) -> Self {
        Self {
            catalog,
            store,
            metrics: Arc::new(TrackerMetrics::new()),
            eviction: EvictionPolicy::None,
        }
    }

    /// Set the policy applied by [`evict`](Self::evict).
    pub fn with_eviction(mut self, policy: EvictionPolicy) -> Self {
        self.eviction = policy;
        self
    }

    /// Process one location sample and return the resulting events.
    ///
    /// Returns zero, one or two events. When two are returned the `exit` for
    /// the previous zone comes before the `enter` for the new one. The
    /// vehicle's state is written even when no event is produced.
    ///
    /// Never fails. Coordinates must already be within WGS84 ranges; the
    /// outcome for invalid coordinates is unspecified.
    pub fn process_sample(&self, sample: &LocationSample) -> Vec<ZoneTransitionEvent> {
        self.process_sample_with(sample, &mut |_: &[ZoneTransitionEvent]| {})
    }

    /// Like [`process_sample`](Self::process_sample), but hands non-empty
    /// event batches to `sink` before the vehicle's lock is released.
    ///
    /// Sinks therefore observe each vehicle's events in processing order. The
    /// sink must not call back into the tracker.
    pub fn process_sample_with(
        &self,
        sample: &LocationSample,
        sink: &mut dyn FnMut(&[ZoneTransitionEvent]),
    ) -> Vec<ZoneTransitionEvent> {
        let new_zone = self.catalog.zone_for(sample.latitude, sample.longitude);
        let new_zone_id = new_zone.map(|zone| zone.id.clone());
        let mut events = Vec::with_capacity(2);

        trace!(
            vehicle_id = %sample.vehicle_id,
            lat = sample.latitude,
            lon = sample.longitude,
            zone_id = ?new_zone_id,
            "Processing location sample"
        );

        self.store.update(&sample.vehicle_id, &mut |previous| {
            events.clear();

            if let Some(previous) = previous {
                // Stale ids (not in the catalog) count as "no old zone"
                let old_zone = previous
                    .current_zone_id
                    .as_deref()
                    .and_then(|id| self.catalog.get(id));

                if let Some(old_zone) = old_zone {
                    if new_zone.map_or(true, |zone| zone.id != old_zone.id) {
                        events.push(transition(sample, TransitionKind::Exit, old_zone));
                    }
                }
            }

            if let Some(zone) = new_zone {
                let already_inside = previous
                    .and_then(|prev| prev.current_zone_id.as_deref())
                    .is_some_and(|id| id == zone.id);
                if !already_inside {
                    events.push(transition(sample, TransitionKind::Enter, zone));
                }
            }

            if !events.is_empty() {
                sink(&events);
            }

            VehicleState {
                vehicle_id: sample.vehicle_id.clone(),
                current_zone_id: new_zone_id.clone(),
                last_location: sample.position(),
                last_update: sample.timestamp,
            }
        });

        self.metrics.sample_processed();
        for event in &events {
            match event.event_type {
                TransitionKind::Enter => self.metrics.enter_emitted(),
                TransitionKind::Exit => self.metrics.exit_emitted(),
            }
            debug!(
                vehicle_id = %event.vehicle_id,
                zone_id = %event.zone.id,
                event_type = %event.event_type,
                timestamp = event.timestamp,
                "Zone transition"
            );
        }

        events
    }

    /// Last recorded state of a vehicle, `None` if it has never reported.
    pub fn get_state(&self, vehicle_id: &str) -> Option<VehicleState> {
        self.store.get(vehicle_id)
    }

    /// Snapshot of every tracked vehicle, sorted by vehicle id.
    pub fn list_all_states(&self) -> Vec<VehicleState> {
        let mut states = self.store.snapshot();
        states.sort_by(|a, b| a.vehicle_id.cmp(&b.vehicle_id));
        states
    }

    /// The zone catalog in declaration order.
    pub fn list_zones(&self) -> &[Zone] {
        self.catalog.zones()
    }

    pub fn catalog(&self) -> &Arc<ZoneCatalog> {
        &self.catalog
    }

    pub fn metrics(&self) -> &Arc<TrackerMetrics> {
        &self.metrics
    }

    /// Number of vehicles currently held in the store.
    pub fn tracked_vehicles(&self) -> usize {
        self.store.len()
    }

    /// Apply the configured eviction policy. Returns the number removed.
    pub fn evict(&self, now_ms: i64) -> usize {
        let removed = self.eviction.sweep(self.store.as_ref(), now_ms);
        if removed > 0 {
            self.metrics.vehicles_evicted(removed);
            debug!(removed, policy = %self.eviction, "Evicted idle vehicles");
        }
        removed
    }
}

fn transition(sample: &LocationSample, kind: TransitionKind, zone: &Zone) -> ZoneTransitionEvent {
    ZoneTransitionEvent::new(&sample.vehicle_id, kind, zone.clone(), sample.timestamp)
}
