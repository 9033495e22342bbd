//! Simulate command - random-walk vehicles through the tracker.
//!
//! Each vehicle starts near a catalog zone (vehicle `i` near zone `i mod n`)
//! and drifts a little on every step, so runs produce a realistic mix of
//! enter and exit events without any external feed.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;
use zonewatch::app::{AppConfig, AppState};
use zonewatch::coord::{GeoPoint, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};
use zonewatch::events::RecentEvents;
use zonewatch::tracker::{now_millis, LocationSample, MemoryStateStore, VehicleTracker};
use zonewatch::zone::ZoneCatalog;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Maximum start offset from the seed zone center, in degrees.
const START_JITTER_DEG: f64 = 0.05;

/// Maximum movement per axis per step, in degrees.
const STEP_DEG: f64 = 0.005;

/// Arguments for the simulate command.
pub struct SimulateArgs {
    pub vehicles: usize,
    pub steps: usize,
    pub interval_ms: u64,
    pub seed: Option<u64>,
}

pub fn run(runner: &CliRunner, args: SimulateArgs) -> Result<(), CliError> {
    runner.log_startup("simulate");

    if args.vehicles == 0 {
        return Err(CliError::InvalidArgument(
            "--vehicles must be at least 1".to_string(),
        ));
    }

    let clock = LogicalClock::new(now_millis(), args.interval_ms, args.steps)?;

    let app_config = AppConfig::from_config_file(runner.config())?;
    let tracker = Arc::new(VehicleTracker::new(
        Arc::new(app_config.catalog.clone()),
        Arc::new(MemoryStateStore::new()),
    ));
    let state = AppState::new(tracker, Arc::new(RecentEvents::new(app_config.event_capacity)));

    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    let mut fleet = Fleet::new(&app_config.catalog, args.vehicles, seed);

    println!(
        "Simulating {} vehicle(s) for {} step(s) over {} zone(s), seed {}",
        args.vehicles,
        args.steps,
        app_config.catalog.len(),
        seed
    );
    println!();

    for step in 0..args.steps {
        for sample in fleet.step(clock.at(step)) {
            for event in state.ingest(&sample) {
                println!(
                    "[step {:>4}] {:<8} {:<5} {} ({})",
                    step, event.vehicle_id, event.event_type, event.zone.id, event.zone.name
                );
            }
        }
        debug!(step, "Simulation step complete");

        if args.interval_ms > 0 {
            thread::sleep(Duration::from_millis(args.interval_ms));
        }
    }

    println!();
    let telemetry = state.telemetry();
    println!("Summary: {} event(s); {}", telemetry.total_events(), telemetry);
    for vehicle in state.tracker().list_all_states() {
        println!(
            "  {:<8} {:<10} {}",
            vehicle.vehicle_id,
            vehicle.current_zone_id.as_deref().unwrap_or("-"),
            vehicle.last_location
        );
    }

    Ok(())
}

/// Sample timestamps: one interval per step regardless of real delay.
#[derive(Debug, Clone, Copy)]
struct LogicalClock {
    start: i64,
    tick: i64,
}

impl LogicalClock {
    /// Fails when the last step's timestamp would not fit in epoch millis.
    fn new(start: i64, interval_ms: u64, steps: usize) -> Result<Self, CliError> {
        let out_of_range = || {
            CliError::InvalidArgument(format!(
                "{} step(s) of {} ms overflow the timestamp range",
                steps, interval_ms
            ))
        };

        let tick = i64::try_from(interval_ms.max(1)).map_err(|_| out_of_range())?;
        let last_step = i64::try_from(steps.saturating_sub(1)).map_err(|_| out_of_range())?;
        tick.checked_mul(last_step)
            .and_then(|span| start.checked_add(span))
            .ok_or_else(out_of_range)?;

        Ok(Self { start, tick })
    }

    /// Timestamp of `step`; in range for every step checked by `new`.
    fn at(&self, step: usize) -> i64 {
        self.start.saturating_add(self.tick.saturating_mul(step as i64))
    }
}

/// Simulated vehicles and their current positions.
struct Fleet {
    rng: StdRng,
    positions: Vec<(String, GeoPoint)>,
}

impl Fleet {
    fn new(catalog: &ZoneCatalog, vehicles: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let zones = catalog.zones();

        let positions = (0..vehicles)
            .map(|i| {
                let anchor = if zones.is_empty() {
                    GeoPoint::new(0.0, 0.0)
                } else {
                    zones[i % zones.len()].center
                };
                let start = jitter(&mut rng, anchor, START_JITTER_DEG);
                (format!("sim-{}", i + 1), start)
            })
            .collect();

        Self { rng, positions }
    }

    /// Move every vehicle and return one sample each.
    fn step(&mut self, timestamp: i64) -> Vec<LocationSample> {
        let rng = &mut self.rng;
        self.positions
            .iter_mut()
            .map(|(id, position)| {
                *position = jitter(rng, *position, STEP_DEG);
                LocationSample::new(id.clone(), position.lat, position.lon, timestamp)
            })
            .collect()
    }
}

/// Offset a point by up to `max_deg` on each axis, kept within WGS84 ranges.
fn jitter(rng: &mut StdRng, point: GeoPoint, max_deg: f64) -> GeoPoint {
    let lat = point.lat + rng.random_range(-max_deg..=max_deg);
    let lon = point.lon + rng.random_range(-max_deg..=max_deg);
    GeoPoint::new(lat.clamp(MIN_LAT, MAX_LAT), lon.clamp(MIN_LON, MAX_LON))
}
