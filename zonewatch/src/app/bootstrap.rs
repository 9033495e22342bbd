//! Application bootstrap implementation.
//!
//! Builds the catalog, store, tracker and event buffer, and owns the
//! background tasks started for them.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::config::AppConfig;
#[cfg(feature = "server")]
use super::error::AppError;
use crate::events::RecentEvents;
use crate::telemetry::TelemetrySnapshot;
use crate::tracker::{
    now_millis, LocationSample, MemoryStateStore, VehicleTracker, ZoneTransitionEvent,
};

/// Shared handle to the running tracker and its event buffer.
///
/// Cheap to clone; this is the state handed to HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    tracker: Arc<VehicleTracker>,
    events: Arc<RecentEvents>,
}

impl AppState {
    pub fn new(tracker: Arc<VehicleTracker>, events: Arc<RecentEvents>) -> Self {
        Self { tracker, events }
    }

    /// Run a sample through the tracker and record the resulting events.
    ///
    /// Events are buffered while the vehicle is still locked, so the buffer
    /// never shows one vehicle's events out of processing order.
    pub fn ingest(&self, sample: &LocationSample) -> Vec<ZoneTransitionEvent> {
        let mut record = |events: &[ZoneTransitionEvent]| {
            self.events.extend(events.iter().cloned());
        };
        self.tracker.process_sample_with(sample, &mut record)
    }

    pub fn tracker(&self) -> &Arc<VehicleTracker> {
        &self.tracker
    }

    pub fn events(&self) -> &Arc<RecentEvents> {
        &self.events
    }

    /// Current counters plus store and buffer sizes.
    pub fn telemetry(&self) -> TelemetrySnapshot {
        self.tracker
            .metrics()
            .snapshot(self.tracker.tracked_vehicles(), self.events.len())
    }
}

/// ZoneWatch application with service lifecycle management.
///
/// Lifecycle: created at startup with [`start`](Self::start), shared through
/// [`state`](Self::state), torn down with [`shutdown`](Self::shutdown). The
/// vehicle store lives exactly as long as the app.
pub struct ZoneWatchApp {
    state: AppState,
    config: AppConfig,
    shutdown: CancellationToken,
    sweeper: Option<JoinHandle<()>>,
}

impl ZoneWatchApp {
    /// Start the application.
    ///
    /// Must be called within a Tokio runtime when an eviction policy is
    /// configured, since the sweeper runs as a background task.
    pub async fn start(config: AppConfig) -> Self {
        info!(
            zones = config.catalog.len(),
            event_capacity = config.event_capacity,
            eviction = %config.eviction,
            "Starting ZoneWatchApp"
        );

        let catalog = Arc::new(config.catalog.clone());
        let store = Arc::new(MemoryStateStore::new());
        let tracker = Arc::new(VehicleTracker::new(catalog, store).with_eviction(config.eviction));
        let events = Arc::new(RecentEvents::new(config.event_capacity));
        let state = AppState::new(tracker, events);

        let shutdown = CancellationToken::new();
        let sweeper = config.eviction.is_enabled().then(|| {
            info!(
                interval_secs = config.sweep_interval.as_secs(),
                "Eviction sweeper started"
            );
            tokio::spawn(run_sweeper(
                Arc::clone(state.tracker()),
                config.sweep_interval,
                shutdown.clone(),
            ))
        });

        Self {
            state,
            config,
            shutdown,
            sweeper,
        }
    }

    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Token cancelled on shutdown; cancel it to stop the server.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Serve the HTTP API until the shutdown token is cancelled.
    #[cfg(feature = "server")]
    pub async fn serve(&self) -> Result<(), AppError> {
        let addr = self.config.bind;
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|source| AppError::Bind { addr, source })?;
        let local_addr = listener.local_addr().unwrap_or(addr);

        info!(addr = %local_addr, "HTTP server listening");

        let shutdown = self.shutdown.clone();
        axum::serve(listener, crate::server::router(self.state()))
            .with_graceful_shutdown(async move { shutdown.cancelled().await })
            .await
            .map_err(AppError::Server)?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Stop background tasks and wait for them to finish.
    pub async fn shutdown(self) {
        info!("Shutting down ZoneWatchApp");
        self.shutdown.cancel();
        if let Some(handle) = self.sweeper {
            let _ = handle.await;
            debug!("Eviction sweeper stopped");
        }
        info!(
            telemetry = %self.state.telemetry(),
            "ZoneWatchApp shutdown complete"
        );
    }
}

async fn run_sweeper(tracker: Arc<VehicleTracker>, interval: Duration, shutdown: CancellationToken) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            biased;

            _ = shutdown.cancelled() => break,

            _ = ticker.tick() => {
                let removed = tracker.evict(now_millis());
                if removed > 0 {
                    info!(removed, remaining = tracker.tracked_vehicles(), "Evicted idle vehicles");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    use crate::tracker::{EvictionPolicy, StateStore, TransitionKind, VehicleState};
    use crate::zone::ZoneCatalog;

    #[tokio::test]
    async fn test_ingest_records_events() {
        let app = ZoneWatchApp::start(AppConfig::default()).await;
        let state = app.state();

        let events = state.ingest(&LocationSample::new("v1", 40.7128, -74.006, 1));
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, TransitionKind::Enter);
        assert_eq!(state.events().len(), 1);

        let telemetry = state.telemetry();
        assert_eq!(telemetry.samples_processed, 1);
        assert_eq!(telemetry.tracked_vehicles, 1);
        assert_eq!(telemetry.recent_events, 1);

        app.shutdown().await;
    }

    /// Store that can pause the first update after it commits.
    struct PausingStore {
        inner: MemoryStateStore,
        gate: parking_lot::Mutex<Option<(mpsc::Sender<()>, mpsc::Receiver<()>)>>,
    }

    impl StateStore for PausingStore {
        fn get(&self, vehicle_id: &str) -> Option<VehicleState> {
            self.inner.get(vehicle_id)
        }

        fn update(
            &self,
            vehicle_id: &str,
            apply: &mut dyn FnMut(Option<&VehicleState>) -> VehicleState,
        ) {
            self.inner.update(vehicle_id, apply);
            let gate = self.gate.lock().take();
            if let Some((committed, resume)) = gate {
                committed.send(()).unwrap();
                resume.recv().unwrap();
            }
        }

        fn remove_if(
            &self,
            vehicle_id: &str,
            predicate: &dyn Fn(&VehicleState) -> bool,
        ) -> Option<VehicleState> {
            self.inner.remove_if(vehicle_id, predicate)
        }

        fn snapshot(&self) -> Vec<VehicleState> {
            self.inner.snapshot()
        }

        fn len(&self) -> usize {
            self.inner.len()
        }
    }

    #[test]
    fn test_buffer_follows_per_vehicle_processing_order() {
        let (committed_tx, committed_rx) = mpsc::channel();
        let (resume_tx, resume_rx) = mpsc::channel();
        let store = PausingStore {
            inner: MemoryStateStore::new(),
            gate: parking_lot::Mutex::new(Some((committed_tx, resume_rx))),
        };
        let tracker = VehicleTracker::new(Arc::new(ZoneCatalog::builtin()), Arc::new(store));
        let state = AppState::new(Arc::new(tracker), Arc::new(RecentEvents::new(10)));

        // First sample enters Downtown Depot and stalls after its write
        let first = {
            let state = state.clone();
            std::thread::spawn(move || {
                state.ingest(&LocationSample::new("v1", 40.7128, -74.006, 100))
            })
        };
        committed_rx.recv().unwrap();

        // Second sample leaves the zone and finishes while the first is stalled
        let second = state.ingest(&LocationSample::new("v1", 0.0, 0.0, 200));
        assert_eq!(second[0].event_type, TransitionKind::Exit);

        resume_tx.send(()).unwrap();
        first.join().unwrap();

        let ids: Vec<_> = state.events().snapshot().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["v1-exit-200", "v1-enter-100"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_evicts_stale_vehicles() {
        let config = AppConfig::default().with_eviction(
            EvictionPolicy::Ttl { max_age_ms: 1_000 },
            Duration::from_secs(1),
        );
        let app = ZoneWatchApp::start(config).await;
        let state = app.state();

        // Epoch zero is far older than the TTL
        state.ingest(&LocationSample::new("ghost", 0.0, 0.0, 0));
        assert_eq!(state.tracker().tracked_vehicles(), 1);

        tokio::time::sleep(Duration::from_millis(1_500)).await;
        tokio::task::yield_now().await;

        assert_eq!(state.tracker().tracked_vehicles(), 0);
        assert_eq!(state.telemetry().vehicles_evicted, 1);

        app.shutdown().await;
    }
}
