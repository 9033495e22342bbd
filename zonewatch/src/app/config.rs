//! Application configuration for ZoneWatchApp.
//!
//! `AppConfig` is the resolved, validated form of the configuration file plus
//! any command-line overrides.

use std::net::SocketAddr;
use std::time::Duration;

use crate::config::ConfigFile;
use crate::events::DEFAULT_EVENT_CAPACITY;
use crate::tracker::EvictionPolicy;
use crate::zone::ZoneCatalog;

/// Default interval between eviction sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Everything needed to start the application.
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Zones evaluated for every sample.
    pub catalog: ZoneCatalog,

    /// Recent-events buffer size.
    pub event_capacity: usize,

    /// Idle vehicle removal policy.
    pub eviction: EvictionPolicy,

    /// How often the eviction sweeper runs.
    pub sweep_interval: Duration,

    /// HTTP listen address.
    pub bind: SocketAddr,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(ZoneCatalog::builtin())
    }
}

impl AppConfig {
    /// Create a config for a catalog with default settings.
    pub fn new(catalog: ZoneCatalog) -> Self {
        Self {
            catalog,
            event_capacity: DEFAULT_EVENT_CAPACITY,
            eviction: EvictionPolicy::None,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
        }
    }

    /// Create application config from the configuration file.
    ///
    /// Validates the zone catalog; an invalid catalog is an error rather than
    /// a silent fallback to the built-in zones.
    pub fn from_config_file(config: &ConfigFile) -> Result<Self, crate::config::ConfigError> {
        Ok(Self {
            catalog: config.catalog()?,
            event_capacity: config.events.capacity,
            eviction: config.tracker.eviction_policy(),
            sweep_interval: config.tracker.sweep_interval(),
            bind: config.server.bind,
        })
    }

    /// Set the eviction policy.
    pub fn with_eviction(mut self, policy: EvictionPolicy, sweep_interval: Duration) -> Self {
        self.eviction = policy;
        self.sweep_interval = sweep_interval;
        self
    }

    /// Set the HTTP listen address.
    pub fn with_bind(mut self, bind: SocketAddr) -> Self {
        self.bind = bind;
        self
    }
}
