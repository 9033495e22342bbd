//! Configuration file handling.
//!
//! Settings live in an INI file at `~/.config/zonewatch/config.ini` (or the
//! path in `ZONEWATCH_CONFIG`). A missing file is not an error; defaults are
//! used instead.
//!
//! ```ini
//! [server]
//! bind = 127.0.0.1:3000
//!
//! [events]
//! capacity = 1000
//!
//! [tracker]
//! eviction = ttl
//! ttl_secs = 3600
//! max_vehicles = 10000
//! sweep_interval_secs = 60
//!
//! [logging]
//! level = info
//! directory =
//!
//! [zone.zone-1]
//! name = Downtown Depot
//! lat = 40.7128
//! lon = -74.006
//! radius_km = 2
//! ```
//!
//! Zone sections are read in file order, which is the catalog order. When the
//! file declares no zones the built-in catalog is used.

mod file;
mod keys;

pub use file::{
    config_file_path, ConfigError, ConfigFile, EventSettings, LoggingSettings, ServerSettings,
    TrackerSettings, CONFIG_ENV_VAR,
};
pub use keys::ConfigKey;
