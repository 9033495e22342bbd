//! ZoneWatch - vehicle geofence tracking
//!
//! This library turns a stream of vehicle location reports into zone enter
//! and exit events against a catalog of circular geofences.
//!
//! # Modules
//!
//! - [`coord`]: geographic points, coordinate validation and haversine distance
//! - [`zone`]: circular zones and the zone catalog
//! - [`tracker`]: per-vehicle state and transition detection
//! - [`events`]: bounded buffer of recently emitted events
//! - [`telemetry`]: processing counters
//! - [`config`]: INI configuration file
//! - [`app`]: application bootstrap and background tasks
//! - `server`: HTTP API (feature `server`)

pub mod app;
pub mod config;
pub mod coord;
pub mod events;
pub mod logging;
#[cfg(feature = "server")]
pub mod server;
pub mod telemetry;
pub mod tracker;
pub mod zone;

/// Crate version, as reported by the CLI.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
