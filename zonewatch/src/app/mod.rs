//! Application bootstrap and lifecycle management.
//!
//! [`ZoneWatchApp`] wires the long-lived pieces together in one place:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        ZoneWatchApp                          │
//! │                                                              │
//! │  ZoneCatalog (Arc, read-only)                                │
//! │       │                                                      │
//! │       ▼                                                      │
//! │  VehicleTracker ◄── MemoryStateStore (injected)              │
//! │       │                                                      │
//! │       ├──► RecentEvents (ring buffer)                        │
//! │       └──► TrackerMetrics                                    │
//! │                                                              │
//! │  Eviction sweeper (tokio task, only when a policy is set)    │
//! │  HTTP server (axum, `server` feature)                        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use zonewatch::app::{AppConfig, ZoneWatchApp};
//!
//! let app = ZoneWatchApp::start(AppConfig::default()).await?;
//! let events = app.state().ingest(&sample);
//!
//! // Graceful shutdown
//! app.shutdown().await;
//! ```

mod bootstrap;
mod config;
mod error;

pub use bootstrap::{AppState, ZoneWatchApp};
pub use config::AppConfig;
pub use error::AppError;
