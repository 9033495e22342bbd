//! HTTP transport for the tracker.
//!
//! Validates incoming location reports, forwards them to the tracker and
//! exposes read-only views of zones, vehicles, recent events and telemetry.
//!
//! | Method | Path                              | Handler                 |
//! |--------|-----------------------------------|-------------------------|
//! | POST   | `/api/locations`                  | [`handlers::post_location`] |
//! | GET    | `/api/zones`                      | [`handlers::list_zones`]    |
//! | GET    | `/api/vehicles`                   | [`handlers::list_vehicles`] |
//! | GET    | `/api/vehicles/:vehicle_id/zone`  | [`handlers::vehicle_zone`]  |
//! | GET    | `/api/events`                     | [`handlers::recent_events`] |
//! | GET    | `/api/status`                     | [`handlers::status`]        |

mod error;
pub mod handlers;

pub use error::ApiError;

use axum::routing::{get, post};
use axum::Router;

use crate::app::AppState;

/// Build the API router over a shared application state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/locations", post(handlers::post_location))
        .route("/api/zones", get(handlers::list_zones))
        .route("/api/vehicles", get(handlers::list_vehicles))
        .route("/api/vehicles/:vehicle_id/zone", get(handlers::vehicle_zone))
        .route("/api/events", get(handlers::recent_events))
        .route("/api/status", get(handlers::status))
        .with_state(state)
}
