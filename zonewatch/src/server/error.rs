//! Request rejection type.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::debug;

use crate::coord::CoordError;

/// Reasons a location report is rejected before reaching the tracker.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing required fields: vehicleId, lat, lng")]
    MissingFields,

    #[error("Invalid coordinates: lat must be -90 to 90, lng must be -180 to 180")]
    InvalidCoordinates(#[source] CoordError),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        debug!(error = %self, "Rejected request");
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
