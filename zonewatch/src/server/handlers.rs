//! Request handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, SecondsFormat};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::ApiError;
use crate::app::AppState;
use crate::coord::{validate_coordinates, GeoPoint};
use crate::telemetry::TelemetrySnapshot;
use crate::tracker::{now_millis, LocationSample, VehicleState, ZoneTransitionEvent};
use crate::zone::Zone;

/// Body of `POST /api/locations`. Every field is optional at the parse stage
/// so that missing fields produce a specific error.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRequest {
    /// Any JSON value; strings, non-zero numbers and `true` count as present.
    pub vehicle_id: Option<Value>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    /// Epoch milliseconds; the receive time is used when absent.
    pub timestamp: Option<i64>,
}

impl LocationRequest {
    /// Check required fields and coordinate ranges.
    pub fn into_sample(self, received_at: i64) -> Result<LocationSample, ApiError> {
        let vehicle_id = self.vehicle_id.and_then(vehicle_id_text);
        let (Some(vehicle_id), Some(lat), Some(lng)) = (vehicle_id, self.lat, self.lng) else {
            return Err(ApiError::MissingFields);
        };
        let point = validate_coordinates(lat, lng).map_err(ApiError::InvalidCoordinates)?;

        Ok(LocationSample::new(
            vehicle_id,
            point.lat,
            point.lon,
            self.timestamp.unwrap_or(received_at),
        ))
    }
}

/// Textual id for a `vehicleId` value.
///
/// Non-empty strings are used as-is and non-zero numbers and `true` by their
/// JSON text. Empty strings, zero, `false`, `null`, arrays and objects count
/// as missing.
fn vehicle_id_text(value: Value) -> Option<String> {
    match value {
        Value::String(id) if !id.is_empty() => Some(id),
        Value::Number(n) if n.as_f64().is_some_and(|v| v != 0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationResponse {
    pub success: bool,
    pub location: LocationSample,
    pub geofence_events: Vec<ZoneTransitionEvent>,
    pub events_detected: usize,
}

pub async fn post_location(
    State(state): State<AppState>,
    body: Result<Json<LocationRequest>, JsonRejection>,
) -> Result<Json<LocationResponse>, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::MalformedBody(e.body_text()))?;
    let sample = request.into_sample(now_millis())?;

    let events = state.ingest(&sample);
    for event in &events {
        info!(
            vehicle_id = %event.vehicle_id,
            zone_id = %event.zone.id,
            event_type = %event.event_type,
            "Geofence event"
        );
    }

    Ok(Json(LocationResponse {
        success: true,
        location: sample,
        events_detected: events.len(),
        geofence_events: events,
    }))
}

#[derive(Debug, Serialize)]
pub struct ZonesResponse {
    pub zones: Vec<Zone>,
    pub count: usize,
}

pub async fn list_zones(State(state): State<AppState>) -> Json<ZonesResponse> {
    let zones = state.tracker().list_zones().to_vec();
    Json(ZonesResponse {
        count: zones.len(),
        zones,
    })
}

#[derive(Debug, Serialize)]
pub struct VehiclesResponse {
    pub vehicles: Vec<VehicleState>,
    pub count: usize,
}

pub async fn list_vehicles(State(state): State<AppState>) -> Json<VehiclesResponse> {
    let vehicles = state.tracker().list_all_states();
    Json(VehiclesResponse {
        count: vehicles.len(),
        vehicles,
    })
}

/// Body of `GET /api/vehicles/:vehicle_id/zone`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum VehicleZoneResponse {
    #[serde(rename_all = "camelCase")]
    Known {
        vehicle_id: String,
        current_zone: Option<String>,
        zone_details: Option<Zone>,
        last_location: GeoPoint,
        /// RFC 3339 UTC with millisecond precision.
        last_update: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Unknown {
        vehicle_id: String,
        current_zone: Option<String>,
        last_location: Option<GeoPoint>,
        message: &'static str,
    },
}

pub async fn vehicle_zone(
    State(state): State<AppState>,
    Path(vehicle_id): Path<String>,
) -> Json<VehicleZoneResponse> {
    let tracker = state.tracker();

    let response = match tracker.get_state(&vehicle_id) {
        Some(vehicle) => {
            let zone_details = vehicle
                .current_zone_id
                .as_deref()
                .and_then(|id| tracker.catalog().get(id))
                .cloned();
            VehicleZoneResponse::Known {
                vehicle_id,
                current_zone: vehicle.current_zone_id,
                zone_details,
                last_location: vehicle.last_location,
                last_update: format_timestamp(vehicle.last_update),
            }
        }
        None => VehicleZoneResponse::Unknown {
            vehicle_id,
            current_zone: None,
            last_location: None,
            message: "Vehicle not found (no location events received yet)",
        },
    };

    Json(response)
}

#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub events: Vec<ZoneTransitionEvent>,
    pub count: usize,
    /// Maximum number of events retained.
    pub capacity: usize,
}

/// Retained events, newest first.
pub async fn recent_events(State(state): State<AppState>) -> Json<EventsResponse> {
    let buffer = state.events();
    let events = buffer.snapshot();
    Json(EventsResponse {
        count: events.len(),
        capacity: buffer.capacity(),
        events,
    })
}

pub async fn status(State(state): State<AppState>) -> Json<TelemetrySnapshot> {
    Json(state.telemetry())
}

/// Epoch milliseconds as `2024-01-01T00:00:00.000Z`.
fn format_timestamp(millis: i64) -> Option<String> {
    DateTime::from_timestamp_millis(millis).map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::json;
    use tower::ServiceExt;

    use crate::app::{AppConfig, ZoneWatchApp};
    use crate::server::router;

    async fn call(state: &AppState, request: Request<Body>) -> (StatusCode, Value) {
        let response = router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn post(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/locations")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn state() -> AppState {
        ZoneWatchApp::start(AppConfig::default()).await.state()
    }

    #[test]
    fn test_into_sample_validation() {
        let missing = LocationRequest {
            vehicle_id: Some(json!("v1")),
            lat: Some(1.0),
            ..Default::default()
        };
        assert!(matches!(missing.into_sample(0), Err(ApiError::MissingFields)));

        let empty_id = LocationRequest {
            vehicle_id: Some(json!("")),
            lat: Some(1.0),
            lng: Some(1.0),
            timestamp: None,
        };
        assert!(matches!(empty_id.into_sample(0), Err(ApiError::MissingFields)));

        let out_of_range = LocationRequest {
            vehicle_id: Some(json!("v1")),
            lat: Some(95.0),
            lng: Some(0.0),
            timestamp: None,
        };
        assert!(matches!(
            out_of_range.into_sample(0),
            Err(ApiError::InvalidCoordinates(_))
        ));

        let ok = LocationRequest {
            vehicle_id: Some(json!("v1")),
            lat: Some(1.0),
            lng: Some(2.0),
            timestamp: None,
        };
        assert_eq!(ok.into_sample(42).unwrap().timestamp, 42);
    }

    #[test]
    fn test_vehicle_id_accepts_truthy_scalars() {
        assert_eq!(vehicle_id_text(json!("bus-7")).as_deref(), Some("bus-7"));
        assert_eq!(vehicle_id_text(json!(123)).as_deref(), Some("123"));
        assert_eq!(vehicle_id_text(json!(true)).as_deref(), Some("true"));

        for missing in [json!(""), json!(0), json!(false), json!(null), json!([1]), json!({})] {
            assert_eq!(vehicle_id_text(missing), None);
        }
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(
            format_timestamp(1_700_000_000_123).as_deref(),
            Some("2023-11-14T22:13:20.123Z")
        );
    }

    #[tokio::test]
    async fn test_post_location_emits_enter() {
        let state = state().await;
        let (status, body) = call(
            &state,
            post(json!({"vehicleId": "v1", "lat": 40.7128, "lng": -74.006, "timestamp": 1000})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["eventsDetected"], 1);
        assert_eq!(body["geofenceEvents"][0]["id"], "v1-enter-1000");
        assert_eq!(body["geofenceEvents"][0]["eventType"], "enter");
        assert_eq!(body["geofenceEvents"][0]["zone"]["name"], "Downtown Depot");
        assert_eq!(body["location"]["lng"], -74.006);
        assert_eq!(state.events().len(), 1);
    }

    #[tokio::test]
    async fn test_post_location_rejects_bad_input() {
        let state = state().await;

        let (status, body) = call(&state, post(json!({"vehicleId": "v1", "lat": 1.0}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required fields: vehicleId, lat, lng");

        let (status, body) =
            call(&state, post(json!({"vehicleId": "v1", "lat": 1.0, "lng": 200.0}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid coordinates"));

        let (status, body) = call(&state, post(json!({"vehicleId": 0, "lat": 1.0, "lng": 1.0}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing required fields: vehicleId, lat, lng");

        let (status, body) =
            call(&state, post(json!({"vehicleId": "v1", "lat": "north", "lng": 0.0}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Malformed request body"));

        assert_eq!(state.tracker().tracked_vehicles(), 0);
    }

    #[tokio::test]
    async fn test_post_location_accepts_numeric_vehicle_id() {
        let state = state().await;
        let (status, body) = call(
            &state,
            post(json!({"vehicleId": 123, "lat": 40.6892, "lng": -74.0445, "timestamp": 7})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["location"]["vehicleId"], "123");
        assert_eq!(body["geofenceEvents"][0]["id"], "123-enter-7");
        assert!(state.tracker().get_state("123").is_some());
    }

    #[tokio::test]
    async fn test_vehicle_zone_known_and_unknown() {
        let state = state().await;

        let (status, body) = call(&state, get("/api/vehicles/ghost/zone")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["vehicleId"], "ghost");
        assert!(body["currentZone"].is_null());
        assert!(body["lastLocation"].is_null());
        assert!(body["message"].as_str().unwrap().contains("not found"));

        state.ingest(&LocationSample::new("v1", 40.7769, -73.874, 0));
        let (_, body) = call(&state, get("/api/vehicles/v1/zone")).await;
        assert_eq!(body["currentZone"], "zone-2");
        assert_eq!(body["zoneDetails"]["name"], "Airport Terminal");
        assert_eq!(body["lastLocation"]["lat"], 40.7769);
        assert_eq!(body["lastUpdate"], "1970-01-01T00:00:00.000Z");
    }

    #[tokio::test]
    async fn test_listing_endpoints() {
        let state = state().await;
        state.ingest(&LocationSample::new("v2", 40.6892, -74.0445, 5));
        state.ingest(&LocationSample::new("v1", 0.0, 0.0, 5));

        let (_, zones) = call(&state, get("/api/zones")).await;
        assert_eq!(zones["count"], 3);
        assert_eq!(zones["zones"][0]["id"], "zone-1");
        assert_eq!(zones["zones"][2]["radius"], 2.5);

        let (_, vehicles) = call(&state, get("/api/vehicles")).await;
        assert_eq!(vehicles["count"], 2);
        assert_eq!(vehicles["vehicles"][0]["vehicleId"], "v1");

        let (_, events) = call(&state, get("/api/events")).await;
        assert_eq!(events["count"], 1);
        assert_eq!(events["capacity"], 1000);
        assert_eq!(events["events"][0]["zone"]["id"], "zone-3");

        let (_, status) = call(&state, get("/api/status")).await;
        assert_eq!(status["samplesProcessed"], 2);
        assert_eq!(status["enterEvents"], 1);
        assert_eq!(status["trackedVehicles"], 2);
    }
}
