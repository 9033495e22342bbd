//! Data types flowing through the tracker.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::coord::GeoPoint;
use crate::zone::Zone;

/// A single location report for a vehicle.
///
/// Coordinates are expected to be range-checked by the caller before the
/// sample reaches the tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSample {
    pub vehicle_id: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lng")]
    pub longitude: f64,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

impl LocationSample {
    pub fn new(vehicle_id: impl Into<String>, latitude: f64, longitude: f64, timestamp: i64) -> Self {
        Self {
            vehicle_id: vehicle_id.into(),
            latitude,
            longitude,
            timestamp,
        }
    }

    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Last known zone membership and position of one vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleState {
    pub vehicle_id: String,
    /// Zone containing `last_location`, `None` when outside every zone.
    #[serde(rename = "currentZone")]
    pub current_zone_id: Option<String>,
    pub last_location: GeoPoint,
    /// Epoch milliseconds of the sample that produced this state.
    pub last_update: i64,
}

/// Direction of a zone membership change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    Enter,
    Exit,
}

impl TransitionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionKind::Enter => "enter",
            TransitionKind::Exit => "exit",
        }
    }
}

impl fmt::Display for TransitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An enter or exit event produced by a location sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneTransitionEvent {
    /// `{vehicle_id}-{kind}-{timestamp}`; identical inputs yield identical ids.
    pub id: String,
    pub vehicle_id: String,
    pub event_type: TransitionKind,
    pub zone: Zone,
    pub timestamp: i64,
}

impl ZoneTransitionEvent {
    pub fn new(vehicle_id: &str, kind: TransitionKind, zone: Zone, timestamp: i64) -> Self {
        Self {
            id: event_id(vehicle_id, kind, timestamp),
            vehicle_id: vehicle_id.to_string(),
            event_type: kind,
            zone,
            timestamp,
        }
    }
}

/// Current wall-clock time in epoch milliseconds.
///
/// Used for samples that arrive without a timestamp and for eviction sweeps.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Deterministic event id for a (vehicle, kind, timestamp) triple.
///
/// The kind never ends in `-` and the timestamp is an integer, so the id can
/// be split unambiguously from the right and distinct triples never collide.
pub fn event_id(vehicle_id: &str, kind: TransitionKind, timestamp: i64) -> String {
    format!("{}-{}-{}", vehicle_id, kind, timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_id_format() {
        assert_eq!(event_id("v1", TransitionKind::Enter, 100), "v1-enter-100");
        assert_eq!(event_id("v1", TransitionKind::Exit, -5), "v1-exit--5");
    }

    #[test]
    fn test_event_ids_distinguish_all_fields() {
        let ids = [
            event_id("v1", TransitionKind::Enter, 100),
            event_id("v1", TransitionKind::Exit, 100),
            event_id("v2", TransitionKind::Enter, 100),
            event_id("v1", TransitionKind::Enter, 101),
        ];
        let unique: std::collections::HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_event_serializes_camel_case() {
        let zone = Zone::new("z1", "Depot", GeoPoint::new(0.0, 0.0), 1.0);
        let event = ZoneTransitionEvent::new("v1", TransitionKind::Exit, zone, 200);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["id"], "v1-exit-200");
        assert_eq!(json["vehicleId"], "v1");
        assert_eq!(json["eventType"], "exit");
        assert_eq!(json["zone"]["id"], "z1");
        assert_eq!(json["timestamp"], 200);
    }

    #[test]
    fn test_state_serializes_current_zone() {
        let state = VehicleState {
            vehicle_id: "v1".to_string(),
            current_zone_id: None,
            last_location: GeoPoint::new(1.0, 2.0),
            last_update: 5,
        };
        let json = serde_json::to_value(&state).unwrap();
        assert!(json["currentZone"].is_null());
        assert_eq!(json["lastLocation"]["lng"], 2.0);
        assert_eq!(json["lastUpdate"], 5);
    }
}
