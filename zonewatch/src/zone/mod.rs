//! Circular geofence zones and point containment.
//!
//! A [`ZoneCatalog`] is an ordered, immutable list of [`Zone`]s loaded once at
//! startup. Containment is evaluated with [`zone_for`], which scans zones in
//! declaration order and returns the first match.
//!
//! # Overlapping zones
//!
//! When zones overlap, the zone declared first wins, even if the point is
//! closer to the center of a later zone. Reordering the catalog changes which
//! enter/exit events are produced.
//!
//! # Scaling
//!
//! Lookup is a linear scan over the catalog. That is fine for a handful of
//! zones; a large catalog would need a spatial index (grid or R-tree) behind
//! the same first-match contract.

mod catalog;

pub use catalog::{CatalogError, ZoneCatalog};

use serde::{Deserialize, Serialize};

use crate::coord::{distance_km, GeoPoint};

/// A circular geofence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// Unique identifier within the catalog.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Center of the circle.
    pub center: GeoPoint,
    /// Radius in kilometers.
    #[serde(rename = "radius")]
    pub radius_km: f64,
}

impl Zone {
    /// Create a zone.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        center: GeoPoint,
        radius_km: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            center,
            radius_km,
        }
    }

    /// Whether the point lies inside or on the boundary of this zone.
    #[inline]
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        distance_km(lat, lon, self.center.lat, self.center.lon) <= self.radius_km
    }
}

/// Returns the first zone, in slice order, that contains the point.
pub fn zone_for(lat: f64, lon: f64, zones: &[Zone]) -> Option<&Zone> {
    zones.iter().find(|zone| zone.contains(lat, lon))
}
