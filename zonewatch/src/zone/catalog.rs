//! Ordered, validated zone catalog.

use std::collections::HashSet;

use thiserror::Error;

use super::{zone_for, Zone};
use crate::coord::{validate_coordinates, CoordError, GeoPoint};

/// Errors raised while building a catalog.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("Zone id must not be empty")]
    EmptyId,

    #[error("Duplicate zone id: {0}")]
    DuplicateId(String),

    #[error("Zone '{id}' has invalid radius {radius} (must be a positive number of km)")]
    InvalidRadius { id: String, radius: f64 },

    #[error("Zone '{id}' has an invalid center: {source}")]
    InvalidCenter {
        id: String,
        #[source]
        source: CoordError,
    },
}

/// The fixed set of zones a tracker evaluates against.
///
/// Order is significant: it decides which zone wins when zones overlap.
/// The catalog cannot be modified after construction.
#[derive(Debug, Clone)]
pub struct ZoneCatalog {
    zones: Vec<Zone>,
}

impl ZoneCatalog {
    /// Build a catalog, validating every zone.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] for empty or duplicate ids, a radius that is
    /// not a positive finite number, or a center outside the WGS84 ranges.
    pub fn new(zones: Vec<Zone>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(zones.len());

        for zone in &zones {
            if zone.id.is_empty() {
                return Err(CatalogError::EmptyId);
            }
            if !seen.insert(zone.id.as_str()) {
                return Err(CatalogError::DuplicateId(zone.id.clone()));
            }
            if !zone.radius_km.is_finite() || zone.radius_km <= 0.0 {
                return Err(CatalogError::InvalidRadius {
                    id: zone.id.clone(),
                    radius: zone.radius_km,
                });
            }
            validate_coordinates(zone.center.lat, zone.center.lon).map_err(|source| {
                CatalogError::InvalidCenter {
                    id: zone.id.clone(),
                    source,
                }
            })?;
        }

        Ok(Self { zones })
    }

    /// The built-in catalog used when no zones are configured.
    pub fn builtin() -> Self {
        Self {
            zones: vec![
                Zone::new(
                    "zone-1",
                    "Downtown Depot",
                    GeoPoint::new(40.7128, -74.006),
                    2.0,
                ),
                Zone::new(
                    "zone-2",
                    "Airport Terminal",
                    GeoPoint::new(40.7769, -73.874),
                    3.0,
                ),
                Zone::new(
                    "zone-3",
                    "Harbor District",
                    GeoPoint::new(40.6892, -74.0445),
                    2.5,
                ),
            ],
        }
    }

    /// Zones in declaration order.
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Look up a zone by id.
    pub fn get(&self, id: &str) -> Option<&Zone> {
        self.zones.iter().find(|zone| zone.id == id)
    }

    /// First zone containing the point.
    pub fn zone_for(&self, lat: f64, lon: f64) -> Option<&Zone> {
        zone_for(lat, lon, &self.zones)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Zone> {
        self.zones.iter()
    }
}

impl Default for ZoneCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl<'a> IntoIterator for &'a ZoneCatalog {
    type Item = &'a Zone;
    type IntoIter = std::slice::Iter<'a, Zone>;

    fn into_iter(self) -> Self::IntoIter {
        self.zones.iter()
    }
}
