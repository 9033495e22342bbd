//! Geographic coordinate math.
//!
//! Provides great-circle distance on a spherical Earth and range validation
//! for latitude/longitude pairs received from location reports.

mod types;

pub use types::{CoordError, GeoPoint, EARTH_RADIUS_KM, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Great-circle distance between two points using the haversine formula.
///
/// # Arguments
///
/// * `lat_a`, `lon_a` - First point in degrees
/// * `lat_b`, `lon_b` - Second point in degrees
///
/// # Returns
///
/// Distance in kilometers on a sphere of radius [`EARTH_RADIUS_KM`]. The result
/// is symmetric in its arguments and never negative.
#[inline]
pub fn distance_km(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> f64 {
    let d_lat = (lat_b - lat_a).to_radians();
    let d_lon = (lon_b - lon_a).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat_a.to_radians().cos() * lat_b.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push `a` just outside [0, 1] for near-antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Validates a latitude/longitude pair and returns it as a [`GeoPoint`].
///
/// NaN and infinite values are rejected along with out-of-range values.
pub fn validate_coordinates(lat: f64, lon: f64) -> Result<GeoPoint, CoordError> {
    if !(MIN_LAT..=MAX_LAT).contains(&lat) {
        return Err(CoordError::InvalidLatitude(lat));
    }
    if !(MIN_LON..=MAX_LON).contains(&lon) {
        return Err(CoordError::InvalidLongitude(lon));
    }
    Ok(GeoPoint::new(lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_is_zero() {
        assert_eq!(distance_km(40.7128, -74.006, 40.7128, -74.006), 0.0);
        assert_eq!(distance_km(0.0, 0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        // One degree along a meridian is R * pi / 180
        let expected = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;
        let d = distance_km(0.0, 0.0, 1.0, 0.0);
        assert!((d - expected).abs() < 1e-9, "got {}", d);
    }

    #[test]
    fn test_downtown_to_airport() {
        // Lower Manhattan to LaGuardia is roughly 13 km
        let d = distance_km(40.7128, -74.006, 40.7769, -73.874);
        assert!(d > 12.0 && d < 14.0, "got {}", d);
    }

    #[test]
    fn test_antipodal_points() {
        let d = distance_km(0.0, 0.0, 0.0, 180.0);
        let half_circumference = EARTH_RADIUS_KM * std::f64::consts::PI;
        assert!((d - half_circumference).abs() < 1e-6);
    }

    #[test]
    fn test_across_antimeridian() {
        let d = distance_km(0.0, 179.9, 0.0, -179.9);
        assert!(d < 23.0, "should take the short way round, got {}", d);
    }

    #[test]
    fn test_geo_point_distance_delegates() {
        let a = GeoPoint::new(40.7128, -74.006);
        let b = GeoPoint::new(40.6892, -74.0445);
        assert_eq!(a.distance_km(&b), distance_km(a.lat, a.lon, b.lat, b.lon));
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(90.0, -180.0).is_ok());
        assert!(matches!(
            validate_coordinates(90.5, 0.0),
            Err(CoordError::InvalidLatitude(_))
        ));
        assert!(matches!(
            validate_coordinates(0.0, 181.0),
            Err(CoordError::InvalidLongitude(_))
        ));
        assert!(matches!(
            validate_coordinates(f64::NAN, 0.0),
            Err(CoordError::InvalidLatitude(_))
        ));
    }

    #[test]
    fn test_geo_point_display() {
        let p = GeoPoint::new(40.7128, -74.006);
        assert_eq!(p.to_string(), "40.7128°N 74.0060°W");
    }

    #[test]
    fn test_geo_point_serializes_as_lat_lng() {
        let json = serde_json::to_value(GeoPoint::new(1.5, -2.5)).unwrap();
        assert_eq!(json, serde_json::json!({"lat": 1.5, "lng": -2.5}));
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_distance_symmetric(
                lat_a in -90.0..=90.0_f64,
                lon_a in -180.0..=180.0_f64,
                lat_b in -90.0..=90.0_f64,
                lon_b in -180.0..=180.0_f64,
            ) {
                let ab = distance_km(lat_a, lon_a, lat_b, lon_b);
                let ba = distance_km(lat_b, lon_b, lat_a, lon_a);
                prop_assert!(
                    (ab - ba).abs() < 1e-9,
                    "distance not symmetric: {} vs {}", ab, ba
                );
            }

            #[test]
            fn test_distance_non_negative_and_bounded(
                lat_a in -90.0..=90.0_f64,
                lon_a in -180.0..=180.0_f64,
                lat_b in -90.0..=90.0_f64,
                lon_b in -180.0..=180.0_f64,
            ) {
                let d = distance_km(lat_a, lon_a, lat_b, lon_b);
                prop_assert!(d >= 0.0, "negative distance {}", d);
                prop_assert!(
                    d <= EARTH_RADIUS_KM * std::f64::consts::PI + 1e-6,
                    "distance {} exceeds half circumference", d
                );
            }

            #[test]
            fn test_distance_to_self_is_zero(
                lat in -90.0..=90.0_f64,
                lon in -180.0..=180.0_f64,
            ) {
                prop_assert_eq!(distance_km(lat, lon, lat, lon), 0.0);
            }
        }
    }
}
