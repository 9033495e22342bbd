//! Distance command - haversine distance between two points.

use zonewatch::coord::validate_coordinates;

use crate::error::CliError;

pub fn run(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Result<(), CliError> {
    let a = validate_coordinates(lat1, lon1)?;
    let b = validate_coordinates(lat2, lon2)?;

    println!("{} -> {}: {:.3} km", a, b, a.distance_km(&b));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_out_of_range() {
        let err = run(91.0, 0.0, 0.0, 0.0).unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument(_)));
        assert!(run(0.0, 0.0, 0.0, -181.0).is_err());
    }

    #[test]
    fn test_accepts_valid_points() {
        assert!(run(40.7128, -74.006, 40.7769, -73.874).is_ok());
    }
}
