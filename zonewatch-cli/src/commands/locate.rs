//! Locate command - first configured zone containing a point.

use zonewatch::coord::validate_coordinates;
use zonewatch::zone::ZoneCatalog;

use crate::error::CliError;
use crate::runner::CliRunner;

pub fn run(runner: &CliRunner, lat: f64, lon: f64) -> Result<(), CliError> {
    let catalog = runner.config().catalog()?;
    println!("{}", describe(&catalog, lat, lon)?);
    Ok(())
}

fn describe(catalog: &ZoneCatalog, lat: f64, lon: f64) -> Result<String, CliError> {
    let point = validate_coordinates(lat, lon)?;

    Ok(match catalog.zone_for(point.lat, point.lon) {
        Some(zone) => format!(
            "{}: {} ({}), {:.3} km from center",
            point,
            zone.id,
            zone.name,
            zone.center.distance_km(&point)
        ),
        None => format!("{}: outside all {} zones", point, catalog.len()),
    })
}
