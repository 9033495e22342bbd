//! Zones command - print the configured catalog in match order.

use zonewatch::zone::ZoneCatalog;

use crate::error::CliError;
use crate::runner::CliRunner;

pub fn run(runner: &CliRunner) -> Result<(), CliError> {
    let catalog = runner.config().catalog()?;
    print!("{}", render(&catalog));
    Ok(())
}

fn render(catalog: &ZoneCatalog) -> String {
    if catalog.is_empty() {
        return "No zones configured\n".to_string();
    }

    let mut out = format!(
        "{:<12} {:<24} {:>22} {:>10}\n",
        "ID", "NAME", "CENTER", "RADIUS"
    );
    for zone in catalog {
        out.push_str(&format!(
            "{:<12} {:<24} {:>22} {:>7.2} km\n",
            zone.id,
            zone.name,
            zone.center.to_string(),
            zone.radius_km
        ));
    }
    out.push_str(&format!("\n{} zone(s); the first match wins where zones overlap\n", catalog.len()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_keeps_catalog_order() {
        let out = render(&ZoneCatalog::builtin());
        let depot = out.find("Downtown Depot").unwrap();
        let airport = out.find("Airport Terminal").unwrap();
        let harbor = out.find("Harbor District").unwrap();
        assert!(depot < airport && airport < harbor);
        assert!(out.contains("3 zone(s)"));
    }

    #[test]
    fn test_render_empty() {
        let empty = ZoneCatalog::new(Vec::new()).unwrap();
        assert_eq!(render(&empty), "No zones configured\n");
    }
}
