//! INI-backed configuration file.

use std::fs;
use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use ini::Ini;
use thiserror::Error;

use super::keys::ConfigKey;
use crate::coord::GeoPoint;
use crate::events::DEFAULT_EVENT_CAPACITY;
use crate::tracker::{EvictionKind, EvictionPolicy};
use crate::zone::{CatalogError, Zone, ZoneCatalog};

/// Environment variable overriding the configuration file location.
pub const CONFIG_ENV_VAR: &str = "ZONEWATCH_CONFIG";

const ZONE_SECTION_PREFIX: &str = "zone.";

/// Errors raised while loading, parsing or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(String),

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    #[error("Invalid zone catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// `[server]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub bind: SocketAddr,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
        }
    }
}

/// `[events]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct EventSettings {
    /// Size of the recent-events ring buffer.
    pub capacity: usize,
}

impl Default for EventSettings {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

/// `[tracker]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerSettings {
    pub eviction: EvictionKind,
    pub ttl_secs: u64,
    pub max_vehicles: usize,
    pub sweep_interval_secs: u64,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            eviction: EvictionKind::None,
            ttl_secs: 3600,
            max_vehicles: 10_000,
            sweep_interval_secs: 60,
        }
    }
}

impl TrackerSettings {
    /// Resolve the configured kind and limits into a policy.
    pub fn eviction_policy(&self) -> EvictionPolicy {
        match self.eviction {
            EvictionKind::None => EvictionPolicy::None,
            EvictionKind::Ttl => EvictionPolicy::Ttl {
                max_age_ms: i64::try_from(self.ttl_secs.saturating_mul(1000)).unwrap_or(i64::MAX),
            },
            EvictionKind::Lru => EvictionPolicy::Lru {
                max_vehicles: self.max_vehicles,
            },
        }
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    /// Default filter directive, overridden by `RUST_LOG`.
    pub level: String,
    /// Directory for daily rolling log files; console only when unset.
    pub directory: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

/// The full configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub server: ServerSettings,
    pub events: EventSettings,
    pub tracker: TrackerSettings,
    pub logging: LoggingSettings,
    /// Zones in declaration order; empty means "use the built-in catalog".
    pub zones: Vec<Zone>,
}

/// Location of the configuration file.
///
/// `ZONEWATCH_CONFIG` wins; otherwise `<config dir>/zonewatch/config.ini`.
pub fn config_file_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("zonewatch")
        .join("config.ini")
}

impl ConfigFile {
    /// Load from the default location, falling back to defaults when the file
    /// does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load from an explicit path, falling back to defaults when the file does
    /// not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parse INI text.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for (section, props) in ini.iter() {
            let Some(section) = section else {
                continue;
            };

            if let Some(zone_id) = section.strip_prefix(ZONE_SECTION_PREFIX) {
                config.zones.push(parse_zone(zone_id, props)?);
                continue;
            }

            for (key, value) in props.iter() {
                let name = format!("{}.{}", section, key);
                // Unrecognised keys are ignored so older binaries accept newer files
                if let Ok(config_key) = name.parse::<ConfigKey>() {
                    config_key.set(&mut config, value)?;
                }
            }
        }

        Ok(config)
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Save to an explicit path, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        self.to_ini().write_to_file(path).map_err(io_err)
    }

    /// Render as an INI document.
    pub fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();

        for key in ConfigKey::all() {
            ini.with_section(Some(key.section()))
                .set(key.key_name(), key.get(self));
        }

        for zone in &self.zones {
            ini.with_section(Some(format!("{}{}", ZONE_SECTION_PREFIX, zone.id)))
                .set("name", zone.name.as_str())
                .set("lat", zone.center.lat.to_string())
                .set("lon", zone.center.lon.to_string())
                .set("radius_km", zone.radius_km.to_string());
        }

        ini
    }

    /// Build the zone catalog, using the built-in zones when none are declared.
    pub fn catalog(&self) -> Result<ZoneCatalog, ConfigError> {
        if self.zones.is_empty() {
            return Ok(ZoneCatalog::builtin());
        }
        Ok(ZoneCatalog::new(self.zones.clone())?)
    }
}

fn parse_zone(id: &str, props: &ini::Properties) -> Result<Zone, ConfigError> {
    let section = format!("{}{}", ZONE_SECTION_PREFIX, id);
    let number = |key: &str| -> Result<f64, ConfigError> {
        let raw = props.get(key).ok_or_else(|| ConfigError::InvalidValue {
            key: format!("{}.{}", section, key),
            value: String::new(),
            reason: "missing".to_string(),
        })?;
        parse_value(&format!("{}.{}", section, key), raw)
    };

    Ok(Zone::new(
        id,
        props.get("name").unwrap_or(id),
        GeoPoint::new(number("lat")?, number("lon")?),
        number("radius_km")?,
    ))
}

/// Parse a value, mapping failures to [`ConfigError::InvalidValue`].
pub(crate) fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[server]
bind = 0.0.0.0:8080

[events]
capacity = 50

[tracker]
eviction = lru
max_vehicles = 25
sweep_interval_secs = 5

[logging]
level = debug
directory = /var/log/zonewatch

[zone.yard]
name = Rail Yard
lat = 40.75
lon = -74.0
radius_km = 1.5

[zone.pier]
lat = 40.70
lon = -74.02
radius_km = 0.5
"#;

    #[test]
    fn test_defaults() {
        let config = ConfigFile::default();
        assert_eq!(config.server.bind.to_string(), "127.0.0.1:3000");
        assert_eq!(config.events.capacity, 1000);
        assert_eq!(config.tracker.eviction_policy(), EvictionPolicy::None);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.catalog().unwrap().len(), 3);
    }

    #[test]
    fn test_parse_full_file() {
        let config = ConfigFile::parse(SAMPLE).unwrap();
        assert_eq!(config.server.bind.port(), 8080);
        assert_eq!(config.events.capacity, 50);
        assert_eq!(
            config.tracker.eviction_policy(),
            EvictionPolicy::Lru { max_vehicles: 25 }
        );
        assert_eq!(config.tracker.sweep_interval(), Duration::from_secs(5));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(
            config.logging.directory,
            Some(PathBuf::from("/var/log/zonewatch"))
        );

        let catalog = config.catalog().unwrap();
        let ids: Vec<&str> = catalog.iter().map(|z| z.id.as_str()).collect();
        assert_eq!(ids, vec!["yard", "pier"]);
        assert_eq!(catalog.get("yard").unwrap().name, "Rail Yard");
        // Name falls back to the id
        assert_eq!(catalog.get("pier").unwrap().name, "pier");
    }

    #[test]
    fn test_invalid_value_is_reported() {
        let err = ConfigFile::parse("[events]\ncapacity = lots\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "events.capacity"));
    }

    #[test]
    fn test_zone_missing_radius() {
        let err = ConfigFile::parse("[zone.a]\nlat = 1\nlon = 2\n").unwrap_err();
        assert!(err.to_string().contains("zone.a.radius_km"));
    }

    #[test]
    fn test_invalid_zone_rejected_by_catalog() {
        let config = ConfigFile::parse("[zone.a]\nlat = 1\nlon = 2\nradius_km = -3\n").unwrap();
        assert!(matches!(
            config.catalog(),
            Err(ConfigError::Catalog(CatalogError::InvalidRadius { .. }))
        ));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.ini");

        let original = ConfigFile::parse(SAMPLE).unwrap();
        original.save_to(&path).unwrap();

        let reloaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(reloaded, original);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigFile::load_from(&dir.path().join("absent.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }
}
