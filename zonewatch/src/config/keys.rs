//! Addressable scalar configuration keys (`section.key`).

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::file::{parse_value, ConfigError, ConfigFile};
use crate::tracker::EvictionKind;

/// A scalar setting that can be read and written by name.
///
/// Zone sections are not addressable this way; edit the file to change them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    ServerBind,
    EventsCapacity,
    TrackerEviction,
    TrackerTtlSecs,
    TrackerMaxVehicles,
    TrackerSweepIntervalSecs,
    LoggingLevel,
    LoggingDirectory,
}

const ALL_KEYS: &[ConfigKey] = &[
    ConfigKey::ServerBind,
    ConfigKey::EventsCapacity,
    ConfigKey::TrackerEviction,
    ConfigKey::TrackerTtlSecs,
    ConfigKey::TrackerMaxVehicles,
    ConfigKey::TrackerSweepIntervalSecs,
    ConfigKey::LoggingLevel,
    ConfigKey::LoggingDirectory,
];

impl ConfigKey {
    /// Every key, grouped by section.
    pub fn all() -> &'static [ConfigKey] {
        ALL_KEYS
    }

    /// Full name, e.g. `server.bind`.
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::ServerBind => "server.bind",
            ConfigKey::EventsCapacity => "events.capacity",
            ConfigKey::TrackerEviction => "tracker.eviction",
            ConfigKey::TrackerTtlSecs => "tracker.ttl_secs",
            ConfigKey::TrackerMaxVehicles => "tracker.max_vehicles",
            ConfigKey::TrackerSweepIntervalSecs => "tracker.sweep_interval_secs",
            ConfigKey::LoggingLevel => "logging.level",
            ConfigKey::LoggingDirectory => "logging.directory",
        }
    }

    /// Section part of the name.
    pub fn section(&self) -> &'static str {
        self.split().0
    }

    /// Key part of the name.
    pub fn key_name(&self) -> &'static str {
        self.split().1
    }

    fn split(&self) -> (&'static str, &'static str) {
        let name = self.name();
        name.split_once('.').unwrap_or((name, ""))
    }

    /// Current value as text; empty when unset.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::ServerBind => config.server.bind.to_string(),
            ConfigKey::EventsCapacity => config.events.capacity.to_string(),
            ConfigKey::TrackerEviction => config.tracker.eviction.as_str().to_string(),
            ConfigKey::TrackerTtlSecs => config.tracker.ttl_secs.to_string(),
            ConfigKey::TrackerMaxVehicles => config.tracker.max_vehicles.to_string(),
            ConfigKey::TrackerSweepIntervalSecs => config.tracker.sweep_interval_secs.to_string(),
            ConfigKey::LoggingLevel => config.logging.level.clone(),
            ConfigKey::LoggingDirectory => config
                .logging
                .directory
                .as_ref()
                .map(|dir| dir.display().to_string())
                .unwrap_or_default(),
        }
    }

    /// Validate and store a value.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let name = self.name();
        match self {
            ConfigKey::ServerBind => config.server.bind = parse_value(name, value)?,
            ConfigKey::EventsCapacity => config.events.capacity = parse_value(name, value)?,
            ConfigKey::TrackerEviction => {
                config.tracker.eviction = parse_value::<EvictionKind>(name, value)?
            }
            ConfigKey::TrackerTtlSecs => {
                config.tracker.ttl_secs = positive(name, value)?;
            }
            ConfigKey::TrackerMaxVehicles => {
                config.tracker.max_vehicles = parse_value(name, value)?;
            }
            ConfigKey::TrackerSweepIntervalSecs => {
                config.tracker.sweep_interval_secs = positive(name, value)?;
            }
            ConfigKey::LoggingLevel => {
                let level = value.trim();
                if level.is_empty() {
                    return Err(ConfigError::InvalidValue {
                        key: name.to_string(),
                        value: value.to_string(),
                        reason: "level must not be empty".to_string(),
                    });
                }
                config.logging.level = level.to_string();
            }
            ConfigKey::LoggingDirectory => {
                let dir = value.trim();
                config.logging.directory = (!dir.is_empty()).then(|| PathBuf::from(dir));
            }
        }
        Ok(())
    }
}

fn positive(key: &str, value: &str) -> Result<u64, ConfigError> {
    let parsed: u64 = parse_value(key, value)?;
    if parsed == 0 {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(parsed)
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ALL_KEYS
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
