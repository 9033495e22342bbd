//! Shared setup for commands that touch the tracker.

use std::path::Path;

use tracing::info;
use zonewatch::config::ConfigFile;
use zonewatch::logging::{init_logging, LoggingGuard};

use crate::error::CliError;

/// Loaded configuration plus the logging guard for the command's lifetime.
pub struct CliRunner {
    config: ConfigFile,
    _logging: LoggingGuard,
}

impl CliRunner {
    /// Load the configuration file and install the tracing subscriber.
    ///
    /// `verbose` forces debug level regardless of `logging.level`.
    pub fn new(config_path: &Path, verbose: bool) -> Result<Self, CliError> {
        let config = ConfigFile::load_from(config_path)?;

        let level = if verbose {
            "debug"
        } else {
            config.logging.level.as_str()
        };
        let logging =
            init_logging(level, config.logging.directory.as_deref()).map_err(CliError::Logging)?;

        info!(config = %config_path.display(), "Configuration loaded");

        Ok(Self {
            config,
            _logging: logging,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log the command being run along with the crate version.
    pub fn log_startup(&self, command: &str) {
        info!(version = zonewatch::VERSION, command, "ZoneWatch starting");
    }
}
