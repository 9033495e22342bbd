//! CLI error type.

use std::fmt;

use zonewatch::app::AppError;
use zonewatch::config::ConfigError;
use zonewatch::coord::CoordError;

/// Errors reported to the user before exiting with a failure status.
#[derive(Debug)]
pub enum CliError {
    /// Configuration could not be loaded, parsed or saved
    Config(String),
    /// A command-line argument was out of range
    InvalidArgument(String),
    /// Logging setup failed
    Logging(std::io::Error),
    /// The service failed to start or stopped with an error
    App(AppError),
    /// Failed to create the async runtime
    Runtime(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::Logging(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::App(e) => write!(f, "{}", e),
            CliError::Runtime(e) => write!(f, "Failed to create runtime: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Logging(e) | CliError::Runtime(e) => Some(e),
            CliError::App(e) => Some(e),
            CliError::Config(_) | CliError::InvalidArgument(_) => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<AppError> for CliError {
    fn from(e: AppError) -> Self {
        CliError::App(e)
    }
}

impl From<CoordError> for CliError {
    fn from(e: CoordError) -> Self {
        CliError::InvalidArgument(e.to_string())
    }
}
