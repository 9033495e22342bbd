//! Application error types.

use std::fmt;
use std::io;
use std::net::SocketAddr;

/// Errors that can occur during application lifecycle.
#[derive(Debug)]
pub enum AppError {
    /// Failed to bind the HTTP listener.
    Bind { addr: SocketAddr, source: io::Error },

    /// The HTTP server stopped with an error.
    Server(io::Error),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Bind { addr, source } => {
                write!(f, "Failed to bind {}: {}", addr, source)
            }
            AppError::Server(e) => {
                write!(f, "HTTP server error: {}", e)
            }
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Bind { source, .. } => Some(source),
            AppError::Server(e) => Some(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_display() {
        let err = AppError::Server(io::Error::new(io::ErrorKind::BrokenPipe, "closed"));
        assert!(err.to_string().contains("HTTP server error"));
        assert!(err.to_string().contains("closed"));
    }

    #[test]
    fn test_bind_error_has_source() {
        let err = AppError::Bind {
            addr: "127.0.0.1:1".parse().unwrap(),
            source: io::Error::new(io::ErrorKind::AddrInUse, "in use"),
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("127.0.0.1:1"));
    }
}
