//! Unified error handling for xdscan.
//!
//! A `thiserror`-based model with:
//!   * Typed variants for the failure domains the scanner meets
//!   * A categorization layer (`ErrorCategory`) for reporting
//!   * Helper constructors
//!   * `From` conversions for common lower-level errors
//!
//! Almost everything that can go wrong during a scan (an unreachable host,
//! a garbled policy document, a WHOIS outage) is recovered locally and
//! surfaced through the observer; these variants cover the few places where
//! an error genuinely propagates: invalid configuration before dispatch,
//! I/O on input/output files, and client construction.

use std::io;

use thiserror::Error;

/// High-level classification for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Network,
    Internal,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorCategory::Input => "input",
            ErrorCategory::Network => "network",
            ErrorCategory::Internal => "internal",
        };
        f.write_str(s)
    }
}

/// Primary application error type.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Network error during {operation} for '{target}': {source}")]
    Network {
        operation: String,
        target: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("I/O error during {operation} on {path}: {source}")]
    Io {
        path: String,
        operation: String,
        #[source]
        source: io::Error,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ScanError {
    /// Categorize the error for reporting.
    pub fn category(&self) -> ErrorCategory {
        use ScanError::*;
        match self {
            Configuration { .. } => ErrorCategory::Input,
            Network { .. } => ErrorCategory::Network,
            Io { .. } | Internal { .. } => ErrorCategory::Internal,
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn network(
        operation: impl Into<String>,
        target: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Network {
            operation: operation.into(),
            target: target.into(),
            source: source.into(),
        }
    }

    pub fn io(path: impl Into<String>, operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Public result alias.
pub type Result<T> = std::result::Result<T, ScanError>;

impl From<io::Error> for ScanError {
    fn from(e: io::Error) -> Self {
        ScanError::Io {
            path: "<unknown>".into(),
            operation: "unspecified".into(),
            source: e,
        }
    }
}

/// Extension trait for enriching IO results with path + operation context.
pub trait IoResultExt<T> {
    fn with_path(self, path: impl Into<String>, operation: impl Into<String>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::result::Result<T, io::Error> {
    fn with_path(self, path: impl Into<String>, operation: impl Into<String>) -> Result<T> {
        self.map_err(|e| ScanError::io(path.into(), operation.into(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_mapping() {
        assert_eq!(
            ScanError::configuration("bad timeout").category(),
            ErrorCategory::Input
        );
        assert_eq!(
            ScanError::network(
                "fetch",
                "example.com",
                io::Error::new(io::ErrorKind::ConnectionRefused, "refused")
            )
            .category(),
            ErrorCategory::Network
        );
        assert_eq!(
            ScanError::internal("boom").category(),
            ErrorCategory::Internal
        );
    }

    #[test]
    fn display_snippets() {
        let e = ScanError::network(
            "fetch",
            "example.com",
            io::Error::new(io::ErrorKind::TimedOut, "timed out"),
        );
        let s = e.to_string();
        assert!(s.contains("fetch"));
        assert!(s.contains("example.com"));
    }

    #[test]
    fn io_context() {
        let res: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let mapped = res.with_path("/tmp/domains.txt", "read");
        match mapped.err().unwrap() {
            ScanError::Io {
                path, operation, ..
            } => {
                assert_eq!(path, "/tmp/domains.txt");
                assert_eq!(operation, "read");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
