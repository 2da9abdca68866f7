//! Configuration management for xdscan.
//!
//! Centralizes timeout settings, concurrency bounds and WHOIS retry policy.
//! Values can come from environment variables (`XDSCAN_*`) or command-line
//! arguments; the CLI wins. Validation runs before any work is dispatched:
//! a bad timeout or a zero-sized worker pool is the only fatal error in the
//! whole tool.

use std::time::Duration;

/// Main configuration structure for xdscan.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Network operation settings
    pub network: NetworkConfig,

    /// Worker-pool settings
    pub scan: ScanSettings,
}

/// Network-related configuration options
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Timeout for one crossdomain.xml fetch (connect + read, hard bound)
    pub http_timeout: Duration,

    /// Timeout for DNS liveness lookups
    pub dns_timeout: Duration,

    /// Timeout for each WHOIS network step
    pub whois_timeout: Duration,

    /// Retry attempts for transient WHOIS failures
    pub whois_retry_attempts: u32,
}

/// Worker-pool configuration
#[derive(Debug, Clone)]
pub struct ScanSettings {
    /// Maximum concurrent fetch->parse->classify pipelines. Bounded
    /// independently of input size so large lists cannot exhaust local
    /// sockets or hammer target hosts.
    pub concurrency: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            http_timeout: Duration::from_secs(3),
            dns_timeout: Duration::from_secs(5),
            whois_timeout: Duration::from_secs(8),
            whois_retry_attempts: 1,
        }
    }
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self { concurrency: 16 }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(secs) = std::env::var("XDSCAN_HTTP_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse::<u64>() {
                config.network.http_timeout = Duration::from_secs(secs);
            }
        }

        if let Ok(secs) = std::env::var("XDSCAN_DNS_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse::<u64>() {
                config.network.dns_timeout = Duration::from_secs(secs);
            }
        }

        if let Ok(secs) = std::env::var("XDSCAN_WHOIS_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse::<u64>() {
                config.network.whois_timeout = Duration::from_secs(secs);
            }
        }

        if let Ok(n) = std::env::var("XDSCAN_CONCURRENCY") {
            if let Ok(n) = n.parse::<usize>() {
                config.scan.concurrency = n;
            }
        }

        config
    }

    /// Merge with CLI arguments, giving CLI precedence
    pub fn merge_with_cli(&mut self, cli: &crate::cli::Cli) {
        self.network.http_timeout = Duration::from_secs(cli.http_timeout);
        self.scan.concurrency = cli.concurrency;
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.network.http_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "network.http_timeout".to_string(),
                value: "0".to_string(),
                reason: "Timeout must be greater than 0".to_string(),
            });
        }

        if self.network.dns_timeout.is_zero() || self.network.whois_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                field: "network.dns_timeout/whois_timeout".to_string(),
                value: "0".to_string(),
                reason: "Lookup timeouts must be greater than 0".to_string(),
            });
        }

        if self.scan.concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scan.concurrency".to_string(),
                value: "0".to_string(),
                reason: "Worker pool must hold at least one worker".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
    /// Invalid configuration value
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue {
                field,
                value,
                reason,
            } => {
                write!(f, "Invalid value '{}' for '{}': {}", value, field, reason)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
