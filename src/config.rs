//! Configuration management
//!
//! Handles loading, validation, and merging of configuration from:
//! - TOML files
//! - Environment variables (via CLI `env` fallbacks)
//! - CLI arguments

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Transport (X connection) configuration
    #[serde(default)]
    pub transport: TransportConfig,
    /// Daemon election configuration
    #[serde(default)]
    pub election: ElectionConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// X connection settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransportConfig {
    /// X display to connect to; `None` uses `$DISPLAY`
    pub display: Option<String>,
}

/// Daemon election settings.
///
/// Ownership of the marker selection settles server-side almost
/// immediately; the deadline only bounds the confirmation poll so a lost
/// race surfaces as an error instead of a spin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElectionConfig {
    /// Total time to wait for the marker owner to settle, in milliseconds
    pub timeout_ms: u64,
    /// Delay between ownership probes, in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for ElectionConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 1000,
            poll_interval_ms: 10,
        }
    }
}

impl ElectionConfig {
    /// Poll deadline as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Probe interval as a [`Duration`]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Base log level when `RUST_LOG` is unset (`error|warn|info|debug|trace`)
    pub level: String,
    /// Log format (`pretty|compact|json`)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Override config with CLI arguments
    pub fn with_overrides(mut self, display: Option<String>) -> Self {
        if display.is_some() {
            self.transport.display = display;
        }
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.election.poll_interval_ms <= self.election.timeout_ms,
            "election poll interval ({} ms) exceeds election timeout ({} ms)",
            self.election.poll_interval_ms,
            self.election.timeout_ms
        );
        anyhow::ensure!(
            matches!(self.logging.format.as_str(), "pretty" | "compact" | "json"),
            "unknown log format: {}",
            self.logging.format
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.transport.display.is_none());
        assert_eq!(config.election.timeout_ms, 1000);
        assert_eq!(config.election.poll_interval_ms, 10);
        assert_eq!(config.logging.level, "info");
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[transport]\ndisplay = \":1\"\n\n[election]\ntimeout_ms = 250\npoll_interval_ms = 5\n"
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.transport.display.as_deref(), Some(":1"));
        assert_eq!(config.election.timeout(), Duration::from_millis(250));
        // Unspecified sections fall back to defaults
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.election.poll_interval_ms = 5000;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let config = Config::default().with_overrides(Some(":7".to_string()));
        assert_eq!(config.transport.display.as_deref(), Some(":7"));

        let config = Config {
            transport: TransportConfig {
                display: Some(":2".to_string()),
            },
            ..Config::default()
        };
        let config = config.with_overrides(None);
        assert_eq!(config.transport.display.as_deref(), Some(":2"));
    }
}
