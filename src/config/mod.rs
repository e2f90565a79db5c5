//! Console configuration.
//!
//! Loaded from a TOML file; every section is optional with sensible
//! defaults, so a bare `[gateway]` pointing at the right origin is
//! enough to get started.
//!
//! # Example
//!
//! ```toml
//! [gateway]
//! base_url = "https://gateway.internal:8080"
//!
//! [display]
//! default_range_days = 7
//! page_size = 50
//! ```

mod gateway;

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use gateway::GatewayConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Root configuration for the console.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsoleConfig {
    /// Gateway connection settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// View defaults.
    #[serde(default)]
    pub display: DisplayConfig,

    /// Logging configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl ConsoleConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }
}

/// Defaults for the views.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DisplayConfig {
    /// Initial date range, in days.
    #[serde(default = "default_range_days")]
    pub default_range_days: u16,

    /// Conversation browser page size.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Processing-status poll interval in seconds.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            default_range_days: default_range_days(),
            page_size: default_page_size(),
            poll_interval_secs: default_poll_interval(),
        }
    }
}

fn default_range_days() -> u16 {
    30
}

fn default_page_size() -> u32 {
    25
}

fn default_poll_interval() -> u64 {
    5
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObservabilityConfig {
    /// Tracing filter directive, overridable with `RUST_LOG`.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        ObservabilityConfig {
            log_filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConsoleConfig::default();
        assert_eq!(config.display.default_range_days, 30);
        assert_eq!(config.display.page_size, 25);
        assert_eq!(config.display.poll_interval_secs, 5);
        assert_eq!(config.observability.log_filter, "info");
    }

    #[test]
    fn test_parse_overrides_with_section_defaults() {
        let toml = r#"
            [display]
            default_range_days = 7

            [gateway]
            base_url = "https://gateway.example.com"
        "#;
        let config: ConsoleConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.display.default_range_days, 7);
        // Unspecified fields keep their defaults.
        assert_eq!(config.display.page_size, 25);
        assert_eq!(config.gateway.base_url, "https://gateway.example.com");
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let toml = r#"
            [display]
            pagesize = 10
        "#;
        assert!(toml::from_str::<ConsoleConfig>(toml).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[display]\npage_size = 100").unwrap();

        let config = ConsoleConfig::load(file.path()).unwrap();
        assert_eq!(config.display.page_size, 100);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = ConsoleConfig::load(Path::new("/nonexistent/quaestor.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
