//! # Configuration Utilities
//!
//! Runtime settings for the `imagecypher` binary, loaded from an optional TOML
//! file. Every field has a default, so an empty file (or no file at all) is a
//! valid configuration.
//!
//! The key derivation parameters are intentionally absent: they live as
//! constants in [`crate::encryption::key_derivation`] because changing them
//! would make previously encoded images undecodable.
//!
//! ## Example
//!
//! ```toml
//! [limits]
//! max_message_bytes = 65536
//!
//! [logging]
//! level = "info"
//! ```

use anyhow::Result;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs;
use std::str::FromStr;

/// Largest accepted message, in UTF-8 bytes (1 MiB).
pub const MAX_MESSAGE_LENGTH: usize = 1024 * 1024;

/// Load a TOML configuration file and deserialize it into the specified type.
///
/// # Arguments
/// - `path`: Path to the TOML configuration file
///
/// # Returns
/// - `Ok(T)`: Successfully loaded and parsed configuration
/// - `Err`: File I/O or parsing error
///
/// # Example
/// ```ignore
/// let config: CypherConfig = load_config("config/imagecypher.toml")?;
/// ```
pub fn load_config<T>(path: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Complete configuration of the tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CypherConfig {
    /// Input limits enforced before any encryption happens
    pub limits: LimitsConfig,
    /// Log verbosity
    pub logging: LoggingConfig,
}

/// Input limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum message size in bytes (default: [`MAX_MESSAGE_LENGTH`])
    pub max_message_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_message_bytes: MAX_MESSAGE_LENGTH,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace`
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl CypherConfig {
    /// Load the configuration from a TOML file.
    ///
    /// # Example
    /// ```ignore
    /// let config = CypherConfig::from_file("config/imagecypher.toml")?;
    /// ```
    pub fn from_file(path: &str) -> Result<Self> {
        let config: CypherConfig = load_config(path)?;
        if config.limits.max_message_bytes == 0 {
            anyhow::bail!("limits.max_message_bytes must be greater than zero");
        }
        Ok(config)
    }

    /// Parsed log level; unknown names fall back to `warn`.
    pub fn log_level(&self) -> LevelFilter {
        LevelFilter::from_str(self.logging.level.trim()).unwrap_or(LevelFilter::Warn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = CypherConfig::default();
        assert_eq!(config.limits.max_message_bytes, 1024 * 1024);
        assert_eq!(config.log_level(), LevelFilter::Warn);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nlevel = \"debug\"").unwrap();

        let config = CypherConfig::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.log_level(), LevelFilter::Debug);
        assert_eq!(config.limits.max_message_bytes, MAX_MESSAGE_LENGTH);
    }

    #[test]
    fn test_zero_limit_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[limits]\nmax_message_bytes = 0").unwrap();

        assert!(CypherConfig::from_file(file.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn test_unknown_level_falls_back() {
        let mut config = CypherConfig::default();
        config.logging.level = "loud".to_string();
        assert_eq!(config.log_level(), LevelFilter::Warn);
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(CypherConfig::from_file("/definitely/not/here.toml").is_err());
    }
}
