//! Configuration file parsing for the daemon.
//!
//! Loads the storage TTL and store locations plus the janitor settings from
//! a TOML file:
//!
//! ```toml
//! [storage]
//! ttl_secs = 2592000
//! database_path = "lapse.db"
//! blob_dir = "blobs"
//!
//! [janitor]
//! sweep_interval_secs = 600
//! workers = 1
//! batch_size = 10
//! log_deletion_errors = false
//! ```

use crate::error::{CliError, Result};
use lapse_domain::ConfigProvider;
use lapse_janitor::JanitorConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level daemon configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LapseConfig {
    /// Storage settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Janitor settings
    #[serde(default)]
    pub janitor: JanitorConfig,
}

/// Where records live and how long they are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Retention window in seconds; 0 disables the janitor
    #[serde(default)]
    pub ttl_secs: u64,

    /// SQLite database holding record metadata
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// Directory holding one file per blob
    #[serde(default = "default_blob_dir")]
    pub blob_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 0,
            database_path: default_database_path(),
            blob_dir: default_blob_dir(),
        }
    }
}

fn default_database_path() -> PathBuf {
    PathBuf::from("lapse.db")
}

fn default_blob_dir() -> PathBuf {
    PathBuf::from("blobs")
}

impl LapseConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: LapseConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, otherwise fall back to defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                tracing::warn!("No config file specified, using defaults (janitor disabled)");
                Ok(Self::default())
            }
        }
    }

    /// Check values that would stop the janitor from running
    pub fn validate(&self) -> Result<()> {
        self.janitor
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    /// Render as pretty TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl ConfigProvider for LapseConfig {
    fn storage_ttl(&self) -> Duration {
        Duration::from_secs(self.storage.ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = LapseConfig::default();
        assert_eq!(config.storage.ttl_secs, 0);
        assert_eq!(config.storage_ttl(), Duration::ZERO);
        assert_eq!(config.storage.database_path, PathBuf::from("lapse.db"));
        assert_eq!(config.janitor, JanitorConfig::default());
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            [storage]
            ttl_secs = 86400
            database_path = "/var/lib/lapse/meta.db"
            blob_dir = "/var/lib/lapse/blobs"

            [janitor]
            sweep_interval_secs = 300
            workers = 2
            log_deletion_errors = true
        "#;

        let config: LapseConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.storage_ttl(), Duration::from_secs(86400));
        assert_eq!(config.storage.blob_dir, PathBuf::from("/var/lib/lapse/blobs"));
        assert_eq!(config.janitor.sweep_interval_secs, 300);
        assert_eq!(config.janitor.workers, 2);
        assert_eq!(config.janitor.batch_size, 10);
        assert!(config.janitor.log_deletion_errors);
    }

    #[test]
    fn test_from_file_rejects_invalid_janitor() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[janitor]\nworkers = 0").unwrap();

        let result = LapseConfig::from_file(file.path());
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_from_file_missing() {
        let result = LapseConfig::from_file("/definitely/not/here.toml");
        assert!(matches!(result, Err(CliError::Io(_))));
    }

    #[test]
    fn test_load_without_path_uses_defaults() {
        let config = LapseConfig::load(None).unwrap();
        assert_eq!(config, LapseConfig::default());
    }

    #[test]
    fn test_to_toml_parses_back() {
        let mut config = LapseConfig::default();
        config.storage.ttl_secs = 3600;
        config.janitor.workers = 3;

        let rendered = config.to_toml().unwrap();
        let parsed: LapseConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }
}
