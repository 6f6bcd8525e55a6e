//! Configuration for Janitor operations
//!
//! Defines the sweep interval, worker pool size and batch size. The TTL
//! itself comes from a [`ConfigProvider`](lapse_domain::ConfigProvider).

use crate::JanitorError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Janitor service
///
/// All values are read once when the janitor is constructed; nothing here is
/// reloaded at runtime.
///
/// # Examples
///
/// ```
/// use lapse_janitor::JanitorConfig;
///
/// let config = JanitorConfig::default();
/// assert_eq!(config.sweep_interval_secs, 600);
/// assert_eq!(config.workers, 1);
/// assert_eq!(config.batch_size, 10);
/// assert!(!config.log_deletion_errors);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JanitorConfig {
    /// How often the sweep cycle runs (in seconds)
    /// Default: 600 (every 10 minutes)
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Number of worker tasks sharing the sweep timer
    /// Default: 1
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Maximum records fetched and deleted per sweep cycle
    /// Default: 10
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Log failures when looking up or deleting expired data
    /// Default: false
    #[serde(default)]
    pub log_deletion_errors: bool,
}

/// Longest accepted sweep interval: one year
pub const MAX_SWEEP_INTERVAL_SECS: u64 = 365 * 24 * 3600;

fn default_sweep_interval_secs() -> u64 {
    600
}

fn default_workers() -> usize {
    1
}

fn default_batch_size() -> usize {
    10
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: default_sweep_interval_secs(),
            workers: default_workers(),
            batch_size: default_batch_size(),
            log_deletion_errors: false,
        }
    }
}

impl JanitorConfig {
    /// Get sweep interval as Duration
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Reject values the scheduler cannot run with
    pub fn validate(&self) -> Result<(), JanitorError> {
        if self.sweep_interval_secs == 0 {
            return Err(JanitorError::Config(
                "sweep_interval_secs must be greater than 0".to_string(),
            ));
        }
        if self.sweep_interval_secs > MAX_SWEEP_INTERVAL_SECS {
            return Err(JanitorError::Config(format!(
                "sweep_interval_secs must be at most {}",
                MAX_SWEEP_INTERVAL_SECS
            )));
        }
        if self.workers == 0 {
            return Err(JanitorError::Config(
                "workers must be at least 1".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(JanitorError::Config(
                "batch_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = JanitorConfig::default();
        assert_eq!(config.sweep_interval_secs, 600);
        assert_eq!(config.workers, 1);
        assert_eq!(config.batch_size, 10);
        assert!(!config.log_deletion_errors);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_duration_conversion() {
        let config = JanitorConfig::default();
        assert_eq!(config.sweep_interval(), Duration::from_secs(10 * 60));
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let config = JanitorConfig {
            workers: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(JanitorError::Config(_))));

        let config = JanitorConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(JanitorError::Config(_))));

        let config = JanitorConfig {
            sweep_interval_secs: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(JanitorError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_unbounded_interval() {
        let config = JanitorConfig {
            sweep_interval_secs: u64::MAX,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(JanitorError::Config(_))));

        let config = JanitorConfig {
            sweep_interval_secs: MAX_SWEEP_INTERVAL_SECS + 1,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(JanitorError::Config(_))));

        let config = JanitorConfig {
            sweep_interval_secs: MAX_SWEEP_INTERVAL_SECS,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: JanitorConfig = toml::from_str("workers = 4").unwrap();
        assert_eq!(config.workers, 4);
        assert_eq!(config.sweep_interval_secs, 600);
        assert_eq!(config.batch_size, 10);
        assert!(!config.log_deletion_errors);
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = JanitorConfig {
            log_deletion_errors: true,
            ..Default::default()
        };
        let serialized = serde_json::to_string(&config).unwrap();
        let deserialized: JanitorConfig = serde_json::from_str(&serialized).unwrap();

        assert_eq!(config, deserialized);
    }
}
