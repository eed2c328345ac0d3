//! Configuration management for Filewarden.

use crate::core::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Detection settings (denylist, classifier)
    pub detection: DetectionConfig,
    /// Quarantine settings
    pub quarantine: QuarantineConfig,
    /// Process sweep settings
    pub sweep: SweepConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            detection: DetectionConfig::default(),
            quarantine: QuarantineConfig::default(),
            sweep: SweepConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigLoad(format!("Failed to read config file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| Error::ConfigLoad(format!("Failed to parse config file: {}", e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::ConfigSave(format!("Failed to create config directory: {}", e)))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| Error::ConfigSave(format!("Failed to write config file: {}", e)))
    }

    /// Load configuration from the default location, or create defaults.
    pub fn load_or_default() -> Self {
        let config_path = Self::default_config_path();

        if config_path.exists() {
            match Self::load(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    log::warn!("Failed to load config, using defaults: {}", e);
                }
            }
        }

        Self::default()
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        Self::data_dir().join("config.json")
    }

    /// Get the application data directory.
    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("filewarden")
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<()> {
        let t = self.detection.threat_threshold;
        if !(0.0..=1.0).contains(&t) {
            return Err(Error::ConfigInvalid {
                field: "detection.threat_threshold".to_string(),
                message: "Must be between 0.0 and 1.0".to_string(),
            });
        }

        if self.sweep.flagged_names.iter().any(|n| n.trim().is_empty()) {
            return Err(Error::ConfigInvalid {
                field: "sweep.flagged_names".to_string(),
                message: "Flagged name substrings must be non-empty".to_string(),
            });
        }

        Ok(())
    }
}

/// Detection configuration: denylist and classifier sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Path to a JSON denylist file; built-in entries are used when absent
    pub denylist_path: Option<PathBuf>,
    /// Path to a JSON classifier weight file; no heuristic stage when absent
    pub model_path: Option<PathBuf>,
    /// Classifier probability above which a file is blocked
    pub threat_threshold: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            denylist_path: None,
            model_path: None,
            threat_threshold: crate::detection::classifier::DEFAULT_THREAT_THRESHOLD,
        }
    }
}

/// Quarantine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuarantineConfig {
    /// Directory blocked files are moved into
    pub quarantine_dir: Option<PathBuf>,
}

impl Default for QuarantineConfig {
    fn default() -> Self {
        Self {
            quarantine_dir: None,
        }
    }
}

impl QuarantineConfig {
    /// Get the effective quarantine directory.
    pub fn dir(&self) -> PathBuf {
        self.quarantine_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("quarantined_files"))
    }
}

/// Process sweep configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// Substrings matched case-insensitively against process names
    pub flagged_names: Vec<String>,
    /// Append-only log of termination actions
    pub action_log: Option<PathBuf>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            flagged_names: crate::sweeper::FlaggedNames::default_names(),
            action_log: None,
        }
    }
}

impl SweepConfig {
    /// Get the effective action log path.
    pub fn action_log_path(&self) -> PathBuf {
        self.action_log
            .clone()
            .unwrap_or_else(|| PathBuf::from("antivirus_actions.log"))
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.detection.threat_threshold, 0.85);
    }

    #[test]
    fn test_config_save_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test_config.json");

        let config = Config::default();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(
            loaded.detection.threat_threshold,
            config.detection.threat_threshold
        );
        assert_eq!(loaded.sweep.flagged_names, config.sweep.flagged_names);
    }

    #[test]
    fn test_invalid_threshold() {
        let mut config = Config::default();
        config.detection.threat_threshold = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_paths() {
        let config = Config::default();
        assert_eq!(
            config.quarantine.dir(),
            PathBuf::from("quarantined_files")
        );
        assert_eq!(
            config.sweep.action_log_path(),
            PathBuf::from("antivirus_actions.log")
        );
    }
}
