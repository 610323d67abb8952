//! Configuration management for redtag.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use chrono::Duration;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "redtag";

/// Longest accepted recency window, in days.
pub const MAX_RECENT_WINDOW_DAYS: u32 = 36_500;

/// Default database file name.
const DATABASE_FILE_NAME: &str = "redtag.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `REDTAG_`, sections split on `__`)
/// 2. TOML config file at `~/.config/redtag/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Analysis configuration.
    pub analysis: AnalysisConfig,
    /// Export configuration.
    pub export: ExportConfig,
    /// Intake validation configuration.
    pub intake: IntakeConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/redtag/redtag.db`
    pub database_path: Option<PathBuf>,
    /// Reject submissions identical to one already on record.
    pub deduplicate: bool,
}

/// Analysis-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Length of the top parts and top assets lists.
    pub top_n: usize,
    /// Size of the recency window in days.
    pub recent_window_days: u32,
    /// Share of records inside the window above which the failure rate is
    /// reported as increasing.
    pub increasing_threshold: f64,
}

/// Export-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory export files are written to.
    /// Defaults to the current directory.
    pub output_dir: Option<PathBuf>,
}

/// Intake validation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Regex a site (MFC) code must match.
    pub mfc_pattern: String,
    /// Maximum number of attached files per submission.
    pub max_attachments: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: None, // Will be resolved to default at runtime
            deduplicate: true,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_n: 5,
            recent_window_days: 30,
            increasing_threshold: 0.6,
        }
    }
}

impl AnalysisConfig {
    /// The recency window as a Duration.
    #[must_use]
    pub fn recent_window(&self) -> Duration {
        Duration::days(i64::from(self.recent_window_days))
    }
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            mfc_pattern: r"^[A-Za-z0-9][A-Za-z0-9_-]*$".to_string(),
            max_attachments: 10,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("REDTAG_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.analysis.top_n == 0 {
            return Err(Error::ConfigValidation {
                message: "top_n must be greater than 0".to_string(),
            });
        }

        let window = self.analysis.recent_window_days;
        if window == 0 || window > MAX_RECENT_WINDOW_DAYS {
            return Err(Error::ConfigValidation {
                message: format!(
                    "recent_window_days ({window}) must be between 1 and {MAX_RECENT_WINDOW_DAYS}"
                ),
            });
        }

        let threshold = self.analysis.increasing_threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(Error::ConfigValidation {
                message: format!("increasing_threshold ({threshold}) must be in (0, 1]"),
            });
        }

        if regex::Regex::new(&self.intake.mfc_pattern).is_err() {
            return Err(Error::ConfigValidation {
                message: format!("invalid regex pattern: {}", self.intake.mfc_pattern),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the export directory, resolving defaults if not set.
    #[must_use]
    pub fn export_dir(&self) -> PathBuf {
        self.export
            .output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
