use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::value_objects::thresholds::VitalThresholds;

/// Top-level application configuration loaded from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub thresholds: ThresholdConfig,
    #[serde(default)]
    pub directory: DirectoryConfig,
    #[serde(default)]
    pub presentation: PresentationConfig,
}

/// General settings: fallback label and channel sizing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_fallback_label")]
    pub fallback_subject_label: String,
    #[serde(default = "default_feed_buffer")]
    pub feed_buffer: usize,
}

/// Normal ranges for vital signs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdConfig {
    #[serde(default = "default_heart_rate_min")]
    pub heart_rate_min: f64,
    #[serde(default = "default_heart_rate_max")]
    pub heart_rate_max: f64,
    #[serde(default = "default_oxygen_min")]
    pub oxygen_saturation_min: f64,
    #[serde(default = "default_systolic_min")]
    pub systolic_min: f64,
    #[serde(default = "default_systolic_max")]
    pub systolic_max: f64,
}

/// Where patient names come from: a JSON file, a REST endpoint, or nowhere.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectoryConfig {
    #[serde(default)]
    pub patients_file: Option<String>,
    #[serde(default)]
    pub rest_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Toast outputs: terminal and an optional JSON-lines log file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresentationConfig {
    #[serde(default = "default_true")]
    pub terminal: bool,
    #[serde(default)]
    pub log_file: Option<String>,
}

// --- Defaults ---

fn default_fallback_label() -> String {
    "Unknown patient".into()
}

const fn default_feed_buffer() -> usize {
    256
}

const fn default_heart_rate_min() -> f64 {
    50.0
}

const fn default_heart_rate_max() -> f64 {
    120.0
}

const fn default_oxygen_min() -> f64 {
    90.0
}

const fn default_systolic_min() -> f64 {
    90.0
}

const fn default_systolic_max() -> f64 {
    180.0
}

const fn default_true() -> bool {
    true
}

// --- Default impls ---

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            fallback_subject_label: default_fallback_label(),
            feed_buffer: default_feed_buffer(),
        }
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            heart_rate_min: default_heart_rate_min(),
            heart_rate_max: default_heart_rate_max(),
            oxygen_saturation_min: default_oxygen_min(),
            systolic_min: default_systolic_min(),
            systolic_max: default_systolic_max(),
        }
    }
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            terminal: default_true(),
            log_file: None,
        }
    }
}

// --- AppConfig methods ---

impl AppConfig {
    /// Load config from default path or create default config file
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined,
    /// the file cannot be read, or the TOML content is invalid.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_or_create(&path)
    }

    /// Load from a specific path, or create a default config file if missing
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML content is invalid,
    /// or the default config file cannot be written.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            let config = Self::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    /// Load from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML content is invalid.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    /// Save config to a specific path, creating parent directories if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created,
    /// serialization fails, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("carewatch").join("config.toml"))
    }
}

impl From<&ThresholdConfig> for VitalThresholds {
    fn from(config: &ThresholdConfig) -> Self {
        let heart_rate_min = config.heart_rate_min.max(0.0);
        let systolic_min = config.systolic_min.max(0.0);

        Self {
            heart_rate_min,
            heart_rate_max: config.heart_rate_max.max(heart_rate_min),
            oxygen_saturation_min: config.oxygen_saturation_min.clamp(0.0, 100.0),
            systolic_min,
            systolic_max: config.systolic_max.max(systolic_min),
        }
    }
}
