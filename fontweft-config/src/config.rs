//! The [`FontConfig`] struct and its YAML persistence.
//!
//! Covers:
//! - `load` / `load_from` / `from_yaml_str` (missing file falls back to defaults)
//! - `save_to` (YAML serialization)
//! - `validate` (semantic checks run after every load)

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::ConfigError;
use crate::types::{AntiAliasMode, LogicalFamilies, canonical_family_name};

/// Upper bound for `retained_strikes`; larger values defeat sweeping.
const MAX_RETAINED_STRIKES: usize = 4096;

/// Font resolution and strike caching settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Logical family used when a font request cannot be resolved.
    #[serde(default = "defaults::default_family")]
    pub default_family: String,

    /// Platform family names backing each logical family.
    pub logical_families: LogicalFamilies,

    /// Ordered fallback families appended to every composite font.
    #[serde(default = "defaults::fallback_families")]
    pub fallback_families: Vec<String>,

    /// How many recently acquired strikes are kept alive between sweeps.
    /// Zero disables retention.
    #[serde(default = "defaults::retained_strikes")]
    pub retained_strikes: usize,

    /// Strike acquisitions between automatic sweeps of a strike map.
    /// Zero disables automatic sweeps.
    #[serde(default = "defaults::sweep_interval")]
    pub sweep_interval: u32,

    /// Antialiasing used when a caller does not request one.
    pub default_antialias: AntiAliasMode,

    /// Whether the platform directory scans the system font directories.
    #[serde(default = "defaults::load_system_fonts")]
    pub load_system_fonts: bool,

    /// Extra directories scanned for font files.
    pub font_dirs: Vec<PathBuf>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            default_family: defaults::default_family(),
            logical_families: LogicalFamilies::default(),
            fallback_families: defaults::fallback_families(),
            retained_strikes: defaults::retained_strikes(),
            sweep_interval: defaults::sweep_interval(),
            default_antialias: AntiAliasMode::default(),
            load_system_fonts: defaults::load_system_fonts(),
            font_dirs: Vec::new(),
        }
    }
}

impl FontConfig {
    /// Default location of the config file (`<config dir>/fontweft/fonts.yaml`).
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fontweft")
            .join("fonts.yaml")
    }

    /// Load configuration from the default path, or defaults if absent.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, or defaults if the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("No font config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        log::info!("Loading font config from {:?}", path);
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Parse and validate configuration from a YAML document.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: FontConfig = serde_yaml_ng::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration to `path` as YAML, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let yaml = serde_yaml_ng::to_string(self)?;
        fs::write(path, yaml).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Saved font config to {:?}", path);
        Ok(())
    }

    /// Check field values that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if canonical_family_name(&self.default_family).is_none() {
            return Err(ConfigError::Validation(format!(
                "default_family must be one of System, Serif, SansSerif, Monospaced (got '{}')",
                self.default_family
            )));
        }
        if self.retained_strikes > MAX_RETAINED_STRIKES {
            return Err(ConfigError::Validation(format!(
                "retained_strikes must be at most {} (got {})",
                MAX_RETAINED_STRIKES, self.retained_strikes
            )));
        }
        if self.logical_families.system.is_empty() {
            return Err(ConfigError::Validation(
                "logical_families.system must name at least one family".to_string(),
            ));
        }
        Ok(())
    }
}
