//! Configuration file support for sketch-dispatch.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/sketch-dispatch/config.toml`. Settings include controller
//! source names, per-action bindings, stick thresholds and the world save location.
//!
//! If no config file exists, defaults matching the stock controller layout are used.

pub mod bindings;
pub mod types;

pub use bindings::{BindingMap, BindingsConfig, HandMap};
pub use types::{HandsConfig, IntensityConfig, PersistenceConfig};

use anyhow::{Context, Result, anyhow};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "sketch-dispatch";
const SERIALIZATION_DIR: &str = "serialization";

/// Main configuration structure containing all user settings.
///
/// # Example TOML
/// ```toml
/// [hands]
/// left_source = "left_hand"
/// right_source = "right_hand"
///
/// [intensity]
/// threshold = 0.9
/// step = 0.05
///
/// [persistence]
/// directory = "~/sketches"
/// file_name = "BezierSurfaceTool.xml"
///
/// [bindings]
/// save_world = ["left"]
/// load_world = ["right"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Controller source names and origins
    #[serde(default)]
    pub hands: HandsConfig,

    /// Curve intensity stick tuning
    #[serde(default)]
    pub intensity: IntensityConfig,

    /// World save/load location
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// Which hands each action listens on
    #[serde(default)]
    pub bindings: BindingsConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Validated ranges:
    /// - `intensity.threshold`: 0.1 - 1.0
    /// - `intensity.step`: 0.001 - 1.0
    /// - `persistence.file_name`: non-empty, no path separators
    pub(crate) fn validate_and_clamp(&mut self) {
        if !(0.1..=1.0).contains(&self.intensity.threshold) {
            log::warn!(
                "Invalid intensity threshold {:.3}, clamping to 0.1-1.0 range",
                self.intensity.threshold
            );
            self.intensity.threshold = if self.intensity.threshold.is_nan() {
                0.9
            } else {
                self.intensity.threshold.clamp(0.1, 1.0)
            };
        }

        if !(0.001..=1.0).contains(&self.intensity.step) {
            log::warn!(
                "Invalid intensity step {:.3}, clamping to 0.001-1.0 range",
                self.intensity.step
            );
            self.intensity.step = if self.intensity.step.is_nan() {
                0.05
            } else {
                self.intensity.step.clamp(0.001, 1.0)
            };
        }

        let file_name = self.persistence.file_name.trim();
        if file_name.is_empty() || file_name.contains(['/', '\\']) {
            log::warn!(
                "Invalid world file_name '{}', falling back to '{}'",
                self.persistence.file_name,
                types::default_world_file()
            );
            self.persistence.file_name = types::default_world_file();
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/sketch-dispatch/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join(APP_DIR);

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Loads configuration from an explicit path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or contains invalid TOML syntax.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config = Self::from_toml_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;
        config.validate_and_clamp();

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Serializes the configuration as pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    /// Resolves the file the sketch world is saved to and loaded from.
    ///
    /// # Errors
    /// Returns an error if no directory is configured and the platform data
    /// directory cannot be determined, or if the configured directory is empty.
    pub fn world_path(&self) -> Result<PathBuf> {
        let base_dir = match &self.persistence.directory {
            Some(raw) => {
                let expanded = expand_tilde(raw);
                if expanded.as_os_str().is_empty() {
                    return Err(anyhow!(
                        "persistence.directory resolved to an empty path"
                    ));
                }
                expanded
            }
            None => dirs::data_dir()
                .context("Could not find data directory")?
                .join(APP_DIR)
                .join(SERIALIZATION_DIR),
        };

        Ok(base_dir.join(&self.persistence.file_name))
    }

    /// Builds the parsed binding and hand lookup tables.
    pub fn build_input_maps(&self) -> Result<(HandMap, BindingMap)> {
        let hands = HandMap::new(&self.hands.left_source, &self.hands.right_source)
            .context("Invalid [hands] configuration")?;
        let bindings = self
            .bindings
            .build_binding_map()
            .context("Invalid [bindings] configuration")?;
        Ok((hands, bindings))
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
