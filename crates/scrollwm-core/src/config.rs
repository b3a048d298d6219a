//! Top-level configuration, loaded once at startup.
//!
//! Loaded from `<config_dir>/scrollwm/config.toml`. Missing sections and
//! missing files both fall back to defaults (`#[serde(default)]` plus a
//! `Config::default()` fallback in [`load`]) — a parse failure is logged,
//! not fatal, matching §7's tolerance for recoverable errors.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::log::LogConfig;
use crate::log_warn;

/// Layout algorithm parameters (§4.C).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Gap in pixels applied on every edge of a workspace's layout.
    pub gap_px: i32,
    /// Widths cycled by `toggle-preset-width`, matched via `round(width, 2)`.
    pub preset_widths: Vec<f64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            gap_px: 12,
            preset_widths: crate::model::PRESET_WIDTHS.to_vec(),
        }
    }
}

/// Top-level configuration for scrollwm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            log: LogConfig::default(),
        }
    }
}

/// Returns the config directory: `<config_dir>/scrollwm/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("scrollwm"))
}

/// Returns the config file path: `<config_dir>/scrollwm/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Loads the configuration from disk, falling back to defaults.
///
/// Absence of the file is silent; a file that fails to parse logs a
/// warning and falls back to defaults rather than aborting startup.
pub fn load() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };

    let Ok(content) = std::fs::read_to_string(&path) else {
        return Config::default();
    };

    match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            log_warn!("failed to parse {}: {e}", path.display());
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_spec_preset_widths() {
        // Arrange / Act
        let config = Config::default();

        // Assert
        assert_eq!(config.layout.gap_px, 12);
        assert_eq!(config.layout.preset_widths, vec![0.4, 0.5, 0.6, 1.0]);
        assert!(!config.log.enabled);
    }

    #[test]
    fn partial_toml_uses_defaults_for_missing_fields() {
        // Arrange
        let toml_str = "[layout]\ngap_px = 16\n";

        // Act
        let config: Config = toml::from_str(toml_str).unwrap();

        // Assert
        assert_eq!(config.layout.gap_px, 16);
        assert_eq!(config.layout.preset_widths, vec![0.4, 0.5, 0.6, 1.0]);
    }

    #[test]
    fn config_roundtrips_through_toml() {
        // Arrange
        let config = Config::default();

        // Act
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();

        // Assert
        assert_eq!(deserialized, config);
    }
}
