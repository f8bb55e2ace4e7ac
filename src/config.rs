//! Engine configuration persistence
//!
//! Stores engine defaults in `~/.config/flexdock/config.yaml`

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::model::{GlobalAttributes, FLOAT_Z_INDEX_BASE};
use crate::view::DropTuning;

/// Engine-wide defaults a host can tune without touching layout documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Attributes used by documents that leave them out
    pub global: GlobalAttributes,
    /// Drop-target hit-testing numbers
    pub drop: DropTuning,
    /// Z-index of the bottom-most floating window
    pub z_index_base: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            global: GlobalAttributes::default(),
            drop: DropTuning::default(),
            z_index_base: FLOAT_Z_INDEX_BASE,
        }
    }
}

impl EngineConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("{}; using defaults", e);
                Self::default()
            }
        }
    }

    /// Load and validate config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
        let config: EngineConfig = serde_yaml::from_str(&content)
            .map_err(|e| format!("Failed to parse config at {}: {}", path.display(), e))?;
        config
            .global
            .validate()
            .map_err(|e| format!("Invalid config at {}: {}", path.display(), e))?;
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    /// Save config to disk
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}
