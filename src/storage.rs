// Sys Manager - Local Storage
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Location and persistence of the settings file.
//!
//! Settings live in `settings.toml` under the user's configuration
//! directory. A missing or unreadable file yields the defaults; a broken
//! file is logged and left untouched until the next save.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::models::{AppConfig, Result};
use crate::CONFIG_DIR_NAME;

const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Settings file store.
#[derive(Debug)]
pub struct ConfigStore {
    config_dir: PathBuf,
    settings_file: PathBuf,
    config: AppConfig,
}

impl ConfigStore {
    /// Store under the default configuration directory.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR_NAME);
        Self::with_config_dir(config_dir)
    }

    /// Store under a specific directory.
    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        let settings_file = config_dir.join(SETTINGS_FILE_NAME);
        let config = Self::load(&settings_file);
        Self {
            config_dir,
            settings_file,
            config,
        }
    }

    fn load(path: &Path) -> AppConfig {
        if !path.exists() {
            return AppConfig::default();
        }
        match AppConfig::load_from_file(path) {
            Ok(config) => {
                info!("Loaded settings from {:?}", path);
                config
            }
            Err(e) => {
                warn!("Failed to load settings from {:?}: {}; using defaults", path, e);
                AppConfig::default()
            }
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn settings_file(&self) -> &Path {
        &self.settings_file
    }

    /// Replace the settings and write them to disk.
    pub fn update(&mut self, config: AppConfig) -> Result<()> {
        self.config = config;
        self.save()
    }

    /// Write the current settings to disk, creating the directory if needed.
    pub fn save(&self) -> Result<()> {
        if let Err(e) = fs::create_dir_all(&self.config_dir) {
            error!("Failed to create config directory: {}", e);
            return Err(e.into());
        }
        self.config.save_to_file(&self.settings_file)?;
        info!("Saved settings to {:?}", self.settings_file);
        Ok(())
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::with_config_dir(dir.path().join("sys-manager"));
        assert_eq!(store.config(), &AppConfig::default());
        assert!(!store.settings_file().exists());
    }

    #[test]
    fn test_update_persists() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join("sys-manager");
        let mut store = ConfigStore::with_config_dir(config_dir.clone());
        let config = AppConfig {
            volume_step: 2,
            ..AppConfig::default()
        };
        store.update(config.clone()).unwrap();

        let reloaded = ConfigStore::with_config_dir(config_dir);
        assert_eq!(reloaded.config(), &config);
    }

    #[test]
    fn test_broken_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(SETTINGS_FILE_NAME), "brightness_step = [").unwrap();
        let store = ConfigStore::with_config_dir(dir.path().to_path_buf());
        assert_eq!(store.config(), &AppConfig::default());
    }
}
