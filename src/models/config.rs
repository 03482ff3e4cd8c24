// Sys Manager - Application Configuration
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Application configuration model.

use serde::{Deserialize, Serialize};

use super::events::DEFAULT_EVENT_CAPACITY;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Wait after the scan-trigger probe before reading results, in ms.
    #[serde(default = "default_scan_settle_ms")]
    pub scan_settle_ms: u64,

    /// Default brightness increase/decrease step, in percent.
    #[serde(default = "default_brightness_step")]
    pub brightness_step: u32,

    /// Default volume increase/decrease step, in percent.
    #[serde(default = "default_volume_step")]
    pub volume_step: u32,

    /// Undelivered events kept per subscriber.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_scan_settle_ms() -> u64 {
    500
}

fn default_brightness_step() -> u32 {
    10
}

fn default_volume_step() -> u32 {
    5
}

fn default_event_capacity() -> usize {
    DEFAULT_EVENT_CAPACITY
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            scan_settle_ms: default_scan_settle_ms(),
            brightness_step: default_brightness_step(),
            volume_step: default_volume_step(),
            event_capacity: default_event_capacity(),
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML file.
    pub fn load_from_file(path: &std::path::Path) -> Result<Self, super::Error> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| super::Error::ConfigReadFailed(format!("{}: {}", path.display(), e)))?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to TOML file.
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), super::Error> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Scan settle interval as a duration.
    pub fn scan_settle(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.scan_settle_ms)
    }
}
