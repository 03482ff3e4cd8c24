// Sys Manager - Audio Models
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Default render endpoint volume types.

use serde::{Deserialize, Serialize};

/// Volume reported when the endpoint cannot be read.
pub const DEFAULT_VOLUME_PERCENT: u32 = 50;

/// Step metadata reported when the endpoint cannot be read.
pub const DEFAULT_STEP_COUNT: u32 = 20;

/// Snapshot of the default render endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioVolumeState {
    /// Scalar level, 0.0-1.0.
    pub level: f32,
    pub muted: bool,
}

impl AudioVolumeState {
    pub fn percent(&self) -> u32 {
        scalar_to_percent(self.level)
    }
}

/// Discrete step position of the endpoint volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeSteps {
    pub current: u32,
    pub total: u32,
}

impl Default for VolumeSteps {
    fn default() -> Self {
        Self {
            current: 0,
            total: DEFAULT_STEP_COUNT,
        }
    }
}

/// Endpoint volume range in decibels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeRange {
    pub min_db: f32,
    pub max_db: f32,
    pub increment_db: f32,
}

impl Default for VolumeRange {
    fn default() -> Self {
        Self {
            min_db: -96.0,
            max_db: 0.0,
            increment_db: 0.5,
        }
    }
}

/// Convert a scalar level to a percentage, clamped to 0-100.
pub fn scalar_to_percent(level: f32) -> u32 {
    if !level.is_finite() {
        return DEFAULT_VOLUME_PERCENT;
    }
    (level * 100.0).round().clamp(0.0, 100.0) as u32
}

/// Convert a percentage (already clamped) to a scalar level.
pub fn percent_to_scalar(percent: u32) -> f32 {
    percent.min(100) as f32 / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_round_trip_is_exact() {
        for p in 0..=100 {
            assert_eq!(scalar_to_percent(percent_to_scalar(p)), p);
        }
    }

    #[test]
    fn test_scalar_out_of_range() {
        assert_eq!(scalar_to_percent(-0.2), 0);
        assert_eq!(scalar_to_percent(1.7), 100);
        assert_eq!(scalar_to_percent(f32::NAN), DEFAULT_VOLUME_PERCENT);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(VolumeSteps::default(), VolumeSteps { current: 0, total: 20 });
        let range = VolumeRange::default();
        assert_eq!((range.min_db, range.max_db, range.increment_db), (-96.0, 0.0, 0.5));
    }
}
