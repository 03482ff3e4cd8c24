// Sys Manager - Display Models
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Monitor brightness types.

use serde::{Deserialize, Serialize};

/// Which brightness backend a service was bound to at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrightnessBackendKind {
    /// DDC/CI through physical-monitor handles.
    HardwareProtocol,
    /// Desktop management (WMI) brightness classes, for built-in panels.
    DesktopManagement,
}

impl BrightnessBackendKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::HardwareProtocol => "DDC/CI",
            Self::DesktopManagement => "WMI",
        }
    }
}

/// One display panel with its brightness range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalMonitor {
    /// Raw physical-monitor handle value; `None` for the synthetic
    /// internal-panel entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<usize>,
    pub description: String,
    pub minimum: u32,
    pub maximum: u32,
    pub current: u32,
    pub supports_ddc: bool,
}

impl PhysicalMonitor {
    /// Current brightness relative to this monitor's own range.
    pub fn percent(&self) -> u32 {
        raw_to_percent(self.minimum, self.current, self.maximum).unwrap_or(0)
    }
}

/// Map a raw reading into 0-100; `None` when the range is empty.
pub fn raw_to_percent(minimum: u32, current: u32, maximum: u32) -> Option<u32> {
    if maximum <= minimum {
        return None;
    }
    let span = u64::from(maximum - minimum);
    let offset = u64::from(current.clamp(minimum, maximum) - minimum);
    Some(((offset * 100 + span / 2) / span) as u32)
}

/// Map a percentage onto a monitor's raw range, rounding to nearest.
pub fn percent_to_raw(minimum: u32, maximum: u32, percent: u32) -> u32 {
    if maximum <= minimum {
        return minimum;
    }
    let span = u64::from(maximum - minimum);
    let percent = u64::from(percent.min(100));
    minimum + ((span * percent + 50) / 100) as u32
}
