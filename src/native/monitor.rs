// Sys Manager - Display Bindings
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Physical-monitor (DDC/CI) and desktop-management brightness ports.

use super::NativeResult;

/// Logical display monitor handle (`HMONITOR`) reported by enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DisplayMonitorId(pub usize);

/// Physical monitor handle value (`PHYSICAL_MONITOR.hPhysicalMonitor`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhysicalHandle(pub usize);

/// One `PHYSICAL_MONITOR` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPhysicalMonitor {
    pub handle: PhysicalHandle,
    pub description: String,
}

/// Reading from `GetMonitorBrightness`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrightnessReading {
    pub minimum: u32,
    pub current: u32,
    pub maximum: u32,
}

/// Port to the DDC/CI monitor configuration API.
pub trait MonitorApi {
    /// Every attached display monitor, via callback-based enumeration.
    fn display_monitors(&self) -> NativeResult<Vec<DisplayMonitorId>>;

    /// Physical monitors behind one display monitor. The caller owns the
    /// returned handles and must hand them back through
    /// [`destroy_physical_monitors`](Self::destroy_physical_monitors).
    fn physical_monitors(&self, monitor: DisplayMonitorId) -> NativeResult<Vec<RawPhysicalMonitor>>;

    fn get_brightness(&self, handle: PhysicalHandle) -> NativeResult<BrightnessReading>;

    fn set_brightness(&self, handle: PhysicalHandle, value: u32) -> NativeResult<()>;

    /// Destroy a whole batch of physical monitors in one call.
    fn destroy_physical_monitors(&self, monitors: Vec<RawPhysicalMonitor>) -> NativeResult<()>;
}

/// Port to the desktop management brightness classes
/// (`WmiMonitorBrightness`, `WmiMonitorBrightnessMethods`,
/// `WmiMonitorBrightnessLevels`).
pub trait DesktopBrightnessApi {
    /// Current brightness percentage of the first instance, if any.
    fn current_brightness(&self) -> NativeResult<Option<u32>>;

    /// Apply a percentage through the first methods instance.
    fn set_brightness(&self, percent: u32) -> NativeResult<()>;

    /// Supported levels of the first instance, if any.
    fn brightness_levels(&self) -> NativeResult<Option<Vec<u8>>>;
}
