// Sys Manager - Brightness Service
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Display brightness through DDC/CI, falling back to the desktop
//! management brightness classes for panels DDC/CI cannot reach.
//!
//! The backend is chosen once, when the service is built, by probing the
//! first physical monitor, the same handle every hardware read uses. Every physical-monitor handle obtained while probing
//! is kept in one batch and destroyed in a single call when the service is
//! dropped, whichever backend won.

use tracing::{debug, info, warn};

use crate::models::display::{percent_to_raw, raw_to_percent};
use crate::models::{
    AppConfig, BatchOutcome, BrightnessBackendKind, EventBus, PhysicalMonitor, ServiceEvent,
};
use crate::native::monitor::{DesktopBrightnessApi, MonitorApi, RawPhysicalMonitor};

#[cfg(windows)]
use crate::native::win32::{MonitorConfiguration, WmiBrightness};

/// Reading reported by the fallback backend when it has none.
pub const FALLBACK_BRIGHTNESS: u32 = 50;

/// Description of the synthetic fallback monitor entry.
pub const INTERNAL_PANEL_DESCRIPTION: &str = "Built-in Display";

/// Levels assumed when the panel does not list its own.
pub fn default_brightness_levels() -> Vec<u8> {
    (0..=10).map(|i| i * 10).collect()
}

pub struct BrightnessService<M: MonitorApi, D: DesktopBrightnessApi> {
    monitors: M,
    desktop: D,
    /// Every physical monitor obtained at construction, destroyed together.
    batch: Vec<RawPhysicalMonitor>,
    backend: BrightnessBackendKind,
    step: u32,
    events: EventBus,
}

#[cfg(windows)]
impl BrightnessService<MonitorConfiguration, WmiBrightness> {
    pub fn open(config: &AppConfig, events: EventBus) -> Self {
        Self::with_api(MonitorConfiguration, WmiBrightness, config, events)
    }
}

impl<M: MonitorApi, D: DesktopBrightnessApi> BrightnessService<M, D> {
    /// Collect physical monitors and pick the backend.
    pub fn with_api(monitors: M, desktop: D, config: &AppConfig, events: EventBus) -> Self {
        let batch = collect_physical_monitors(&monitors);
        let probe_ok = batch
            .first()
            .is_some_and(|pm| monitors.get_brightness(pm.handle).is_ok());

        let backend = if probe_ok {
            BrightnessBackendKind::HardwareProtocol
        } else {
            BrightnessBackendKind::DesktopManagement
        };
        info!(
            "Brightness backend: {} ({} physical monitor(s))",
            backend.display_name(),
            batch.len()
        );

        Self {
            monitors,
            desktop,
            batch,
            backend,
            step: config.brightness_step,
            events,
        }
    }

    pub fn backend_kind(&self) -> BrightnessBackendKind {
        self.backend
    }

    /// Default step for [`increase`](Self::increase) and [`decrease`](Self::decrease).
    pub fn step(&self) -> u32 {
        self.step
    }

    /// Current brightness in percent, `None` when it cannot be read.
    pub fn get_brightness(&self) -> Option<u32> {
        match self.backend {
            BrightnessBackendKind::HardwareProtocol => {
                let first = self.batch.first()?;
                match self.monitors.get_brightness(first.handle) {
                    Ok(r) => raw_to_percent(r.minimum, r.current, r.maximum),
                    Err(e) => {
                        debug!("DDC/CI read failed: {}", e);
                        None
                    }
                }
            }
            BrightnessBackendKind::DesktopManagement => Some(self.fallback_brightness()),
        }
    }

    fn fallback_brightness(&self) -> u32 {
        match self.desktop.current_brightness() {
            Ok(Some(value)) => value.min(100),
            Ok(None) => FALLBACK_BRIGHTNESS,
            Err(e) => {
                debug!("Desktop brightness read failed: {}", e);
                FALLBACK_BRIGHTNESS
            }
        }
    }

    /// Set brightness in percent (clamped to 0-100).
    pub fn set_brightness(&self, percent: u32) -> bool {
        let percent = percent.min(100);
        let ok = match self.backend {
            BrightnessBackendKind::HardwareProtocol => self.set_hardware(percent),
            BrightnessBackendKind::DesktopManagement => match self.desktop.set_brightness(percent) {
                Ok(()) => true,
                Err(e) => {
                    warn!("Desktop brightness write failed: {}", e);
                    false
                }
            },
        };

        if ok {
            self.events.publish(ServiceEvent::BrightnessChanged(percent));
        }
        ok
    }

    /// Apply `percent` to every handle through its own range.
    fn set_hardware(&self, percent: u32) -> bool {
        let mut outcome = BatchOutcome::new("set brightness");
        for pm in &self.batch {
            let applied = self
                .monitors
                .get_brightness(pm.handle)
                .and_then(|r| {
                    let value = percent_to_raw(r.minimum, r.maximum, percent);
                    self.monitors.set_brightness(pm.handle, value)
                });
            if let Err(e) = &applied {
                debug!("DDC/CI write to {:?} failed: {}", pm.handle, e);
            }
            outcome.record(applied.is_ok());
        }

        match outcome.into_result() {
            Ok(()) => true,
            Err(e) => {
                warn!("{}", e);
                false
            }
        }
    }

    pub fn increase(&self, amount: u32) -> bool {
        match self.get_brightness() {
            Some(current) => self.set_brightness(current.saturating_add(amount)),
            None => false,
        }
    }

    pub fn decrease(&self, amount: u32) -> bool {
        match self.get_brightness() {
            Some(current) => self.set_brightness(current.saturating_sub(amount)),
            None => false,
        }
    }

    /// One entry per readable physical monitor, or the single internal
    /// panel in fallback mode.
    pub fn list_monitors(&self) -> Vec<PhysicalMonitor> {
        match self.backend {
            BrightnessBackendKind::HardwareProtocol => self
                .batch
                .iter()
                .filter_map(|pm| {
                    let reading = self.monitors.get_brightness(pm.handle).ok()?;
                    Some(PhysicalMonitor {
                        handle: Some(pm.handle.0),
                        description: pm.description.clone(),
                        minimum: reading.minimum,
                        maximum: reading.maximum,
                        current: reading.current,
                        supports_ddc: true,
                    })
                })
                .collect(),
            BrightnessBackendKind::DesktopManagement => vec![PhysicalMonitor {
                handle: None,
                description: INTERNAL_PANEL_DESCRIPTION.to_string(),
                minimum: 0,
                maximum: 100,
                current: self.fallback_brightness(),
                supports_ddc: false,
            }],
        }
    }

    /// Brightness levels the panel supports.
    pub fn brightness_levels(&self) -> Vec<u8> {
        match self.desktop.brightness_levels() {
            Ok(Some(levels)) if !levels.is_empty() => levels,
            Ok(_) => default_brightness_levels(),
            Err(e) => {
                debug!("Brightness level query failed: {}", e);
                default_brightness_levels()
            }
        }
    }

    pub fn is_available(&self) -> bool {
        self.get_brightness().is_some()
    }
}

impl<M: MonitorApi, D: DesktopBrightnessApi> Drop for BrightnessService<M, D> {
    fn drop(&mut self) {
        if self.batch.is_empty() {
            return;
        }
        let batch = std::mem::take(&mut self.batch);
        let count = batch.len();
        match self.monitors.destroy_physical_monitors(batch) {
            Ok(()) => debug!("Destroyed {} physical monitor(s)", count),
            Err(e) => warn!("Failed to destroy physical monitors: {}", e),
        }
    }
}

/// Physical monitors behind every display monitor. Handles from display
/// monitors enumerated before a failure are kept.
fn collect_physical_monitors<M: MonitorApi>(api: &M) -> Vec<RawPhysicalMonitor> {
    let displays = match api.display_monitors() {
        Ok(displays) => displays,
        Err(e) => {
            debug!("Display enumeration failed: {}", e);
            return Vec::new();
        }
    };

    let mut batch = Vec::new();
    for display_monitor in displays {
        match api.physical_monitors(display_monitor) {
            Ok(found) => batch.extend(found),
            Err(e) => debug!("No physical monitors for {:?}: {}", display_monitor, e),
        }
    }
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::monitor::{BrightnessReading, DisplayMonitorId, PhysicalHandle};
    use crate::native::{NativeError, NativeResult};
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;
    use std::rc::Rc;

    #[derive(Clone, Copy)]
    struct FakePanel {
        minimum: u32,
        maximum: u32,
        readable: bool,
    }

    /// DDC/CI fake: two physical monitors per display, with per-handle
    /// ranges and a log of destroy calls.
    #[derive(Default)]
    struct FakeMonitors {
        displays: Vec<usize>,
        failing_display: Option<usize>,
        panels: HashMap<usize, FakePanel>,
        values: RefCell<HashMap<usize, u32>>,
        destroyed: Rc<RefCell<Vec<Vec<usize>>>>,
    }

    impl FakeMonitors {
        fn with_panels(panels: &[FakePanel]) -> Self {
            let mut fake = Self::default();
            for (i, panel) in panels.iter().enumerate() {
                let handle = 100 + i;
                fake.panels.insert(handle, *panel);
                fake.values.borrow_mut().insert(handle, panel.minimum);
            }
            fake.displays = (0..panels.len().div_ceil(2)).collect();
            fake
        }
    }

    impl MonitorApi for FakeMonitors {
        fn display_monitors(&self) -> NativeResult<Vec<DisplayMonitorId>> {
            Ok(self.displays.iter().map(|&d| DisplayMonitorId(d)).collect())
        }

        fn physical_monitors(&self, monitor: DisplayMonitorId) -> NativeResult<Vec<RawPhysicalMonitor>> {
            if self.failing_display == Some(monitor.0) {
                return Err(NativeError::status("GetPhysicalMonitorsFromHMONITOR", 87));
            }
            Ok((0..2)
                .map(|i| 100 + monitor.0 * 2 + i)
                .filter(|h| self.panels.contains_key(h))
                .map(|h| RawPhysicalMonitor {
                    handle: PhysicalHandle(h),
                    description: format!("Generic PnP Monitor {}", h),
                })
                .collect())
        }

        fn get_brightness(&self, handle: PhysicalHandle) -> NativeResult<BrightnessReading> {
            let panel = self.panels[&handle.0];
            if !panel.readable {
                return Err(NativeError::status("GetMonitorBrightness", 0xC026_2582));
            }
            Ok(BrightnessReading {
                minimum: panel.minimum,
                current: self.values.borrow()[&handle.0],
                maximum: panel.maximum,
            })
        }

        fn set_brightness(&self, handle: PhysicalHandle, value: u32) -> NativeResult<()> {
            let panel = self.panels[&handle.0];
            assert!(value >= panel.minimum && value <= panel.maximum);
            self.values.borrow_mut().insert(handle.0, value);
            Ok(())
        }

        fn destroy_physical_monitors(&self, monitors: Vec<RawPhysicalMonitor>) -> NativeResult<()> {
            self.destroyed
                .borrow_mut()
                .push(monitors.iter().map(|m| m.handle.0).collect());
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeDesktop {
        value: Cell<Option<u32>>,
        levels: Option<Vec<u8>>,
        broken: bool,
    }

    impl DesktopBrightnessApi for FakeDesktop {
        fn current_brightness(&self) -> NativeResult<Option<u32>> {
            if self.broken {
                return Err(NativeError::empty("WmiMonitorBrightness"));
            }
            Ok(self.value.get())
        }

        fn set_brightness(&self, percent: u32) -> NativeResult<()> {
            if self.broken {
                return Err(NativeError::empty("WmiMonitorBrightnessMethods"));
            }
            self.value.set(Some(percent));
            Ok(())
        }

        fn brightness_levels(&self) -> NativeResult<Option<Vec<u8>>> {
            Ok(self.levels.clone())
        }
    }

    const PANEL: FakePanel = FakePanel { minimum: 0, maximum: 100, readable: true };
    const COARSE: FakePanel = FakePanel { minimum: 10, maximum: 60, readable: true };
    const DEAD: FakePanel = FakePanel { minimum: 0, maximum: 100, readable: false };

    fn service(monitors: FakeMonitors, desktop: FakeDesktop) -> BrightnessService<FakeMonitors, FakeDesktop> {
        BrightnessService::with_api(monitors, desktop, &AppConfig::default(), EventBus::default())
    }

    #[test]
    fn test_hardware_round_trip_every_handle() {
        let svc = service(FakeMonitors::with_panels(&[PANEL, COARSE, PANEL]), FakeDesktop::default());
        assert_eq!(svc.backend_kind(), BrightnessBackendKind::HardwareProtocol);

        for p in 0..=100 {
            assert!(svc.set_brightness(p));
            for monitor in svc.list_monitors() {
                assert!(monitor.percent().abs_diff(p) <= 1, "{} vs {}", monitor.percent(), p);
            }
            assert_eq!(svc.get_brightness(), Some(p));
        }
    }

    #[test]
    fn test_set_clamps() {
        let svc = service(FakeMonitors::with_panels(&[PANEL]), FakeDesktop::default());
        let mut rx = svc.events.subscribe();
        assert!(svc.set_brightness(250));
        assert_eq!(svc.get_brightness(), Some(100));
        assert_eq!(rx.try_recv().unwrap(), ServiceEvent::BrightnessChanged(100));
    }

    #[test]
    fn test_fallback_when_every_probe_fails() {
        let desktop = FakeDesktop { value: Cell::new(Some(70)), ..Default::default() };
        let svc = service(FakeMonitors::with_panels(&[DEAD, DEAD]), desktop);
        assert_eq!(svc.backend_kind(), BrightnessBackendKind::DesktopManagement);

        let monitors = svc.list_monitors();
        assert_eq!(monitors.len(), 1);
        assert_eq!(monitors[0].handle, None);
        assert!(!monitors[0].supports_ddc);
        assert_eq!(monitors[0].current, 70);

        assert!(svc.set_brightness(35));
        assert_eq!(svc.get_brightness(), Some(35));
        assert_eq!(svc.desktop.value.get(), Some(35));
    }

    #[test]
    fn test_fallback_without_monitors() {
        let svc = service(FakeMonitors::default(), FakeDesktop::default());
        assert_eq!(svc.backend_kind(), BrightnessBackendKind::DesktopManagement);
        assert_eq!(svc.get_brightness(), Some(FALLBACK_BRIGHTNESS));
        assert_eq!(svc.list_monitors().len(), 1);
    }

    #[test]
    fn test_fallback_write_failure_is_silent() {
        let desktop = FakeDesktop { broken: true, ..Default::default() };
        let svc = service(FakeMonitors::default(), desktop);
        let mut rx = svc.events.subscribe();
        assert!(!svc.set_brightness(40));
        assert!(rx.try_recv().is_err());
        assert_eq!(svc.get_brightness(), Some(FALLBACK_BRIGHTNESS));
    }

    #[test]
    fn test_partial_hardware_write_is_failure() {
        let svc = service(FakeMonitors::with_panels(&[PANEL, DEAD]), FakeDesktop::default());
        assert_eq!(svc.backend_kind(), BrightnessBackendKind::HardwareProtocol);
        let mut rx = svc.events.subscribe();
        assert!(!svc.set_brightness(80));
        assert!(rx.try_recv().is_err());
        // The readable panel kept its new value.
        assert_eq!(svc.get_brightness(), Some(80));
        assert_eq!(svc.list_monitors().len(), 1);
    }

    #[test]
    fn test_unreadable_first_monitor_selects_fallback() {
        let desktop = FakeDesktop { value: Cell::new(Some(60)), ..Default::default() };
        let monitors = FakeMonitors::with_panels(&[DEAD, PANEL]);
        let destroyed = Rc::clone(&monitors.destroyed);
        let svc = service(monitors, desktop);
        assert_eq!(svc.backend_kind(), BrightnessBackendKind::DesktopManagement);
        assert!(svc.is_available());
        assert_eq!(svc.get_brightness(), Some(60));
        assert!(svc.increase(10));
        assert_eq!(svc.get_brightness(), Some(70));
        drop(svc);
        assert_eq!(*destroyed.borrow(), vec![vec![100, 101]]);
    }

    #[test]
    fn test_increase_decrease() {
        let svc = service(FakeMonitors::with_panels(&[PANEL]), FakeDesktop::default());
        assert!(svc.set_brightness(95));
        assert!(svc.increase(svc.step()));
        assert_eq!(svc.get_brightness(), Some(100));
        assert!(svc.decrease(30));
        assert_eq!(svc.get_brightness(), Some(70));
        assert!(svc.decrease(200));
        assert_eq!(svc.get_brightness(), Some(0));
    }

    #[test]
    fn test_destroyed_once_as_batch() {
        let monitors = FakeMonitors::with_panels(&[PANEL, COARSE, PANEL]);
        let destroyed = Rc::clone(&monitors.destroyed);
        let svc = service(monitors, FakeDesktop::default());
        svc.set_brightness(20);
        assert!(destroyed.borrow().is_empty());
        drop(svc);
        assert_eq!(*destroyed.borrow(), vec![vec![100, 101, 102]]);
    }

    #[test]
    fn test_fallback_still_destroys_probed_handles() {
        let mut monitors = FakeMonitors::with_panels(&[DEAD, DEAD, DEAD]);
        monitors.failing_display = Some(1);
        let destroyed = Rc::clone(&monitors.destroyed);
        drop(service(monitors, FakeDesktop::default()));
        assert_eq!(*destroyed.borrow(), vec![vec![100, 101]]);
    }

    #[test]
    fn test_brightness_levels() {
        let svc = service(FakeMonitors::default(), FakeDesktop::default());
        assert_eq!(svc.brightness_levels(), vec![0, 10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);

        let desktop = FakeDesktop { levels: Some(vec![0, 25, 50, 75, 100]), ..Default::default() };
        let svc = service(FakeMonitors::default(), desktop);
        assert_eq!(svc.brightness_levels(), vec![0, 25, 50, 75, 100]);
    }

    #[test]
    fn test_availability() {
        let svc = service(FakeMonitors::with_panels(&[PANEL]), FakeDesktop::default());
        assert!(svc.is_available());
    }
}
