// Sys Manager - Monitor Configuration (Windows)
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

use std::ffi::c_void;
use windows::Win32::Devices::Display::{
    DestroyPhysicalMonitors, GetMonitorBrightness, GetNumberOfPhysicalMonitorsFromHMONITOR,
    GetPhysicalMonitorsFromHMONITOR, SetMonitorBrightness, PHYSICAL_MONITOR,
};
use windows::Win32::Foundation::{BOOL, HANDLE, LPARAM, RECT};
use windows::Win32::Graphics::Gdi::{EnumDisplayMonitors, HDC, HMONITOR};

use super::com_error;
use crate::native::monitor::{
    BrightnessReading, DisplayMonitorId, MonitorApi, PhysicalHandle, RawPhysicalMonitor,
};
use crate::native::{wide_to_string, NativeError, NativeResult};

unsafe extern "system" fn collect_monitor(
    monitor: HMONITOR,
    _hdc: HDC,
    _rect: *mut RECT,
    data: LPARAM,
) -> BOOL {
    let monitors = &mut *(data.0 as *mut Vec<DisplayMonitorId>);
    monitors.push(DisplayMonitorId(monitor.0 as usize));
    BOOL(1)
}

fn physical_monitor(handle: PhysicalHandle) -> PHYSICAL_MONITOR {
    PHYSICAL_MONITOR {
        hPhysicalMonitor: HANDLE(handle.0 as *mut c_void),
        szPhysicalMonitorDescription: [0; 128],
    }
}

/// The DDC/CI monitor configuration API (dxva2).
#[derive(Debug, Default, Clone, Copy)]
pub struct MonitorConfiguration;

impl MonitorApi for MonitorConfiguration {
    fn display_monitors(&self) -> NativeResult<Vec<DisplayMonitorId>> {
        let mut monitors: Vec<DisplayMonitorId> = Vec::new();
        // SAFETY: the callback only runs during the call, while `monitors`
        // is borrowed through the LPARAM.
        let ok = unsafe {
            EnumDisplayMonitors(
                HDC::default(),
                None,
                Some(collect_monitor),
                LPARAM(&mut monitors as *mut Vec<DisplayMonitorId> as isize),
            )
        };
        if !ok.as_bool() {
            return Err(NativeError::empty("EnumDisplayMonitors"));
        }
        Ok(monitors)
    }

    fn physical_monitors(&self, monitor: DisplayMonitorId) -> NativeResult<Vec<RawPhysicalMonitor>> {
        let hmonitor = HMONITOR(monitor.0 as *mut c_void);
        let mut count = 0u32;
        // SAFETY: valid monitor handle and out-pointer.
        unsafe { GetNumberOfPhysicalMonitorsFromHMONITOR(hmonitor, &mut count) }
            .map_err(|e| com_error("GetNumberOfPhysicalMonitorsFromHMONITOR", e))?;
        if count == 0 {
            return Ok(Vec::new());
        }

        let mut array = vec![PHYSICAL_MONITOR::default(); count as usize];
        // SAFETY: the array holds exactly `count` entries.
        unsafe { GetPhysicalMonitorsFromHMONITOR(hmonitor, &mut array) }
            .map_err(|e| com_error("GetPhysicalMonitorsFromHMONITOR", e))?;

        Ok(array
            .iter()
            .map(|pm| RawPhysicalMonitor {
                handle: PhysicalHandle(pm.hPhysicalMonitor.0 as usize),
                description: wide_to_string(&pm.szPhysicalMonitorDescription),
            })
            .collect())
    }

    fn get_brightness(&self, handle: PhysicalHandle) -> NativeResult<BrightnessReading> {
        let (mut minimum, mut current, mut maximum) = (0u32, 0u32, 0u32);
        // SAFETY: handle came from GetPhysicalMonitorsFromHMONITOR and is
        // still owned by the batch.
        let ok = unsafe {
            GetMonitorBrightness(
                HANDLE(handle.0 as *mut c_void),
                &mut minimum,
                &mut current,
                &mut maximum,
            )
        };
        if ok == 0 {
            return Err(NativeError::empty("GetMonitorBrightness"));
        }
        Ok(BrightnessReading {
            minimum,
            current,
            maximum,
        })
    }

    fn set_brightness(&self, handle: PhysicalHandle, value: u32) -> NativeResult<()> {
        // SAFETY: see get_brightness.
        let ok = unsafe { SetMonitorBrightness(HANDLE(handle.0 as *mut c_void), value) };
        if ok == 0 {
            return Err(NativeError::empty("SetMonitorBrightness"));
        }
        Ok(())
    }

    fn destroy_physical_monitors(&self, monitors: Vec<RawPhysicalMonitor>) -> NativeResult<()> {
        let array: Vec<PHYSICAL_MONITOR> = monitors.iter().map(|m| physical_monitor(m.handle)).collect();
        // SAFETY: every handle in the array is owned by the caller and is
        // destroyed only here.
        unsafe { DestroyPhysicalMonitors(&array) }
            .map_err(|e| com_error("DestroyPhysicalMonitors", e))
    }
}
