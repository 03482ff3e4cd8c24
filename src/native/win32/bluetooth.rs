// Sys Manager - Bluetooth Stack (Windows)
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

use std::mem::size_of;
use windows::Win32::Devices::Bluetooth::{
    BluetoothEnableDiscovery, BluetoothEnableIncomingConnections, BluetoothFindDeviceClose,
    BluetoothFindFirstDevice, BluetoothFindFirstRadio, BluetoothFindNextDevice,
    BluetoothFindNextRadio, BluetoothFindRadioClose, BluetoothGetRadioInfo, BluetoothIsConnectable,
    BluetoothIsDiscoverable, BLUETOOTH_DEVICE_INFO, BLUETOOTH_DEVICE_SEARCH_PARAMS,
    BLUETOOTH_FIND_RADIO_PARAMS, BLUETOOTH_RADIO_INFO, HBLUETOOTH_DEVICE_FIND,
    HBLUETOOTH_RADIO_FIND,
};
use windows::Win32::Foundation::{CloseHandle, BOOL, ERROR_NO_MORE_ITEMS, HANDLE, SYSTEMTIME};

use super::com_error;
use crate::native::bluetooth::{
    BluetoothApi, DeviceSearch, RawDeviceInfo, RawRadioInfo, RawSystemTime,
};
use crate::native::{check_status, wide_to_string, NativeResult};

/// One open radio handle, closed on drop.
pub struct RadioHandle(HANDLE);

impl Drop for RadioHandle {
    fn drop(&mut self) {
        // SAFETY: the handle came from a radio find call and is closed once.
        unsafe {
            let _ = CloseHandle(self.0);
        }
    }
}

struct RadioFind(HBLUETOOTH_RADIO_FIND);

impl Drop for RadioFind {
    fn drop(&mut self) {
        // SAFETY: find handle from BluetoothFindFirstRadio.
        unsafe {
            let _ = BluetoothFindRadioClose(self.0);
        }
    }
}

struct DeviceFind(HBLUETOOTH_DEVICE_FIND);

impl Drop for DeviceFind {
    fn drop(&mut self) {
        // SAFETY: find handle from BluetoothFindFirstDevice.
        unsafe {
            let _ = BluetoothFindDeviceClose(self.0);
        }
    }
}

fn is_no_more_items(error: &windows::core::Error) -> bool {
    error.code() == ERROR_NO_MORE_ITEMS.to_hresult()
}

fn system_time(st: &SYSTEMTIME) -> RawSystemTime {
    RawSystemTime {
        year: st.wYear,
        month: st.wMonth,
        day: st.wDay,
        hour: st.wHour,
        minute: st.wMinute,
        second: st.wSecond,
    }
}

fn empty_device_info() -> BLUETOOTH_DEVICE_INFO {
    BLUETOOTH_DEVICE_INFO {
        dwSize: size_of::<BLUETOOTH_DEVICE_INFO>() as u32,
        ..Default::default()
    }
}

/// The system Bluetooth stack. Stateless; radio handles are owned by the
/// [`RadioHandle`] values it returns.
#[derive(Debug, Default, Clone, Copy)]
pub struct BluetoothStack;

impl BluetoothApi for BluetoothStack {
    type Radio = RadioHandle;

    fn find_radios(&self) -> NativeResult<Vec<RadioHandle>> {
        let params = BLUETOOTH_FIND_RADIO_PARAMS {
            dwSize: size_of::<BLUETOOTH_FIND_RADIO_PARAMS>() as u32,
        };
        let mut radio = HANDLE::default();
        // SAFETY: params and the out-handle are valid for the call.
        let find = match unsafe { BluetoothFindFirstRadio(&params, &mut radio) } {
            Ok(find) => RadioFind(find),
            Err(e) if is_no_more_items(&e) => return Ok(Vec::new()),
            Err(e) => return Err(com_error("BluetoothFindFirstRadio", e)),
        };

        let mut radios = vec![RadioHandle(radio)];
        loop {
            let mut next = HANDLE::default();
            // SAFETY: find.0 is an open radio find handle.
            if unsafe { BluetoothFindNextRadio(find.0, &mut next) }.is_err() {
                break;
            }
            radios.push(RadioHandle(next));
        }
        Ok(radios)
    }

    fn radio_info(&self, radio: &RadioHandle) -> NativeResult<RawRadioInfo> {
        let mut info = BLUETOOTH_RADIO_INFO {
            dwSize: size_of::<BLUETOOTH_RADIO_INFO>() as u32,
            ..Default::default()
        };
        // SAFETY: info is sized and writable.
        let status = unsafe { BluetoothGetRadioInfo(radio.0, &mut info) };
        check_status("BluetoothGetRadioInfo", status)?;
        Ok(RawRadioInfo {
            // SAFETY: every bit pattern is a valid u64.
            address: unsafe { info.address.Anonymous.ullLong },
            name: wide_to_string(&info.szName),
            class_of_device: info.ulClassofDevice,
            manufacturer: info.manufacturer,
        })
    }

    fn is_connectable(&self, radio: &RadioHandle) -> bool {
        // SAFETY: open radio handle.
        unsafe { BluetoothIsConnectable(radio.0) }.as_bool()
    }

    fn is_discoverable(&self, radio: &RadioHandle) -> bool {
        // SAFETY: open radio handle.
        unsafe { BluetoothIsDiscoverable(radio.0) }.as_bool()
    }

    fn enable_discovery(&self, radio: &RadioHandle, enable: bool) -> bool {
        // SAFETY: open radio handle.
        unsafe { BluetoothEnableDiscovery(radio.0, BOOL::from(enable)) }.as_bool()
    }

    fn enable_incoming_connections(&self, radio: &RadioHandle, enable: bool) -> bool {
        // SAFETY: open radio handle.
        unsafe { BluetoothEnableIncomingConnections(radio.0, BOOL::from(enable)) }.as_bool()
    }

    fn find_devices(&self, radio: &RadioHandle, search: &DeviceSearch) -> NativeResult<Vec<RawDeviceInfo>> {
        let params = BLUETOOTH_DEVICE_SEARCH_PARAMS {
            dwSize: size_of::<BLUETOOTH_DEVICE_SEARCH_PARAMS>() as u32,
            fReturnAuthenticated: search.return_authenticated.into(),
            fReturnRemembered: search.return_remembered.into(),
            fReturnUnknown: search.return_unknown.into(),
            fReturnConnected: search.return_connected.into(),
            fIssueInquiry: search.issue_inquiry.into(),
            cTimeoutMultiplier: search.timeout_multiplier,
            hRadio: radio.0,
        };

        let mut info = empty_device_info();
        // SAFETY: params and info are sized and valid for the call.
        let find = match unsafe { BluetoothFindFirstDevice(&params, &mut info) } {
            Ok(find) => DeviceFind(find),
            Err(e) if is_no_more_items(&e) => return Ok(Vec::new()),
            Err(e) => return Err(com_error("BluetoothFindFirstDevice", e)),
        };

        let mut devices = Vec::new();
        loop {
            devices.push(RawDeviceInfo {
                // SAFETY: every bit pattern is a valid u64.
                address: unsafe { info.Address.Anonymous.ullLong },
                name: wide_to_string(&info.szName),
                class_of_device: info.ulClassofDevice,
                connected: info.fConnected.as_bool(),
                remembered: info.fRemembered.as_bool(),
                authenticated: info.fAuthenticated.as_bool(),
                last_seen: system_time(&info.stLastSeen),
                last_used: system_time(&info.stLastUsed),
            });

            info = empty_device_info();
            // SAFETY: find.0 is an open device find handle.
            if unsafe { BluetoothFindNextDevice(find.0, &mut info) }.is_err() {
                break;
            }
        }
        Ok(devices)
    }
}
