// Sys Manager - Bluetooth Bindings
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Bluetooth subsystem port and raw records.

use super::NativeResult;

/// Maximum length of a Bluetooth name field in UTF-16 units.
pub const BLUETOOTH_MAX_NAME_SIZE: usize = 248;

/// `SYSTEMTIME` fields used for last-seen/last-used stamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawSystemTime {
    pub year: u16,
    pub month: u16,
    pub day: u16,
    pub hour: u16,
    pub minute: u16,
    pub second: u16,
}

/// `BLUETOOTH_RADIO_INFO` fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRadioInfo {
    pub address: u64,
    pub name: String,
    pub class_of_device: u32,
    pub manufacturer: u16,
}

/// `BLUETOOTH_DEVICE_INFO` fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDeviceInfo {
    pub address: u64,
    pub name: String,
    pub class_of_device: u32,
    pub connected: bool,
    pub remembered: bool,
    pub authenticated: bool,
    pub last_seen: RawSystemTime,
    pub last_used: RawSystemTime,
}

/// `BLUETOOTH_DEVICE_SEARCH_PARAMS` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceSearch {
    pub return_authenticated: bool,
    pub return_remembered: bool,
    pub return_unknown: bool,
    pub return_connected: bool,
    pub issue_inquiry: bool,
    /// Inquiry timeout in 1.28 s units, only used with `issue_inquiry`.
    pub timeout_multiplier: u8,
}

impl DeviceSearch {
    /// Everything the radio already knows about, without a new inquiry.
    pub fn known_devices() -> Self {
        Self {
            return_authenticated: true,
            return_remembered: true,
            return_unknown: true,
            return_connected: true,
            issue_inquiry: false,
            timeout_multiplier: 0,
        }
    }
}

/// Port to the Bluetooth radio stack.
///
/// `Radio` owns one radio handle and closes it on drop, so dropping a
/// generation of radios releases every handle in it. Find handles used
/// during enumeration must be closed before the calls return.
pub trait BluetoothApi {
    type Radio;

    fn find_radios(&self) -> NativeResult<Vec<Self::Radio>>;

    fn radio_info(&self, radio: &Self::Radio) -> NativeResult<RawRadioInfo>;

    fn is_connectable(&self, radio: &Self::Radio) -> bool;

    fn is_discoverable(&self, radio: &Self::Radio) -> bool;

    fn enable_discovery(&self, radio: &Self::Radio, enable: bool) -> bool;

    fn enable_incoming_connections(&self, radio: &Self::Radio, enable: bool) -> bool;

    fn find_devices(&self, radio: &Self::Radio, search: &DeviceSearch) -> NativeResult<Vec<RawDeviceInfo>>;
}
