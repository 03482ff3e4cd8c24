// Sys Manager - WLAN Session (Windows)
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

use std::ffi::c_void;
use uuid::Uuid;
use windows::core::PCWSTR;
use windows::Win32::Foundation::{BOOL, HANDLE};
use windows::Win32::NetworkManagement::WiFi::{
    dot11_BSS_type_any, dot11_BSS_type_infrastructure, wlan_connection_mode_discovery_unsecure,
    wlan_connection_mode_profile, WlanCloseHandle, WlanConnect, WlanDeleteProfile, WlanDisconnect,
    WlanEnumInterfaces, WlanFreeMemory, WlanGetAvailableNetworkList, WlanGetProfileList,
    WlanOpenHandle, WlanSetProfile, WLAN_AVAILABLE_NETWORK, WLAN_AVAILABLE_NETWORK_LIST,
    WLAN_CONNECTION_PARAMETERS, WLAN_INTERFACE_INFO, WLAN_INTERFACE_INFO_LIST, WLAN_PROFILE_INFO,
    WLAN_PROFILE_INFO_LIST,
};

use super::{guid_from_uuid, pcwstr, to_wide, uuid_from_guid};
use crate::native::buffer::NativeList;
use crate::native::wlan::{
    ConnectionMode, RawAvailableNetwork, RawInterfaceInfo, WlanApi, DOT11_SSID_MAX_LENGTH,
    WLAN_API_VERSION,
};
use crate::native::{check_status, wide_to_string, NativeError, NativeResult};

unsafe fn free_wlan_memory(ptr: *mut c_void) {
    WlanFreeMemory(ptr);
}

/// An open WLAN client handle, closed on drop.
pub struct WlanSession {
    handle: HANDLE,
}

impl WlanSession {
    pub fn open() -> NativeResult<Self> {
        let mut negotiated = 0u32;
        let mut handle = HANDLE::default();
        // SAFETY: out-pointers are valid for the duration of the call.
        let status = unsafe { WlanOpenHandle(WLAN_API_VERSION, None, &mut negotiated, &mut handle) };
        check_status("WlanOpenHandle", status)?;
        tracing::debug!("WLAN session opened (version {:#x})", negotiated);
        Ok(Self { handle })
    }

    /// Take ownership of a list pointer returned by a `WlanGet*`/`WlanEnum*` call.
    fn take_list<L, T: Copy>(call: &'static str, list: *mut L) -> NativeResult<NativeList<T>> {
        // SAFETY: the WLAN list structures share the count/index header
        // layout and are released with WlanFreeMemory.
        unsafe { NativeList::from_raw(list.cast::<c_void>(), free_wlan_memory) }
            .ok_or(NativeError::empty(call))
    }
}

impl Drop for WlanSession {
    fn drop(&mut self) {
        // SAFETY: the handle came from WlanOpenHandle and is closed once.
        unsafe {
            let _ = WlanCloseHandle(self.handle, None);
        }
    }
}

impl WlanApi for WlanSession {
    fn enum_interfaces(&self) -> NativeResult<Vec<RawInterfaceInfo>> {
        let mut list: *mut WLAN_INTERFACE_INFO_LIST = std::ptr::null_mut();
        // SAFETY: valid session handle and out-pointer.
        let status = unsafe { WlanEnumInterfaces(self.handle, None, &mut list) };
        check_status("WlanEnumInterfaces", status)?;

        let list: NativeList<WLAN_INTERFACE_INFO> = Self::take_list("WlanEnumInterfaces", list)?;
        list.decode(|info| {
            Ok(Some(RawInterfaceInfo {
                guid: uuid_from_guid(&info.InterfaceGuid),
                description: wide_to_string(&info.strInterfaceDescription),
                state: info.isState.0 as u32,
            }))
        })
    }

    fn available_networks(&self, interface: &Uuid) -> NativeResult<Vec<RawAvailableNetwork>> {
        let guid = guid_from_uuid(interface);
        let mut list: *mut WLAN_AVAILABLE_NETWORK_LIST = std::ptr::null_mut();
        // SAFETY: guid and out-pointer outlive the call.
        let status = unsafe {
            WlanGetAvailableNetworkList(self.handle, &guid, 0, None, &mut list)
        };
        check_status("WlanGetAvailableNetworkList", status)?;

        let list: NativeList<WLAN_AVAILABLE_NETWORK> =
            Self::take_list("WlanGetAvailableNetworkList", list)?;
        list.decode(|network| {
            let length = network.dot11Ssid.uSSIDLength as usize;
            if length > DOT11_SSID_MAX_LENGTH {
                return Err(NativeError::Decode(format!("SSID length {} exceeds 32", length)));
            }
            Ok(Some(RawAvailableNetwork {
                ssid: network.dot11Ssid.ucSSID[..length].to_vec(),
                profile_name: wide_to_string(&network.strProfileName),
                signal_quality: network.wlanSignalQuality,
                security_enabled: network.bSecurityEnabled.as_bool(),
                auth_algorithm: network.dot11DefaultAuthAlgorithm.0 as u32,
                cipher_algorithm: network.dot11DefaultCipherAlgorithm.0 as u32,
                flags: network.dwFlags,
            }))
        })
    }

    fn profile_names(&self, interface: &Uuid) -> NativeResult<Vec<String>> {
        let guid = guid_from_uuid(interface);
        let mut list: *mut WLAN_PROFILE_INFO_LIST = std::ptr::null_mut();
        // SAFETY: guid and out-pointer outlive the call.
        let status = unsafe { WlanGetProfileList(self.handle, &guid, None, &mut list) };
        check_status("WlanGetProfileList", status)?;

        let list: NativeList<WLAN_PROFILE_INFO> = Self::take_list("WlanGetProfileList", list)?;
        list.decode(|profile| Ok(Some(wide_to_string(&profile.strProfileName))))
    }

    fn connect(&self, interface: &Uuid, mode: &ConnectionMode) -> NativeResult<()> {
        let guid = guid_from_uuid(interface);
        let profile = match mode {
            ConnectionMode::Profile(name) => Some(to_wide(name)),
            ConnectionMode::DiscoveryUnsecure => None,
        };
        let params = WLAN_CONNECTION_PARAMETERS {
            wlanConnectionMode: if profile.is_some() {
                wlan_connection_mode_profile
            } else {
                wlan_connection_mode_discovery_unsecure
            },
            strProfile: profile.as_deref().map(pcwstr).unwrap_or(PCWSTR::null()),
            pDot11Ssid: std::ptr::null_mut(),
            pDesiredBssidList: std::ptr::null_mut(),
            dot11BssType: if profile.is_some() {
                dot11_BSS_type_infrastructure
            } else {
                dot11_BSS_type_any
            },
            dwFlags: 0,
        };
        // SAFETY: params and the profile name it points to outlive the call.
        let status = unsafe { WlanConnect(self.handle, &guid, &params, None) };
        check_status("WlanConnect", status)
    }

    fn disconnect(&self, interface: &Uuid) -> NativeResult<()> {
        let guid = guid_from_uuid(interface);
        // SAFETY: guid outlives the call.
        let status = unsafe { WlanDisconnect(self.handle, &guid, None) };
        check_status("WlanDisconnect", status)
    }

    fn set_profile(&self, interface: &Uuid, profile_xml: &str, overwrite: bool) -> NativeResult<()> {
        let guid = guid_from_uuid(interface);
        let xml = zeroize::Zeroizing::new(to_wide(profile_xml));
        let mut reason = 0u32;
        // SAFETY: the XML buffer is NUL-terminated and outlives the call.
        let status = unsafe {
            WlanSetProfile(
                self.handle,
                &guid,
                0,
                pcwstr(&xml),
                PCWSTR::null(),
                BOOL::from(overwrite),
                None,
                &mut reason,
            )
        };
        if status != 0 {
            tracing::debug!("WlanSetProfile reason code {:#x}", reason);
        }
        check_status("WlanSetProfile", status)
    }

    fn delete_profile(&self, interface: &Uuid, name: &str) -> NativeResult<()> {
        let guid = guid_from_uuid(interface);
        let name = to_wide(name);
        // SAFETY: guid and name outlive the call.
        let status = unsafe { WlanDeleteProfile(self.handle, &guid, pcwstr(&name), None) };
        check_status("WlanDeleteProfile", status)
    }
}
