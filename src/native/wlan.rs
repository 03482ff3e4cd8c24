// Sys Manager - WLAN Bindings
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! WLAN subsystem port and raw records.

use uuid::Uuid;

use super::NativeResult;

/// Client version requested when opening a session (Vista and later).
pub const WLAN_API_VERSION: u32 = 2;

/// `dwFlags` bit: the machine is currently connected to this network.
pub const WLAN_AVAILABLE_NETWORK_CONNECTED: u32 = 0x0000_0001;

/// Maximum SSID length in bytes (`DOT11_SSID_MAX_LENGTH`).
pub const DOT11_SSID_MAX_LENGTH: usize = 32;

/// `WLAN_INTERFACE_STATE` values.
pub mod interface_state {
    pub const NOT_READY: u32 = 0;
    pub const CONNECTED: u32 = 1;
    pub const AD_HOC_NETWORK_FORMED: u32 = 2;
    pub const DISCONNECTING: u32 = 3;
    pub const DISCONNECTED: u32 = 4;
    pub const ASSOCIATING: u32 = 5;
    pub const DISCOVERING: u32 = 6;
    pub const AUTHENTICATING: u32 = 7;
}

/// `DOT11_AUTH_ALGORITHM` values.
pub mod auth_algorithm {
    pub const OPEN: u32 = 1;
    pub const SHARED_KEY: u32 = 2;
    pub const WPA: u32 = 3;
    pub const WPA_PSK: u32 = 4;
    pub const WPA_NONE: u32 = 5;
    pub const RSNA: u32 = 6;
    pub const RSNA_PSK: u32 = 7;
    pub const WPA3: u32 = 8;
    pub const WPA3_SAE: u32 = 9;
    pub const OWE: u32 = 10;
    pub const WPA3_ENT: u32 = 11;
}

/// `DOT11_CIPHER_ALGORITHM` values.
pub mod cipher_algorithm {
    pub const NONE: u32 = 0x00;
    pub const WEP40: u32 = 0x01;
    pub const TKIP: u32 = 0x02;
    pub const CCMP: u32 = 0x04;
    pub const WEP104: u32 = 0x05;
    pub const GCMP: u32 = 0x08;
    pub const WEP: u32 = 0x101;
}

/// One entry of `WLAN_INTERFACE_INFO_LIST`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawInterfaceInfo {
    pub guid: Uuid,
    pub description: String,
    pub state: u32,
}

/// One entry of `WLAN_AVAILABLE_NETWORK_LIST`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAvailableNetwork {
    /// SSID bytes, already truncated to the reported length.
    pub ssid: Vec<u8>,
    pub profile_name: String,
    pub signal_quality: u32,
    pub security_enabled: bool,
    pub auth_algorithm: u32,
    pub cipher_algorithm: u32,
    pub flags: u32,
}

/// How a connection request selects its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionMode {
    /// Connect with a saved profile (`wlan_connection_mode_profile`).
    Profile(String),
    /// Connect to any unsecured network (`wlan_connection_mode_discovery_unsecure`).
    DiscoveryUnsecure,
}

/// Port to an open WLAN client session.
///
/// Implementations own the session handle and close it when dropped. List
/// calls must release the OS buffer before returning, whatever the outcome.
pub trait WlanApi {
    fn enum_interfaces(&self) -> NativeResult<Vec<RawInterfaceInfo>>;

    fn available_networks(&self, interface: &Uuid) -> NativeResult<Vec<RawAvailableNetwork>>;

    fn profile_names(&self, interface: &Uuid) -> NativeResult<Vec<String>>;

    fn connect(&self, interface: &Uuid, mode: &ConnectionMode) -> NativeResult<()>;

    fn disconnect(&self, interface: &Uuid) -> NativeResult<()>;

    /// Install a profile document as an all-user profile.
    fn set_profile(&self, interface: &Uuid, profile_xml: &str, overwrite: bool) -> NativeResult<()>;

    fn delete_profile(&self, interface: &Uuid, name: &str) -> NativeResult<()>;
}
