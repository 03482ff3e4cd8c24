// Sys Manager - Wireless Models
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Wireless interface, network, and profile types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::native::wlan::{auth_algorithm, cipher_algorithm, interface_state};

/// Connection state of a WLAN interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterfaceState {
    NotReady,
    Connected,
    AdHocNetworkFormed,
    Disconnecting,
    Disconnected,
    Associating,
    Discovering,
    Authenticating,
    Unknown,
}

impl InterfaceState {
    /// Translate a `WLAN_INTERFACE_STATE` value.
    pub fn from_native(state: u32) -> Self {
        match state {
            interface_state::NOT_READY => Self::NotReady,
            interface_state::CONNECTED => Self::Connected,
            interface_state::AD_HOC_NETWORK_FORMED => Self::AdHocNetworkFormed,
            interface_state::DISCONNECTING => Self::Disconnecting,
            interface_state::DISCONNECTED => Self::Disconnected,
            interface_state::ASSOCIATING => Self::Associating,
            interface_state::DISCOVERING => Self::Discovering,
            interface_state::AUTHENTICATING => Self::Authenticating,
            _ => Self::Unknown,
        }
    }

    /// Get human-readable name for this state.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::NotReady => "Not ready",
            Self::Connected => "Connected",
            Self::AdHocNetworkFormed => "Ad hoc network formed",
            Self::Disconnecting => "Disconnecting",
            Self::Disconnected => "Disconnected",
            Self::Associating => "Associating",
            Self::Discovering => "Discovering",
            Self::Authenticating => "Authenticating",
            Self::Unknown => "Unknown state",
        }
    }
}

/// One OS-visible WLAN adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirelessInterface {
    /// Interface GUID.
    pub id: Uuid,
    /// Adapter description reported by the driver.
    pub description: String,
    /// Connection state at enumeration time.
    pub state: InterfaceState,
}

/// 802.11 authentication algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthAlgorithm {
    Open,
    SharedKey,
    Wpa,
    WpaPsk,
    WpaNone,
    Rsna,
    RsnaPsk,
    Wpa3,
    Wpa3Sae,
    Owe,
    Wpa3Enterprise,
    Other(u32),
}

impl AuthAlgorithm {
    /// Translate a `DOT11_AUTH_ALGORITHM` value.
    pub fn from_native(value: u32) -> Self {
        match value {
            auth_algorithm::OPEN => Self::Open,
            auth_algorithm::SHARED_KEY => Self::SharedKey,
            auth_algorithm::WPA => Self::Wpa,
            auth_algorithm::WPA_PSK => Self::WpaPsk,
            auth_algorithm::WPA_NONE => Self::WpaNone,
            auth_algorithm::RSNA => Self::Rsna,
            auth_algorithm::RSNA_PSK => Self::RsnaPsk,
            auth_algorithm::WPA3 => Self::Wpa3,
            auth_algorithm::WPA3_SAE => Self::Wpa3Sae,
            auth_algorithm::OWE => Self::Owe,
            auth_algorithm::WPA3_ENT => Self::Wpa3Enterprise,
            other => Self::Other(other),
        }
    }

    /// Short security label shown next to a network.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::SharedKey => "WEP",
            Self::Wpa => "WPA",
            Self::WpaPsk => "WPA-PSK",
            Self::Rsna => "WPA2",
            Self::RsnaPsk => "WPA2-PSK",
            Self::Wpa3 => "WPA3",
            Self::Wpa3Sae => "WPA3-SAE",
            _ => "Unknown",
        }
    }

    /// `<authentication>` keyword of a WLAN profile document.
    ///
    /// Anything without a personal-profile keyword falls back to WPA2PSK.
    pub fn profile_keyword(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::WpaPsk => "WPAPSK",
            Self::RsnaPsk => "WPA2PSK",
            Self::Wpa3Sae => "WPA3SAE",
            _ => "WPA2PSK",
        }
    }
}

impl FromStr for AuthAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "open" => Ok(Self::Open),
            "wep" | "shared" => Ok(Self::SharedKey),
            "wpapsk" | "wpa" => Ok(Self::WpaPsk),
            "wpa2psk" | "wpa2" => Ok(Self::RsnaPsk),
            "wpa3sae" | "wpa3" => Ok(Self::Wpa3Sae),
            _ => Err(format!("Unknown authentication: {}", s)),
        }
    }
}

/// 802.11 cipher algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CipherAlgorithm {
    None,
    Wep40,
    Tkip,
    Ccmp,
    Wep104,
    Gcmp,
    Wep,
    Other(u32),
}

impl CipherAlgorithm {
    /// Translate a `DOT11_CIPHER_ALGORITHM` value.
    pub fn from_native(value: u32) -> Self {
        match value {
            cipher_algorithm::NONE => Self::None,
            cipher_algorithm::WEP40 => Self::Wep40,
            cipher_algorithm::TKIP => Self::Tkip,
            cipher_algorithm::CCMP => Self::Ccmp,
            cipher_algorithm::WEP104 => Self::Wep104,
            cipher_algorithm::GCMP => Self::Gcmp,
            cipher_algorithm::WEP => Self::Wep,
            other => Self::Other(other),
        }
    }

    /// `<encryption>` keyword of a WLAN profile document.
    ///
    /// Unrecognized ciphers fall back to AES.
    pub fn profile_keyword(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Wep | Self::Wep40 | Self::Wep104 => "WEP",
            Self::Tkip => "TKIP",
            _ => "AES",
        }
    }
}

impl FromStr for CipherAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "wep" => Ok(Self::Wep),
            "tkip" => Ok(Self::Tkip),
            "aes" | "ccmp" => Ok(Self::Ccmp),
            "gcmp" => Ok(Self::Gcmp),
            _ => Err(format!("Unknown cipher: {}", s)),
        }
    }
}

/// One SSID visible in the latest scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WirelessNetwork {
    pub ssid: String,
    /// Best-known saved profile for this network.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_name: Option<String>,
    /// Signal quality, 0-100.
    pub signal_quality: u32,
    pub secured: bool,
    pub auth: AuthAlgorithm,
    pub cipher: CipherAlgorithm,
    pub connected: bool,
}

impl WirelessNetwork {
    /// Whether a saved profile exists for this network.
    pub fn has_profile(&self) -> bool {
        self.profile_name.is_some()
    }

    pub fn security_label(&self) -> &'static str {
        self.auth.display_name()
    }

    /// Signal strength as 0-4 bars.
    pub fn signal_bars(&self) -> u8 {
        match self.signal_quality {
            80.. => 4,
            60..=79 => 3,
            40..=59 => 2,
            20..=39 => 1,
            _ => 0,
        }
    }
}

impl fmt::Display for WirelessNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bars: String = (0..4)
            .map(|i| if i < self.signal_bars() { '█' } else { '░' })
            .collect();
        write!(
            f,
            "{} {:>3}% {:<8} {}{}",
            bars,
            self.signal_quality,
            self.security_label(),
            self.ssid,
            if self.connected { " (connected)" } else { "" }
        )
    }
}

/// A connection profile persisted in the OS store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedProfile {
    pub name: String,
}
