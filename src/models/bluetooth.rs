// Sys Manager - Bluetooth Models
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Bluetooth radio and device types.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::native::bluetooth::RawSystemTime;

/// 48-bit Bluetooth device address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct BluetoothAddress(u64);

impl BluetoothAddress {
    /// Build from the integer form; bits above 48 are discarded.
    pub fn new(raw: u64) -> Self {
        Self(raw & 0xFFFF_FFFF_FFFF)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    /// Octets, most significant first.
    pub fn octets(&self) -> [u8; 6] {
        let bytes = self.0.to_be_bytes();
        [bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7]]
    }
}

impl fmt::Display for BluetoothAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = self.octets();
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            o[0], o[1], o[2], o[3], o[4], o[5]
        )
    }
}

impl FromStr for BluetoothAddress {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split([':', '-']).collect();
        if parts.len() != 6 {
            return Err(format!("Invalid Bluetooth address: {}", s));
        }
        let mut raw = 0u64;
        for part in parts {
            let octet = u8::from_str_radix(part, 16)
                .map_err(|_| format!("Invalid Bluetooth address: {}", s))?;
            raw = (raw << 8) | u64::from(octet);
        }
        Ok(Self(raw))
    }
}

impl Serialize for BluetoothAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BluetoothAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Major device class from the class-of-device code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceCategory {
    Computer,
    Phone,
    NetworkAccessPoint,
    AudioVideo,
    Peripheral,
    Imaging,
    Wearable,
    Toy,
    Health,
    Other,
}

impl DeviceCategory {
    /// Decode the 5-bit major class field (bits 8-12).
    pub fn from_class_of_device(class_of_device: u32) -> Self {
        match (class_of_device >> 8) & 0x1F {
            0x01 => Self::Computer,
            0x02 => Self::Phone,
            0x03 => Self::NetworkAccessPoint,
            0x04 => Self::AudioVideo,
            0x05 => Self::Peripheral,
            0x06 => Self::Imaging,
            0x07 => Self::Wearable,
            0x08 => Self::Toy,
            0x09 => Self::Health,
            _ => Self::Other,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Computer => "Computer",
            Self::Phone => "Phone",
            Self::NetworkAccessPoint => "Network access point",
            Self::AudioVideo => "Audio/Video",
            Self::Peripheral => "Peripheral",
            Self::Imaging => "Imaging",
            Self::Wearable => "Wearable",
            Self::Toy => "Toy",
            Self::Health => "Health",
            Self::Other => "Other",
        }
    }
}

/// Position of a radio within the current enumeration generation.
///
/// Only meaningful until the radios are enumerated again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RadioId(pub usize);

/// One Bluetooth adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BluetoothRadio {
    pub id: RadioId,
    pub name: String,
    pub address: BluetoothAddress,
    /// Bluetooth SIG company identifier of the radio's manufacturer.
    pub manufacturer: u16,
    pub class_of_device: u32,
    pub connectable: bool,
    pub discoverable: bool,
}

/// One Bluetooth peer known to a radio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BluetoothDevice {
    pub address: BluetoothAddress,
    pub name: String,
    pub connected: bool,
    /// Remembered by the OS.
    pub paired: bool,
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used: Option<NaiveDateTime>,
    pub class_of_device: u32,
}

impl BluetoothDevice {
    pub fn category(&self) -> DeviceCategory {
        DeviceCategory::from_class_of_device(self.class_of_device)
    }

    pub fn status_label(&self) -> &'static str {
        if self.connected {
            "Connected"
        } else if self.paired {
            "Paired"
        } else {
            "Available"
        }
    }
}

/// Convert an OS time stamp; year 0 or impossible fields mean "never".
pub fn system_time_to_datetime(st: &RawSystemTime) -> Option<NaiveDateTime> {
    if st.year == 0 {
        return None;
    }
    NaiveDate::from_ymd_opt(i32::from(st.year), u32::from(st.month), u32::from(st.day))?
        .and_hms_opt(u32::from(st.hour), u32::from(st.minute), u32::from(st.second))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_formatting() {
        let address = BluetoothAddress::new(0x0011_2233_4455);
        assert_eq!(address.to_string(), "00:11:22:33:44:55");
        assert_eq!(BluetoothAddress::new(0xAABB_CCDD_EEFF).to_string(), "AA:BB:CC:DD:EE:FF");
        assert_eq!("00:11:22:33:44:55".parse::<BluetoothAddress>(), Ok(address));
        assert!("00:11:22".parse::<BluetoothAddress>().is_err());
    }

    #[test]
    fn test_device_class_decoding() {
        assert_eq!(DeviceCategory::from_class_of_device(0x04 << 8), DeviceCategory::AudioVideo);
        assert_eq!(DeviceCategory::from_class_of_device(0x01 << 8), DeviceCategory::Computer);
        // Headset: service bits + audio/video major class + minor class
        assert_eq!(DeviceCategory::from_class_of_device(0x24_0404), DeviceCategory::AudioVideo);
        assert_eq!(DeviceCategory::from_class_of_device(0x5A_020C), DeviceCategory::Phone);
        assert_eq!(DeviceCategory::from_class_of_device(0x1F << 8), DeviceCategory::Other);
        assert_eq!(DeviceCategory::from_class_of_device(0), DeviceCategory::Other);
    }

    #[test]
    fn test_system_time_conversion() {
        let never = RawSystemTime::default();
        assert_eq!(system_time_to_datetime(&never), None);

        let st = RawSystemTime { year: 2026, month: 3, day: 14, hour: 9, minute: 26, second: 53 };
        let dt = system_time_to_datetime(&st).expect("valid time");
        assert_eq!(dt.to_string(), "2026-03-14 09:26:53");

        let bogus = RawSystemTime { year: 2026, month: 13, day: 1, ..Default::default() };
        assert_eq!(system_time_to_datetime(&bogus), None);
    }

    #[test]
    fn test_address_serializes_as_string() {
        let json = serde_json::to_string(&BluetoothAddress::new(0x0011_2233_4455)).unwrap();
        assert_eq!(json, "\"00:11:22:33:44:55\"");
    }
}
