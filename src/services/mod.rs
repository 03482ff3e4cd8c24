// Sys Manager - Services Module
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! # Services
//!
//! Long-lived, resource-owning service objects, one per capability:
//!
//! - **Wireless**: WLAN session, scans, profiles, connections
//! - **Bluetooth**: radios, known devices, visibility toggles
//! - **Brightness**: DDC/CI with a desktop-management fallback
//! - **Audio**: default render endpoint volume and mute
//!
//! Services never call each other. Each is generic over the native port
//! traits it drives, so the Windows backends can be swapped for fakes.

pub mod audio;
pub mod bluetooth;
pub mod brightness;
pub mod profile_xml;
pub mod wireless;

pub use audio::AudioService;
pub use bluetooth::BluetoothService;
pub use brightness::BrightnessService;
pub use wireless::WirelessService;
