// Sys Manager - Domain Models
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! # Domain Models
//!
//! Normalized types produced by the services:
//!
//! - **Wireless**: interfaces, scanned networks, saved profiles
//! - **Bluetooth**: radios, devices, addresses, device classes
//! - **Display**: physical monitors and brightness backends
//! - **Audio**: endpoint volume snapshots, steps, and ranges
//! - **Events**: confirmed state changes pushed to subscribers
//! - **Outcome**: per-target results of batch operations
//! - **Error**: shared error types
//!
//! Every snapshot is created fresh by an enumeration call and superseded by
//! the next one; only natural keys (SSID, address, handle) identify them.

pub mod audio;
pub mod bluetooth;
pub mod config;
pub mod display;
pub mod error;
pub mod events;
pub mod outcome;
pub mod wireless;

// Re-export main types for convenience
pub use audio::{AudioVolumeState, VolumeRange, VolumeSteps};
pub use bluetooth::{BluetoothAddress, BluetoothDevice, BluetoothRadio, DeviceCategory, RadioId};
pub use config::AppConfig;
pub use display::{BrightnessBackendKind, PhysicalMonitor};
pub use error::{Error, Result};
pub use events::{EventBus, ServiceEvent};
pub use outcome::{BatchOutcome, BatchStatus};
pub use wireless::{
    AuthAlgorithm, CipherAlgorithm, InterfaceState, SavedProfile, WirelessInterface,
    WirelessNetwork,
};
