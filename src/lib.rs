// Sys Manager - Library Root
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! # Sys Manager
//!
//! Native capability services for Windows desktop tools: Wi-Fi scanning and
//! connection, Bluetooth radios and devices, display brightness and default
//! endpoint volume.
//!
//! Each service owns the OS resources it opens and releases them on drop.
//! Native failures degrade to `false`, empty lists, or safe defaults; only
//! opening the WLAN session can fail outright. Confirmed state changes are
//! pushed through an [`EventBus`](models::EventBus).
//!
//! The services are generic over the ports in [`native`], so everything
//! except the `native::win32` backends builds and is tested on any host.

pub mod models;
pub mod native;
pub mod services;
pub mod shell;
pub mod storage;

/// Human-readable application name.
pub const APP_NAME: &str = "Sys Manager";

/// Application version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Directory name under the user's configuration directory.
pub const CONFIG_DIR_NAME: &str = "sys-manager";
