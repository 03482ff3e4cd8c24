// Sys Manager - Native Binding Layer
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Native binding layer.
//!
//! Each OS subsystem is reached through a port trait declared here:
//! - [`wlan::WlanApi`]: WLAN session (interfaces, scan results, profiles)
//! - [`bluetooth::BluetoothApi`]: radio and device enumeration
//! - [`monitor::MonitorApi`] and [`monitor::DesktopBrightnessApi`]: DDC/CI and
//!   desktop-management brightness
//! - [`audio::AudioApi`]: default render endpoint volume control
//! - [`shell::Launcher`]: shell URI and helper executable launching
//!
//! The ports exchange platform-neutral raw records that still carry the OS
//! encodings (status codes, flag words, algorithm identifiers). Translating
//! those into the domain model is the job of the services.
//!
//! The [`win32`] module implements every port against the real Windows entry
//! points and is only compiled on Windows.

use thiserror::Error;

pub mod audio;
pub mod bluetooth;
pub mod buffer;
pub mod monitor;
pub mod shell;
pub mod wlan;

#[cfg(windows)]
pub mod win32;

/// Success status shared by the Win32 APIs that return `DWORD` codes.
pub const ERROR_SUCCESS: u32 = 0;

/// Result type alias for native calls.
pub type NativeResult<T> = std::result::Result<T, NativeError>;

/// A failed native call, before it is converted at the service boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NativeError {
    #[error("{call} failed with status {code:#x}")]
    Status { call: &'static str, code: u32 },

    #[error("{call} returned no result")]
    Empty { call: &'static str },

    #[error("native buffer decode failed: {0}")]
    Decode(String),
}

impl NativeError {
    /// Create an error for a call that returned a non-success status.
    pub fn status(call: &'static str, code: u32) -> Self {
        Self::Status { call, code }
    }

    /// Create an error for a call that succeeded but produced nothing.
    pub fn empty(call: &'static str) -> Self {
        Self::Empty { call }
    }

    /// Name of the native entry point that failed.
    pub fn call(&self) -> &'static str {
        match self {
            Self::Status { call, .. } | Self::Empty { call } => call,
            Self::Decode(_) => "decode",
        }
    }
}

/// Map a `DWORD` status to a [`NativeResult`].
pub fn check_status(call: &'static str, code: u32) -> NativeResult<()> {
    if code == ERROR_SUCCESS {
        Ok(())
    } else {
        Err(NativeError::status(call, code))
    }
}

/// Decode a NUL-terminated UTF-16 field of a fixed-size native struct.
pub fn wide_to_string(chars: &[u16]) -> String {
    let len = chars.iter().position(|&c| c == 0).unwrap_or(chars.len());
    String::from_utf16_lossy(&chars[..len])
}
