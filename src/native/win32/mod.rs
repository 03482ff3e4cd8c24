// Sys Manager - Windows Backends
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Implementations of the native ports against the Windows API.
//!
//! Every OS resource is held by a wrapper that releases it in `Drop`:
//! sessions and radio handles close, list buffers are freed, physical
//! monitors are destroyed as a batch, and COM interfaces are released by
//! the `windows` crate's own reference counting.

use uuid::Uuid;
use windows::core::{GUID, HRESULT, PCWSTR};
use windows::Win32::System::Com::{CoInitializeEx, CoUninitialize, COINIT_MULTITHREADED};

use super::{NativeError, NativeResult};

mod audio;
mod bluetooth;
mod monitor;
mod shell;
mod wlan;
mod wmi;

pub use audio::{CoreAudio, CoreAudioEndpoint};
pub use bluetooth::{BluetoothStack, RadioHandle};
pub use monitor::MonitorConfiguration;
pub use shell::ShellLauncher;
pub use wlan::WlanSession;
pub use wmi::WmiBrightness;

/// COM initialization for the current thread, undone on drop.
///
/// A thread that was already initialized in another apartment model keeps
/// it; the guard then has nothing to undo.
pub struct ComApartment {
    initialized: bool,
}

impl ComApartment {
    pub fn enter() -> Self {
        // SAFETY: paired with CoUninitialize in Drop when it succeeded.
        let hr = unsafe { CoInitializeEx(None, COINIT_MULTITHREADED) };
        if hr.is_err() {
            tracing::debug!("CoInitializeEx returned {:?}; keeping existing apartment", hr);
        }
        Self {
            initialized: hr.is_ok(),
        }
    }
}

impl Drop for ComApartment {
    fn drop(&mut self) {
        if self.initialized {
            // SAFETY: CoInitializeEx succeeded on this thread.
            unsafe { CoUninitialize() };
        }
    }
}

/// NUL-terminated UTF-16 copy of `text`.
pub(crate) fn to_wide(text: &str) -> Vec<u16> {
    text.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Borrow a NUL-terminated buffer as a `PCWSTR`.
pub(crate) fn pcwstr(wide: &[u16]) -> PCWSTR {
    PCWSTR(wide.as_ptr())
}

pub(crate) fn guid_from_uuid(id: &Uuid) -> GUID {
    GUID::from_u128(id.as_u128())
}

pub(crate) fn uuid_from_guid(guid: &GUID) -> Uuid {
    Uuid::from_u128(guid.to_u128())
}

/// Map a COM failure to a native error.
pub(crate) fn com_error(call: &'static str, error: windows::core::Error) -> NativeError {
    hresult_error(call, error.code())
}

pub(crate) fn hresult_error(call: &'static str, hr: HRESULT) -> NativeError {
    NativeError::status(call, hr.0 as u32)
}

pub(crate) trait ComResultExt<T> {
    fn native(self, call: &'static str) -> NativeResult<T>;
}

impl<T> ComResultExt<T> for windows::core::Result<T> {
    fn native(self, call: &'static str) -> NativeResult<T> {
        self.map_err(|e| com_error(call, e))
    }
}
