// Sys Manager - Shell Launcher (Windows)
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

use windows::core::{w, PCWSTR};
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::Shell::ShellExecuteW;
use windows::Win32::UI::WindowsAndMessaging::SW_SHOWNORMAL;

use super::{pcwstr, to_wide};
use crate::native::shell::Launcher;
use crate::native::{NativeError, NativeResult};

/// Values up to 32 returned by `ShellExecuteW` are error codes.
const SHELL_EXECUTE_MIN_SUCCESS: isize = 32;

/// Launches URIs and executables with `ShellExecuteW`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellLauncher;

impl Launcher for ShellLauncher {
    fn open(&self, target: &str, arguments: Option<&str>) -> NativeResult<()> {
        let file = to_wide(target);
        let parameters = arguments.map(to_wide);
        // SAFETY: all strings are NUL-terminated and outlive the call.
        let result = unsafe {
            ShellExecuteW(
                HWND::default(),
                w!("open"),
                pcwstr(&file),
                parameters.as_deref().map(pcwstr).unwrap_or(PCWSTR::null()),
                PCWSTR::null(),
                SW_SHOWNORMAL,
            )
        };
        let code = result.0 as isize;
        if code <= SHELL_EXECUTE_MIN_SUCCESS {
            return Err(NativeError::status("ShellExecuteW", code as u32));
        }
        Ok(())
    }
}
