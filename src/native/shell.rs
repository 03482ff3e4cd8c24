// Sys Manager - Shell Bindings
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Shell execution port.

use super::NativeResult;

/// Port that hands a URI or executable to the shell.
pub trait Launcher {
    /// Open `target` with optional `arguments`, like `ShellExecuteW` "open".
    fn open(&self, target: &str, arguments: Option<&str>) -> NativeResult<()>;
}
