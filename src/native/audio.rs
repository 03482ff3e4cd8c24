// Sys Manager - Audio Endpoint Bindings
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Audio endpoint port.
//!
//! [`AudioApi`] stands for the device-enumerator root object;
//! [`EndpointVolume`] for the volume-control object activated on the
//! default render endpoint. Implementations hold reference-counted COM
//! objects and release each exactly once when dropped.

use super::NativeResult;

/// Port to the device-enumerator root object.
pub trait AudioApi {
    type Endpoint: EndpointVolume;

    /// Look up the default render endpoint and activate its volume control.
    fn default_render_endpoint(&self) -> NativeResult<Self::Endpoint>;
}

/// Port to one endpoint volume-control object.
pub trait EndpointVolume {
    fn master_volume_scalar(&self) -> NativeResult<f32>;

    fn set_master_volume_scalar(&self, level: f32) -> NativeResult<()>;

    fn mute(&self) -> NativeResult<bool>;

    fn set_mute(&self, mute: bool) -> NativeResult<()>;

    /// `(current step, step count)`.
    fn step_info(&self) -> NativeResult<(u32, u32)>;

    fn step_up(&self) -> NativeResult<()>;

    fn step_down(&self) -> NativeResult<()>;

    /// `(min dB, max dB, increment dB)`.
    fn volume_range(&self) -> NativeResult<(f32, f32, f32)>;
}
