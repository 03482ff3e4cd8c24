// Sys Manager - Core Audio (Windows)
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

use windows::core::GUID;
use windows::Win32::Media::Audio::Endpoints::IAudioEndpointVolume;
use windows::Win32::Media::Audio::{eMultimedia, eRender, IMMDeviceEnumerator, MMDeviceEnumerator};
use windows::Win32::System::Com::{CoCreateInstance, CLSCTX_ALL};

use super::{ComApartment, ComResultExt};
use crate::native::audio::{AudioApi, EndpointVolume};
use crate::native::NativeResult;

/// The device enumerator root object.
pub struct CoreAudio {
    enumerator: IMMDeviceEnumerator,
    // Dropped after the enumerator.
    _apartment: ComApartment,
}

impl CoreAudio {
    pub fn create() -> NativeResult<Self> {
        let apartment = ComApartment::enter();
        // SAFETY: COM is initialized on this thread.
        let enumerator: IMMDeviceEnumerator =
            unsafe { CoCreateInstance(&MMDeviceEnumerator, None, CLSCTX_ALL) }
                .native("CoCreateInstance(MMDeviceEnumerator)")?;
        Ok(Self {
            enumerator,
            _apartment: apartment,
        })
    }
}

impl AudioApi for CoreAudio {
    type Endpoint = CoreAudioEndpoint;

    fn default_render_endpoint(&self) -> NativeResult<CoreAudioEndpoint> {
        // SAFETY: the enumerator is alive for the duration of the calls.
        unsafe {
            let device = self
                .enumerator
                .GetDefaultAudioEndpoint(eRender, eMultimedia)
                .native("IMMDeviceEnumerator::GetDefaultAudioEndpoint")?;
            let volume: IAudioEndpointVolume = device
                .Activate(CLSCTX_ALL, None)
                .native("IMMDevice::Activate")?;
            Ok(CoreAudioEndpoint { volume })
        }
    }
}

/// Volume control of one endpoint.
pub struct CoreAudioEndpoint {
    volume: IAudioEndpointVolume,
}

impl EndpointVolume for CoreAudioEndpoint {
    fn master_volume_scalar(&self) -> NativeResult<f32> {
        // SAFETY: live interface.
        unsafe { self.volume.GetMasterVolumeLevelScalar() }
            .native("IAudioEndpointVolume::GetMasterVolumeLevelScalar")
    }

    fn set_master_volume_scalar(&self, level: f32) -> NativeResult<()> {
        // SAFETY: live interface; a null event context is allowed.
        unsafe { self.volume.SetMasterVolumeLevelScalar(level, std::ptr::null::<GUID>()) }
            .native("IAudioEndpointVolume::SetMasterVolumeLevelScalar")
    }

    fn mute(&self) -> NativeResult<bool> {
        // SAFETY: live interface.
        unsafe { self.volume.GetMute() }
            .map(|muted| muted.as_bool())
            .native("IAudioEndpointVolume::GetMute")
    }

    fn set_mute(&self, mute: bool) -> NativeResult<()> {
        // SAFETY: live interface.
        unsafe { self.volume.SetMute(mute, std::ptr::null::<GUID>()) }
            .native("IAudioEndpointVolume::SetMute")
    }

    fn step_info(&self) -> NativeResult<(u32, u32)> {
        let (mut step, mut count) = (0u32, 0u32);
        // SAFETY: out-pointers are valid for the call.
        unsafe { self.volume.GetVolumeStepInfo(&mut step, &mut count) }
            .native("IAudioEndpointVolume::GetVolumeStepInfo")?;
        Ok((step, count))
    }

    fn step_up(&self) -> NativeResult<()> {
        // SAFETY: live interface.
        unsafe { self.volume.VolumeStepUp(std::ptr::null::<GUID>()) }
            .native("IAudioEndpointVolume::VolumeStepUp")
    }

    fn step_down(&self) -> NativeResult<()> {
        // SAFETY: live interface.
        unsafe { self.volume.VolumeStepDown(std::ptr::null::<GUID>()) }
            .native("IAudioEndpointVolume::VolumeStepDown")
    }

    fn volume_range(&self) -> NativeResult<(f32, f32, f32)> {
        let (mut min_db, mut max_db, mut increment_db) = (0f32, 0f32, 0f32);
        // SAFETY: out-pointers are valid for the call.
        unsafe { self.volume.GetVolumeRange(&mut min_db, &mut max_db, &mut increment_db) }
            .native("IAudioEndpointVolume::GetVolumeRange")?;
        Ok((min_db, max_db, increment_db))
    }
}
