// Sys Manager - Audio Service
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Volume and mute of the default render endpoint.
//!
//! The endpoint volume object is resolved at construction and again, at
//! most once per call, whenever it is missing. Failures degrade to safe
//! defaults: 50% volume, not muted, the default step and dB ranges.

use tracing::{debug, info, warn};

use crate::models::audio::{percent_to_scalar, scalar_to_percent, DEFAULT_VOLUME_PERCENT};
use crate::models::{AppConfig, AudioVolumeState, EventBus, ServiceEvent, VolumeRange, VolumeSteps};
use crate::native::audio::{AudioApi, EndpointVolume};
use crate::native::NativeResult;

#[cfg(windows)]
use crate::native::win32::CoreAudio;

pub struct AudioService<A: AudioApi> {
    /// Must be released before `api`, which may own the COM apartment.
    endpoint: Option<A::Endpoint>,
    /// Device enumerator; `None` if it could not be created.
    api: Option<A>,
    step: u32,
    events: EventBus,
}

#[cfg(windows)]
impl AudioService<CoreAudio> {
    /// Create the device enumerator and resolve the default endpoint.
    /// Neither failure is fatal.
    pub fn open(config: &AppConfig, events: EventBus) -> Self {
        let api = match CoreAudio::create() {
            Ok(api) => Some(api),
            Err(e) => {
                warn!("Audio device enumerator unavailable: {}", e);
                None
            }
        };
        Self::with_api(api, config, events)
    }
}

impl<A: AudioApi> AudioService<A> {
    pub fn with_api(api: Option<A>, config: &AppConfig, events: EventBus) -> Self {
        let mut service = Self {
            endpoint: None,
            api,
            step: config.volume_step,
            events,
        };
        service.resolve_endpoint();
        service
    }

    /// Default step for [`increase`](Self::increase) and [`decrease`](Self::decrease).
    pub fn step(&self) -> u32 {
        self.step
    }

    fn resolve_endpoint(&mut self) -> bool {
        let Some(api) = &self.api else {
            return false;
        };
        match api.default_render_endpoint() {
            Ok(endpoint) => {
                debug!("Resolved default render endpoint");
                self.endpoint = Some(endpoint);
                true
            }
            Err(e) => {
                debug!("Default render endpoint unavailable: {}", e);
                self.endpoint = None;
                false
            }
        }
    }

    /// Drop the held endpoint object and resolve the current default one.
    pub fn refresh_endpoint(&mut self) -> bool {
        self.endpoint = None;
        self.resolve_endpoint()
    }

    /// Run `f` on the endpoint, resolving it first if it is missing.
    fn with_endpoint<R>(
        &mut self,
        call: &str,
        f: impl FnOnce(&A::Endpoint) -> NativeResult<R>,
    ) -> Option<R> {
        if self.endpoint.is_none() {
            self.resolve_endpoint();
        }
        let endpoint = self.endpoint.as_ref()?;
        match f(endpoint) {
            Ok(value) => Some(value),
            Err(e) => {
                debug!("{} failed: {}", call, e);
                None
            }
        }
    }

    /// Master volume in percent; 50 when it cannot be read.
    pub fn get_volume(&mut self) -> u32 {
        self.with_endpoint("get volume", |ep| ep.master_volume_scalar())
            .map(scalar_to_percent)
            .unwrap_or(DEFAULT_VOLUME_PERCENT)
    }

    /// Set master volume in percent (clamped to 0-100).
    pub fn set_volume(&mut self, percent: u32) -> bool {
        let percent = percent.min(100);
        let written = self
            .with_endpoint("set volume", |ep| {
                ep.set_master_volume_scalar(percent_to_scalar(percent))
            })
            .is_some();

        if written {
            self.events.publish(ServiceEvent::VolumeChanged(percent));
        } else {
            warn!("Failed to set volume to {}%", percent);
        }
        written
    }

    pub fn increase(&mut self, amount: u32) -> bool {
        let current = self.get_volume();
        self.set_volume(current.saturating_add(amount))
    }

    pub fn decrease(&mut self, amount: u32) -> bool {
        let current = self.get_volume();
        self.set_volume(current.saturating_sub(amount))
    }

    pub fn is_muted(&mut self) -> bool {
        self.with_endpoint("get mute", |ep| ep.mute())
            .unwrap_or(false)
    }

    pub fn set_mute(&mut self, mute: bool) -> bool {
        let written = self.with_endpoint("set mute", |ep| ep.set_mute(mute)).is_some();
        if written {
            info!("Audio {}", if mute { "muted" } else { "unmuted" });
            self.events.publish(ServiceEvent::MuteChanged(mute));
        }
        written
    }

    pub fn toggle_mute(&mut self) -> bool {
        let muted = self.is_muted();
        self.set_mute(!muted)
    }

    /// Level and mute state in one snapshot.
    pub fn state(&mut self) -> AudioVolumeState {
        let level = self
            .with_endpoint("get volume", |ep| ep.master_volume_scalar())
            .filter(|level| level.is_finite())
            .map(|level| level.clamp(0.0, 1.0))
            .unwrap_or_else(|| percent_to_scalar(DEFAULT_VOLUME_PERCENT));
        AudioVolumeState {
            level,
            muted: self.is_muted(),
        }
    }

    /// Discrete step position reported by the endpoint.
    pub fn get_volume_steps(&mut self) -> VolumeSteps {
        self.with_endpoint("get volume steps", |ep| ep.step_info())
            .map(|(current, total)| VolumeSteps { current, total })
            .unwrap_or_default()
    }

    /// Move one endpoint step up.
    pub fn step_up(&mut self) -> bool {
        let stepped = self.with_endpoint("volume step up", |ep| ep.step_up()).is_some();
        self.after_step(stepped)
    }

    /// Move one endpoint step down.
    pub fn step_down(&mut self) -> bool {
        let stepped = self.with_endpoint("volume step down", |ep| ep.step_down()).is_some();
        self.after_step(stepped)
    }

    fn after_step(&mut self, stepped: bool) -> bool {
        if stepped {
            let percent = self.get_volume();
            self.events.publish(ServiceEvent::VolumeChanged(percent));
        }
        stepped
    }

    /// Volume range in dB; (-96, 0, 0.5) when unavailable.
    pub fn get_volume_range(&mut self) -> VolumeRange {
        self.with_endpoint("get volume range", |ep| ep.volume_range())
            .map(|(min_db, max_db, increment_db)| VolumeRange { min_db, max_db, increment_db })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::NativeError;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Default)]
    struct Endpoint {
        level: Cell<f32>,
        muted: Cell<bool>,
        step: Cell<u32>,
        broken: bool,
        drops: RefCell<Vec<&'static str>>,
    }

    struct FakeEndpoint(Rc<Endpoint>);

    impl Drop for FakeEndpoint {
        fn drop(&mut self) {
            self.0.drops.borrow_mut().push("endpoint");
        }
    }

    impl FakeEndpoint {
        fn check(&self, call: &'static str) -> NativeResult<()> {
            if self.0.broken {
                return Err(NativeError::status(call, 0x8889_0004));
            }
            Ok(())
        }
    }

    impl EndpointVolume for FakeEndpoint {
        fn master_volume_scalar(&self) -> NativeResult<f32> {
            self.check("GetMasterVolumeLevelScalar")?;
            Ok(self.0.level.get())
        }

        fn set_master_volume_scalar(&self, level: f32) -> NativeResult<()> {
            self.check("SetMasterVolumeLevelScalar")?;
            self.0.level.set(level);
            Ok(())
        }

        fn mute(&self) -> NativeResult<bool> {
            self.check("GetMute")?;
            Ok(self.0.muted.get())
        }

        fn set_mute(&self, mute: bool) -> NativeResult<()> {
            self.check("SetMute")?;
            self.0.muted.set(mute);
            Ok(())
        }

        fn step_info(&self) -> NativeResult<(u32, u32)> {
            self.check("GetVolumeStepInfo")?;
            Ok((self.0.step.get(), 50))
        }

        fn step_up(&self) -> NativeResult<()> {
            self.check("VolumeStepUp")?;
            let step = (self.0.step.get() + 1).min(49);
            self.0.step.set(step);
            self.0.level.set(step as f32 / 49.0);
            Ok(())
        }

        fn step_down(&self) -> NativeResult<()> {
            self.check("VolumeStepDown")?;
            let step = self.0.step.get().saturating_sub(1);
            self.0.step.set(step);
            self.0.level.set(step as f32 / 49.0);
            Ok(())
        }

        fn volume_range(&self) -> NativeResult<(f32, f32, f32)> {
            self.check("GetVolumeRange")?;
            Ok((-65.25, 0.0, 0.03125))
        }
    }

    /// Enumerator fake; `available` toggles whether a default endpoint exists.
    struct FakeAudio {
        endpoint: Rc<Endpoint>,
        available: Rc<Cell<bool>>,
        resolutions: Rc<Cell<usize>>,
    }

    impl Drop for FakeAudio {
        fn drop(&mut self) {
            self.endpoint.drops.borrow_mut().push("enumerator");
        }
    }

    impl AudioApi for FakeAudio {
        type Endpoint = FakeEndpoint;

        fn default_render_endpoint(&self) -> NativeResult<FakeEndpoint> {
            self.resolutions.set(self.resolutions.get() + 1);
            if !self.available.get() {
                return Err(NativeError::status("GetDefaultAudioEndpoint", 0x8007_0490));
            }
            Ok(FakeEndpoint(Rc::clone(&self.endpoint)))
        }
    }

    struct Harness {
        endpoint: Rc<Endpoint>,
        available: Rc<Cell<bool>>,
        resolutions: Rc<Cell<usize>>,
        service: AudioService<FakeAudio>,
    }

    fn harness(endpoint: Endpoint, available: bool) -> Harness {
        let endpoint = Rc::new(endpoint);
        let available = Rc::new(Cell::new(available));
        let resolutions = Rc::new(Cell::new(0));
        let api = FakeAudio {
            endpoint: Rc::clone(&endpoint),
            available: Rc::clone(&available),
            resolutions: Rc::clone(&resolutions),
        };
        let service = AudioService::with_api(Some(api), &AppConfig::default(), EventBus::default());
        Harness { endpoint, available, resolutions, service }
    }

    #[test]
    fn test_endpoint_released_before_enumerator() {
        let h = harness(Endpoint::default(), true);
        let endpoint = Rc::clone(&h.endpoint);
        drop(h.service);
        assert_eq!(*endpoint.drops.borrow(), vec!["endpoint", "enumerator"]);
    }

    #[test]
    fn test_volume_round_trip_exact() {
        let mut h = harness(Endpoint::default(), true);
        for p in 0..=100 {
            assert!(h.service.set_volume(p));
            assert_eq!(h.service.get_volume(), p);
        }
    }

    #[test]
    fn test_set_volume_clamps_and_publishes() {
        let mut h = harness(Endpoint::default(), true);
        let mut rx = h.service.events.subscribe();
        assert!(h.service.set_volume(140));
        assert_eq!(h.service.get_volume(), 100);
        assert_eq!(rx.try_recv().unwrap(), ServiceEvent::VolumeChanged(100));
    }

    #[test]
    fn test_failures_use_safe_defaults() {
        let mut h = harness(Endpoint { broken: true, ..Default::default() }, true);
        let mut rx = h.service.events.subscribe();
        assert_eq!(h.service.get_volume(), 50);
        assert!(!h.service.is_muted());
        assert!(!h.service.set_volume(20));
        assert!(!h.service.set_mute(true));
        assert_eq!(h.service.get_volume_steps(), VolumeSteps { current: 0, total: 20 });
        assert_eq!(h.service.get_volume_range(), VolumeRange { min_db: -96.0, max_db: 0.0, increment_db: 0.5 });
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_out_of_range_reading_is_clamped() {
        let mut h = harness(Endpoint::default(), true);
        h.endpoint.level.set(1.7);
        assert_eq!(h.service.get_volume(), 100);
        h.endpoint.level.set(-0.2);
        assert_eq!(h.service.get_volume(), 0);
        h.endpoint.level.set(f32::NAN);
        assert_eq!(h.service.get_volume(), 50);
    }

    #[test]
    fn test_mute_and_toggle() {
        let mut h = harness(Endpoint::default(), true);
        let mut rx = h.service.events.subscribe();
        assert!(h.service.set_mute(true));
        assert!(h.service.is_muted());
        assert!(h.service.toggle_mute());
        assert!(!h.service.is_muted());
        assert_eq!(rx.try_recv().unwrap(), ServiceEvent::MuteChanged(true));
        assert_eq!(rx.try_recv().unwrap(), ServiceEvent::MuteChanged(false));
    }

    #[test]
    fn test_increase_decrease() {
        let mut h = harness(Endpoint::default(), true);
        h.service.set_volume(98);
        assert!(h.service.increase(h.service.step()));
        assert_eq!(h.service.get_volume(), 100);
        assert!(h.service.decrease(25));
        assert_eq!(h.service.get_volume(), 75);
    }

    #[test]
    fn test_steps_and_range() {
        let mut h = harness(Endpoint::default(), true);
        let mut rx = h.service.events.subscribe();
        assert!(h.service.step_up());
        assert_eq!(h.service.get_volume_steps(), VolumeSteps { current: 1, total: 50 });
        assert_eq!(rx.try_recv().unwrap(), ServiceEvent::VolumeChanged(2));
        assert!(h.service.step_down());
        assert_eq!(h.service.get_volume_steps().current, 0);
        assert_eq!(h.service.get_volume_range().min_db, -65.25);
    }

    #[test]
    fn test_lazy_resolution_once_per_call() {
        let mut h = harness(Endpoint::default(), false);
        assert_eq!(h.resolutions.get(), 1);

        assert_eq!(h.service.get_volume(), 50);
        assert_eq!(h.resolutions.get(), 2);
        assert!(!h.service.set_volume(30));
        assert_eq!(h.resolutions.get(), 3);

        h.available.set(true);
        assert!(h.service.set_volume(30));
        assert_eq!(h.resolutions.get(), 4);
        // Resolved object is reused.
        assert_eq!(h.service.get_volume(), 30);
        assert_eq!(h.resolutions.get(), 4);
    }

    #[test]
    fn test_refresh_endpoint() {
        let mut h = harness(Endpoint::default(), true);
        h.available.set(false);
        assert!(!h.service.refresh_endpoint());
        h.available.set(true);
        assert!(h.service.refresh_endpoint());
        assert_eq!(h.resolutions.get(), 3);
    }

    #[test]
    fn test_state_snapshot() {
        let mut h = harness(Endpoint::default(), true);
        h.service.set_volume(40);
        h.service.set_mute(true);
        let state = h.service.state();
        assert_eq!(state.percent(), 40);
        assert!(state.muted);
    }

    #[test]
    fn test_without_enumerator() {
        let mut svc: AudioService<FakeAudio> =
            AudioService::with_api(None, &AppConfig::default(), EventBus::default());
        assert_eq!(svc.get_volume(), 50);
        assert!(!svc.toggle_mute());
        assert_eq!(svc.state().percent(), 50);
    }
}
