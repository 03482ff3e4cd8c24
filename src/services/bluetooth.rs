// Sys Manager - Bluetooth Service
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Bluetooth radios and the devices known to them.
//!
//! Radio handles are held only from one enumeration to the next. Every
//! enumeration drops the previous generation before asking the OS for a
//! new one, so repeated refreshes never accumulate handles.

use std::cmp::Ordering;
use tracing::{debug, info, warn};

use crate::models::bluetooth::system_time_to_datetime;
use crate::models::{
    BatchOutcome, BluetoothAddress, BluetoothDevice, BluetoothRadio, EventBus, RadioId,
    ServiceEvent,
};
use crate::native::bluetooth::{BluetoothApi, DeviceSearch, RawDeviceInfo};

#[cfg(windows)]
use crate::native::win32::BluetoothStack;

/// Name shown for peers that never reported one.
pub const UNKNOWN_DEVICE_NAME: &str = "Unknown Device";

pub struct BluetoothService<A: BluetoothApi> {
    api: A,
    radios: Vec<A::Radio>,
    events: EventBus,
}

#[cfg(windows)]
impl BluetoothService<BluetoothStack> {
    /// Bind to the OS Bluetooth stack. Never fails; a machine without
    /// radios simply enumerates nothing.
    pub fn open(events: EventBus) -> Self {
        Self::with_api(BluetoothStack, events)
    }
}

impl<A: BluetoothApi> BluetoothService<A> {
    pub fn with_api(api: A, events: EventBus) -> Self {
        Self {
            api,
            radios: Vec::new(),
            events,
        }
    }

    /// Release the held radio handles and enumerate afresh.
    fn refresh_radios(&mut self) {
        // Old handles go before new ones are opened.
        self.radios.clear();
        match self.api.find_radios() {
            Ok(radios) => {
                debug!("Found {} Bluetooth radio(s)", radios.len());
                self.radios = radios;
            }
            Err(e) => debug!("Radio enumeration failed: {}", e),
        }
    }

    /// All radios, with their current discoverable/connectable flags.
    pub fn list_radios(&mut self) -> Vec<BluetoothRadio> {
        self.refresh_radios();

        let mut result = Vec::with_capacity(self.radios.len());
        for (index, radio) in self.radios.iter().enumerate() {
            let info = match self.api.radio_info(radio) {
                Ok(info) => info,
                Err(e) => {
                    debug!("Skipping radio {}: {}", index, e);
                    continue;
                }
            };
            result.push(BluetoothRadio {
                id: RadioId(index),
                name: info.name,
                address: BluetoothAddress::new(info.address),
                manufacturer: info.manufacturer,
                class_of_device: info.class_of_device,
                connectable: self.api.is_connectable(radio),
                discoverable: self.api.is_discoverable(radio),
            });
        }
        result
    }

    /// Whether the machine has at least one Bluetooth radio.
    pub fn is_available(&mut self) -> bool {
        self.refresh_radios();
        !self.radios.is_empty()
    }

    /// Devices known to any radio: connected first, then paired, then by
    /// name.
    pub fn list_devices(&mut self) -> Vec<BluetoothDevice> {
        self.refresh_radios();

        let search = DeviceSearch::known_devices();

        let mut devices = Vec::new();
        for radio in &self.radios {
            match self.api.find_devices(radio, &search) {
                Ok(found) => devices.extend(found.into_iter().map(to_device)),
                Err(e) => debug!("Device search failed: {}", e),
            }
        }

        devices.sort_by(compare_devices);
        devices
    }

    pub fn list_paired(&mut self) -> Vec<BluetoothDevice> {
        self.list_devices().into_iter().filter(|d| d.paired).collect()
    }

    pub fn list_connected(&mut self) -> Vec<BluetoothDevice> {
        self.list_devices().into_iter().filter(|d| d.connected).collect()
    }

    /// Make every radio discoverable (or not).
    pub fn set_discoverable(&mut self, enable: bool) -> bool {
        let outcome = self.apply_to_radios("set discoverable", |api, radio| {
            api.enable_discovery(radio, enable)
        });
        self.finish_toggle(
            outcome,
            if enable { "Bluetooth is discoverable" } else { "Bluetooth is hidden" },
        )
    }

    /// Accept (or refuse) incoming connections on every radio.
    pub fn set_connectable(&mut self, enable: bool) -> bool {
        let outcome = self.apply_to_radios("set connectable", |api, radio| {
            api.enable_incoming_connections(radio, enable)
        });
        self.finish_toggle(
            outcome,
            if enable { "Bluetooth accepts connections" } else { "Bluetooth refuses connections" },
        )
    }

    pub fn is_discoverable(&mut self) -> bool {
        self.refresh_radios();
        self.radios.iter().any(|radio| self.api.is_discoverable(radio))
    }

    pub fn is_connectable(&mut self) -> bool {
        self.refresh_radios();
        self.radios.iter().any(|radio| self.api.is_connectable(radio))
    }

    /// Apply `op` to every radio, continuing past failures.
    fn apply_to_radios<F>(&mut self, operation: &str, mut op: F) -> BatchOutcome
    where
        F: FnMut(&A, &A::Radio) -> bool,
    {
        self.refresh_radios();
        let mut outcome = BatchOutcome::new(operation);
        for radio in &self.radios {
            outcome.record(op(&self.api, radio));
        }
        outcome
    }

    fn finish_toggle(&self, outcome: BatchOutcome, status: &str) -> bool {
        match outcome.into_result() {
            Ok(()) => {
                info!("{}", status);
                self.events
                    .publish(ServiceEvent::BluetoothStatusChanged(status.to_string()));
                true
            }
            Err(e) => {
                warn!("{}", e);
                false
            }
        }
    }
}

fn to_device(raw: RawDeviceInfo) -> BluetoothDevice {
    let name = if raw.name.trim().is_empty() {
        UNKNOWN_DEVICE_NAME.to_string()
    } else {
        raw.name
    };
    BluetoothDevice {
        address: BluetoothAddress::new(raw.address),
        name,
        connected: raw.connected,
        paired: raw.remembered,
        authenticated: raw.authenticated,
        last_seen: system_time_to_datetime(&raw.last_seen),
        last_used: system_time_to_datetime(&raw.last_used),
        class_of_device: raw.class_of_device,
    }
}

fn compare_devices(a: &BluetoothDevice, b: &BluetoothDevice) -> Ordering {
    b.connected
        .cmp(&a.connected)
        .then(b.paired.cmp(&a.paired))
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::bluetooth::{RawRadioInfo, RawSystemTime};
    use crate::native::{NativeError, NativeResult};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Radio handle that counts itself as outstanding until dropped.
    struct FakeRadio {
        index: usize,
        outstanding: Rc<Cell<usize>>,
    }

    impl Drop for FakeRadio {
        fn drop(&mut self) {
            self.outstanding.set(self.outstanding.get() - 1);
        }
    }

    #[derive(Default)]
    struct FakeStack {
        radio_count: usize,
        outstanding: Rc<Cell<usize>>,
        peak: Cell<usize>,
        discoverable: RefCell<Vec<bool>>,
        refuse_toggle_on: Option<usize>,
        devices: Vec<Vec<RawDeviceInfo>>,
        last_search: Cell<Option<DeviceSearch>>,
    }

    impl FakeStack {
        fn with_radios(count: usize) -> Self {
            Self {
                radio_count: count,
                discoverable: RefCell::new(vec![false; count]),
                ..Self::default()
            }
        }
    }

    impl BluetoothApi for FakeStack {
        type Radio = FakeRadio;

        fn find_radios(&self) -> NativeResult<Vec<FakeRadio>> {
            let radios: Vec<FakeRadio> = (0..self.radio_count)
                .map(|index| {
                    self.outstanding.set(self.outstanding.get() + 1);
                    FakeRadio { index, outstanding: Rc::clone(&self.outstanding) }
                })
                .collect();
            self.peak.set(self.peak.get().max(self.outstanding.get()));
            Ok(radios)
        }

        fn radio_info(&self, radio: &FakeRadio) -> NativeResult<RawRadioInfo> {
            Ok(RawRadioInfo {
                address: 0x0011_2233_4400 + radio.index as u64,
                name: format!("Radio {}", radio.index),
                class_of_device: 0x01 << 8,
                manufacturer: 2,
            })
        }

        fn is_connectable(&self, _radio: &FakeRadio) -> bool {
            true
        }

        fn is_discoverable(&self, radio: &FakeRadio) -> bool {
            self.discoverable.borrow()[radio.index]
        }

        fn enable_discovery(&self, radio: &FakeRadio, enable: bool) -> bool {
            if self.refuse_toggle_on == Some(radio.index) {
                return false;
            }
            self.discoverable.borrow_mut()[radio.index] = enable;
            true
        }

        fn enable_incoming_connections(&self, radio: &FakeRadio, _enable: bool) -> bool {
            self.refuse_toggle_on != Some(radio.index)
        }

        fn find_devices(&self, radio: &FakeRadio, search: &DeviceSearch) -> NativeResult<Vec<RawDeviceInfo>> {
            self.last_search.set(Some(*search));
            self.devices
                .get(radio.index)
                .cloned()
                .ok_or(NativeError::status("BluetoothFindFirstDevice", 259))
        }
    }

    fn device(name: &str, connected: bool, remembered: bool) -> RawDeviceInfo {
        RawDeviceInfo {
            address: 0xAABB_CCDD_EE00,
            name: name.to_string(),
            class_of_device: 0x04 << 8,
            connected,
            remembered,
            authenticated: remembered,
            last_seen: RawSystemTime { year: 2026, month: 5, day: 2, hour: 8, minute: 0, second: 0 },
            last_used: RawSystemTime::default(),
        }
    }

    fn service(api: FakeStack) -> BluetoothService<FakeStack> {
        BluetoothService::with_api(api, EventBus::default())
    }

    #[test]
    fn test_list_radios_releases_previous_generation() {
        let mut svc = service(FakeStack::with_radios(2));
        assert_eq!(svc.list_radios().len(), 2);
        assert_eq!(svc.api.outstanding.get(), 2);
        assert_eq!(svc.list_radios().len(), 2);
        assert_eq!(svc.api.outstanding.get(), 2);
        assert_eq!(svc.api.peak.get(), 2);
    }

    #[test]
    fn test_drop_releases_all_radios() {
        let api = FakeStack::with_radios(3);
        let outstanding = Rc::clone(&api.outstanding);
        let mut svc = service(api);
        svc.list_radios();
        assert_eq!(outstanding.get(), 3);
        drop(svc);
        assert_eq!(outstanding.get(), 0);
    }

    #[test]
    fn test_radio_fields() {
        let mut svc = service(FakeStack::with_radios(1));
        let radios = svc.list_radios();
        assert_eq!(radios[0].address.to_string(), "00:11:22:33:44:00");
        assert_eq!(radios[0].name, "Radio 0");
        assert_eq!(radios[0].manufacturer, 2);
        assert_eq!(radios[0].class_of_device, 0x01 << 8);
        assert!(radios[0].connectable);
        assert!(!radios[0].discoverable);
    }

    #[test]
    fn test_no_radios_is_empty_not_error() {
        let mut svc = service(FakeStack::default());
        assert!(svc.list_radios().is_empty());
        assert!(svc.list_devices().is_empty());
        assert!(!svc.is_available());
        assert!(!svc.is_discoverable());
        assert!(!svc.set_discoverable(true));
        assert!(!svc.set_connectable(true));
    }

    #[test]
    fn test_device_union_and_ordering() {
        let mut api = FakeStack::with_radios(2);
        api.devices = vec![
            vec![device("Zed Speaker", false, true), device("Keyboard", false, false)],
            vec![device("Mouse", false, true), device("Headset", true, true)],
        ];
        let mut svc = service(api);
        let names: Vec<String> = svc.list_devices().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["Headset", "Mouse", "Zed Speaker", "Keyboard"]);
    }

    #[test]
    fn test_device_names_sort_case_insensitively() {
        let mut api = FakeStack::with_radios(1);
        api.devices = vec![vec![
            device("Zed Speaker", false, true),
            device("airpods", false, true),
            device("Mouse", false, true),
            device("AirPods", false, true),
        ]];
        let mut svc = service(api);
        let names: Vec<String> = svc.list_devices().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["AirPods", "airpods", "Mouse", "Zed Speaker"]);
    }

    #[test]
    fn test_device_filters() {
        let mut api = FakeStack::with_radios(1);
        api.devices = vec![vec![
            device("Phone", false, false),
            device("Headset", true, true),
            device("Mouse", false, true),
        ]];
        let mut svc = service(api);
        assert_eq!(svc.list_paired().len(), 2);
        let connected = svc.list_connected();
        assert_eq!(connected.len(), 1);
        assert_eq!(connected[0].status_label(), "Connected");
    }

    #[test]
    fn test_device_search_is_known_devices_only() {
        let mut api = FakeStack::with_radios(1);
        api.devices = vec![vec![]];
        let mut svc = service(api);
        svc.list_devices();
        let search = svc.api.last_search.get().unwrap();
        assert!(search.return_authenticated && search.return_remembered);
        assert!(search.return_unknown && search.return_connected);
        assert!(!search.issue_inquiry);
    }

    #[test]
    fn test_device_normalization() {
        let mut api = FakeStack::with_radios(1);
        api.devices = vec![vec![device("  ", false, false)]];
        let mut svc = service(api);
        let d = &svc.list_devices()[0];
        assert_eq!(d.name, UNKNOWN_DEVICE_NAME);
        assert_eq!(d.address.to_string(), "AA:BB:CC:DD:EE:00");
        assert!(d.last_seen.is_some());
        assert!(d.last_used.is_none());
        assert_eq!(d.category(), crate::models::DeviceCategory::AudioVideo);
    }

    #[test]
    fn test_failed_radio_search_keeps_others() {
        let mut api = FakeStack::with_radios(2);
        api.devices = vec![vec![device("Headset", true, true)]];
        let mut svc = service(api);
        assert_eq!(svc.list_devices().len(), 1);
    }

    #[test]
    fn test_set_discoverable_all_radios() {
        let mut svc = service(FakeStack::with_radios(2));
        let mut rx = svc.events.subscribe();
        assert!(svc.set_discoverable(true));
        assert!(svc.is_discoverable());
        assert_eq!(
            rx.try_recv().unwrap(),
            ServiceEvent::BluetoothStatusChanged("Bluetooth is discoverable".into())
        );
    }

    #[test]
    fn test_partial_toggle_is_failure_without_rollback() {
        let mut api = FakeStack::with_radios(2);
        api.refuse_toggle_on = Some(1);
        let mut svc = service(api);
        let mut rx = svc.events.subscribe();
        assert!(!svc.set_discoverable(true));
        assert_eq!(*svc.api.discoverable.borrow(), vec![true, false]);
        // Any radio counts.
        assert!(svc.is_discoverable());
        assert!(rx.try_recv().is_err());
        assert!(!svc.set_connectable(true));
    }
}
