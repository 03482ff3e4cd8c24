// Sys Manager - Wireless Network Service
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Wi-Fi scanning, profiles, and connections over a WLAN session.
//!
//! Native failures never cross this boundary: they are logged and turned
//! into `false` or empty results. Opening the session is the only fatal
//! path.

use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::models::{
    AppConfig, AuthAlgorithm, CipherAlgorithm, EventBus, InterfaceState, SavedProfile,
    ServiceEvent, WirelessInterface, WirelessNetwork,
};
use crate::native::wlan::{
    ConnectionMode, RawAvailableNetwork, WlanApi, WLAN_AVAILABLE_NETWORK_CONNECTED,
};

use super::profile_xml::profile_document;

#[cfg(windows)]
use crate::models::{Error, Result};
#[cfg(windows)]
use crate::native::win32::WlanSession;

/// Wireless network service bound to one WLAN session.
pub struct WirelessService<A: WlanApi> {
    api: A,
    /// First interface of the last enumeration.
    current_interface: Option<Uuid>,
    scan_settle: Duration,
    events: EventBus,
}

#[cfg(windows)]
impl WirelessService<WlanSession> {
    /// Open a session to the OS WLAN subsystem.
    pub fn open(config: &AppConfig, events: EventBus) -> Result<Self> {
        let session = WlanSession::open().map_err(|e| {
            warn!("Failed to open WLAN session: {}", e);
            Error::backend_unavailable("WLAN", e.to_string())
        })?;
        info!("Opened WLAN session");
        Ok(Self::with_api(session, config, events))
    }
}

impl<A: WlanApi> WirelessService<A> {
    /// Create a service over an already-open session.
    pub fn with_api(api: A, config: &AppConfig, events: EventBus) -> Self {
        Self {
            api,
            current_interface: None,
            scan_settle: config.scan_settle(),
            events,
        }
    }

    /// Interface used by calls that need one implicitly.
    pub fn current_interface(&self) -> Option<Uuid> {
        self.current_interface
    }

    /// All WLAN interfaces; remembers the first as the current one, or
    /// forgets it when none is left.
    pub fn list_interfaces(&mut self) -> Vec<WirelessInterface> {
        let raw = match self.api.enum_interfaces() {
            Ok(raw) => raw,
            Err(e) => {
                debug!("Interface enumeration failed: {}", e);
                return Vec::new();
            }
        };

        let interfaces: Vec<WirelessInterface> = raw
            .into_iter()
            .map(|info| WirelessInterface {
                id: info.guid,
                description: info.description,
                state: InterfaceState::from_native(info.state),
            })
            .collect();

        self.current_interface = interfaces.first().map(|i| i.id);
        interfaces
    }

    /// Cached interface, enumerating once if none is cached yet.
    fn ensure_interface(&mut self) -> Option<Uuid> {
        if self.current_interface.is_none() {
            self.list_interfaces();
        }
        if self.current_interface.is_none() {
            debug!("No wireless interface available");
        }
        self.current_interface
    }

    /// Read the visible networks, optionally provoking a rescan first.
    ///
    /// A forced refresh blocks the caller for the configured settle interval.
    pub fn scan(&mut self, force_refresh: bool) -> Vec<WirelessNetwork> {
        let Some(interface) = self.ensure_interface() else {
            return Vec::new();
        };
        if force_refresh {
            self.trigger_scan(&interface);
        }
        self.read_networks(&interface)
    }

    /// Visible networks from the latest scan results.
    pub fn list_networks(&mut self) -> Vec<WirelessNetwork> {
        self.scan(false)
    }

    /// The network currently connected, if any.
    pub fn current_connection(&mut self) -> Option<WirelessNetwork> {
        self.list_networks().into_iter().find(|n| n.connected)
    }

    /// Nudge the driver into rescanning with an unsecured discovery
    /// connect. The request's own result does not matter.
    fn trigger_scan(&self, interface: &Uuid) {
        if let Err(e) = self.api.connect(interface, &ConnectionMode::DiscoveryUnsecure) {
            debug!("Scan trigger returned {} (ignored)", e);
        }
        std::thread::sleep(self.scan_settle);
    }

    fn read_networks(&self, interface: &Uuid) -> Vec<WirelessNetwork> {
        match self.api.available_networks(interface) {
            Ok(raw) => merge_networks(raw),
            Err(e) => {
                debug!("Available network query failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Profiles saved for the current interface.
    pub fn list_saved_profiles(&mut self) -> Vec<SavedProfile> {
        let Some(interface) = self.ensure_interface() else {
            return Vec::new();
        };
        match self.api.profile_names(&interface) {
            Ok(names) => names.into_iter().map(|name| SavedProfile { name }).collect(),
            Err(e) => {
                debug!("Profile enumeration failed: {}", e);
                Vec::new()
            }
        }
    }

    pub fn delete_profile(&mut self, name: &str) -> bool {
        let Some(interface) = self.ensure_interface() else {
            return false;
        };
        match self.api.delete_profile(&interface, name) {
            Ok(()) => {
                info!("Deleted Wi-Fi profile {}", name);
                true
            }
            Err(e) => {
                warn!("Failed to delete Wi-Fi profile {}: {}", name, e);
                false
            }
        }
    }

    /// Request a connection with a saved profile.
    ///
    /// Returns once the OS accepts the request; association completes later.
    pub fn connect(&mut self, profile_name: &str) -> bool {
        let Some(interface) = self.ensure_interface() else {
            return false;
        };
        let mode = ConnectionMode::Profile(profile_name.to_string());
        match self.api.connect(&interface, &mode) {
            Ok(()) => {
                info!("Connecting to {}", profile_name);
                self.events.publish(ServiceEvent::NetworkStatusChanged(format!(
                    "Connecting to {}...",
                    profile_name
                )));
                true
            }
            Err(e) => {
                warn!("Connect request for {} rejected: {}", profile_name, e);
                false
            }
        }
    }

    /// Install a profile for `ssid` (replacing any with the same name) and
    /// connect with it.
    pub fn connect_with_credentials(
        &mut self,
        ssid: &str,
        password: Zeroizing<String>,
        auth: AuthAlgorithm,
        cipher: CipherAlgorithm,
    ) -> bool {
        let Some(interface) = self.ensure_interface() else {
            return false;
        };

        let document = profile_document(ssid, &password, auth, cipher);
        drop(password);

        if let Err(e) = self.api.set_profile(&interface, &document, true) {
            warn!("Failed to install profile for {}: {}", ssid, e);
            return false;
        }
        debug!("Installed profile for {}", ssid);

        self.connect(ssid)
    }

    pub fn disconnect(&mut self) -> bool {
        let Some(interface) = self.ensure_interface() else {
            return false;
        };
        match self.api.disconnect(&interface) {
            Ok(()) => {
                info!("Disconnected from Wi-Fi");
                self.events
                    .publish(ServiceEvent::NetworkStatusChanged("Disconnected from Wi-Fi".to_string()));
                true
            }
            Err(e) => {
                warn!("Disconnect request rejected: {}", e);
                false
            }
        }
    }
}

/// Normalize raw scan entries: one entry per SSID, keeping the whole record
/// with the higher signal quality, ordered connected first and then by
/// descending quality. Entries whose SSID decodes to nothing are hidden
/// networks and are skipped.
pub fn merge_networks(raw: Vec<RawAvailableNetwork>) -> Vec<WirelessNetwork> {
    let mut networks: Vec<WirelessNetwork> = Vec::with_capacity(raw.len());
    let mut by_ssid: HashMap<String, usize> = HashMap::new();

    for entry in raw {
        let ssid = String::from_utf8_lossy(&entry.ssid).into_owned();
        if ssid.is_empty() {
            continue;
        }

        let network = WirelessNetwork {
            ssid: ssid.clone(),
            profile_name: Some(entry.profile_name).filter(|name| !name.is_empty()),
            signal_quality: entry.signal_quality.min(100),
            secured: entry.security_enabled,
            auth: AuthAlgorithm::from_native(entry.auth_algorithm),
            cipher: CipherAlgorithm::from_native(entry.cipher_algorithm),
            connected: entry.flags & WLAN_AVAILABLE_NETWORK_CONNECTED != 0,
        };

        match by_ssid.get(&ssid) {
            Some(&index) => {
                if network.signal_quality > networks[index].signal_quality {
                    networks[index] = network;
                }
            }
            None => {
                by_ssid.insert(ssid, networks.len());
                networks.push(network);
            }
        }
    }

    networks.sort_by(|a, b| {
        b.connected
            .cmp(&a.connected)
            .then(b.signal_quality.cmp(&a.signal_quality))
    });
    networks
}
