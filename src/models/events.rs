// Sys Manager - Service Events
// Copyright (C) 2026 Christos A. Daggas
// SPDX-License-Identifier: MIT

//! Push notifications raised by the services.
//!
//! Events are the only push channel; everything else is pulled through
//! explicit refresh calls. An event is published only after the underlying
//! native mutation succeeded.

use serde::Serialize;
use tokio::sync::broadcast;

/// Default number of undelivered events kept per subscriber.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// A state change confirmed by a service.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "value", rename_all = "snake_case")]
pub enum ServiceEvent {
    VolumeChanged(u32),
    MuteChanged(bool),
    BrightnessChanged(u32),
    NetworkStatusChanged(String),
    BluetoothStatusChanged(String),
}

/// Broadcast channel shared by the services of one application.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ServiceEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServiceEvent> {
        self.sender.subscribe()
    }

    /// Publish an event. Having no subscribers is not an error.
    pub fn publish(&self, event: ServiceEvent) {
        tracing::debug!("Event: {:?}", event);
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}
