//! Event notifications for collaborators driving the core.
//!
//! This module provides:
//! - [`EventEmitter`] trait that discovery and control operations emit through
//! - [`BroadcastEventBridge`] for callers that prefer to subscribe and drain
//! - Event types for discovery and command outcomes

mod bridge;
mod emitter;

pub use bridge::BroadcastEventBridge;
pub use emitter::{EventEmitter, LoggingEventEmitter, NoopEventEmitter};

use serde::Serialize;

use crate::roku::Device;

/// Events delivered to subscribers of the broadcast bridge.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "category", rename_all = "camelCase")]
pub enum RemoteEvent {
    /// Events from SSDP discovery passes.
    Discovery(DiscoveryEvent),

    /// Events from ECP command dispatch.
    Command(CommandEvent),
}

/// Events raised while a discovery pass is running.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DiscoveryEvent {
    /// A device answered the search and its info fetch succeeded.
    ///
    /// Fires at most once per unique device within one pass, in arrival order.
    DeviceDiscovered {
        device: Device,
        /// Unix timestamp in milliseconds.
        timestamp: u64,
    },
}

/// Events raised by control commands.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CommandEvent {
    /// A command could not be delivered or was rejected by the device.
    Failed {
        /// Human-readable reason, suitable for display.
        reason: String,
        /// Machine-readable error code.
        code: &'static str,
        /// Unix timestamp in milliseconds.
        timestamp: u64,
    },
}

impl CommandEvent {
    /// Returns the human-readable reason carried by the event.
    pub fn reason(&self) -> &str {
        match self {
            Self::Failed { reason, .. } => reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_failed_serializes_with_category_and_type() {
        let event = RemoteEvent::Command(CommandEvent::Failed {
            reason: "Command timed out".into(),
            code: "timeout",
            timestamp: 42,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["category"], "command");
        assert_eq!(json["type"], "failed");
        assert_eq!(json["reason"], "Command timed out");
        assert_eq!(json["code"], "timeout");
    }

    #[test]
    fn device_discovered_carries_device() {
        let event = RemoteEvent::Discovery(DiscoveryEvent::DeviceDiscovered {
            device: Device::at_address("192.168.1.5"),
            timestamp: 1,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["category"], "discovery");
        assert_eq!(json["type"], "deviceDiscovered");
        assert_eq!(json["device"]["address"], "192.168.1.5");
    }
}
