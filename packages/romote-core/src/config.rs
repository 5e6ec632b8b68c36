//! Tunable timings and ports for discovery, control, and wake.
//!
//! All fields have sensible defaults. The values are plain milliseconds so the
//! struct round-trips through YAML/JSON configuration files unchanged.

use std::net::Ipv4Addr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::protocol_constants::{DEFAULT_ECP_PORT, WOL_PORT};

/// Configuration for the remote-control core.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct RemoteConfig {
    // Discovery
    /// How long an SSDP discovery pass listens for responses (ms).
    pub discovery_timeout_ms: u64,

    /// MX value (max response delay hint in seconds) sent in M-SEARCH.
    pub ssdp_mx: u64,

    /// Overall budget for a single `/query/device-info` fetch (ms).
    pub device_info_timeout_ms: u64,

    // Control
    /// Per-request timeout for ECP commands and queries (ms).
    pub http_timeout_ms: u64,

    /// Delay between characters when typing text (ms).
    pub text_char_delay_ms: u64,

    /// Delay between keys when replaying a recorded key sequence (ms).
    pub key_sequence_delay_ms: u64,

    /// Port used when a device is added by bare IP address.
    pub ecp_port: u16,

    // Wake-on-LAN
    /// Destination UDP port for magic packets.
    pub wake_port: u16,

    /// Directed broadcast address for magic packets.
    ///
    /// When unset, the primary interface address with its last octet set to
    /// 255 is used, which is only correct on a /24 network.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wake_broadcast: Option<Ipv4Addr>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            discovery_timeout_ms: 5000,
            ssdp_mx: 3,
            device_info_timeout_ms: 5000,
            http_timeout_ms: 5000,
            text_char_delay_ms: 50,
            key_sequence_delay_ms: 100,
            ecp_port: DEFAULT_ECP_PORT,
            wake_port: WOL_PORT,
            wake_broadcast: None,
        }
    }
}

impl RemoteConfig {
    /// Validates the configuration values.
    ///
    /// Delays may be zero; timeouts and ports may not.
    pub fn validate(&self) -> Result<(), String> {
        if self.discovery_timeout_ms == 0 {
            return Err("discovery_timeout_ms must be >= 1".to_string());
        }
        if self.device_info_timeout_ms == 0 {
            return Err("device_info_timeout_ms must be >= 1".to_string());
        }
        if self.http_timeout_ms == 0 {
            return Err("http_timeout_ms must be >= 1".to_string());
        }
        if self.ecp_port == 0 {
            return Err("ecp_port must be a valid TCP port".to_string());
        }
        if self.wake_port == 0 {
            return Err("wake_port must be a valid UDP port".to_string());
        }
        Ok(())
    }

    #[must_use]
    pub fn discovery_timeout(&self) -> Duration {
        Duration::from_millis(self.discovery_timeout_ms)
    }

    #[must_use]
    pub fn device_info_timeout(&self) -> Duration {
        Duration::from_millis(self.device_info_timeout_ms)
    }

    #[must_use]
    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }

    #[must_use]
    pub fn text_char_delay(&self) -> Duration {
        Duration::from_millis(self.text_char_delay_ms)
    }

    #[must_use]
    pub fn key_sequence_delay(&self) -> Duration {
        Duration::from_millis(self.key_sequence_delay_ms)
    }
}
