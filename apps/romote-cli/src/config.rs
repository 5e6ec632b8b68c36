//! CLI configuration.
//!
//! Supports loading from YAML files with environment variable overrides.

use std::net::Ipv4Addr;
use std::path::Path;

use anyhow::{Context, Result};
use romote_core::RemoteConfig;
use serde::Deserialize;

/// CLI configuration loaded from YAML with environment overrides.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// How long discovery listens for SSDP responses (ms).
    /// Override: `ROMOTE_DISCOVERY_TIMEOUT_MS`
    pub discovery_timeout_ms: u64,

    /// MX hint sent in the M-SEARCH (seconds).
    /// Override: `ROMOTE_SSDP_MX`
    pub ssdp_mx: u64,

    /// Budget for one device-info fetch (ms).
    /// Override: `ROMOTE_DEVICE_INFO_TIMEOUT_MS`
    pub device_info_timeout_ms: u64,

    /// Per-request ECP timeout (ms).
    /// Override: `ROMOTE_HTTP_TIMEOUT_MS`
    pub http_timeout_ms: u64,

    /// Delay between characters when typing text (ms).
    /// Override: `ROMOTE_TEXT_CHAR_DELAY_MS`
    pub text_char_delay_ms: u64,

    /// Delay between keys of a key-sequence shortcut (ms).
    /// Override: `ROMOTE_KEY_SEQUENCE_DELAY_MS`
    pub key_sequence_delay_ms: u64,

    /// ECP port used for devices given by IP address.
    /// Override: `ROMOTE_ECP_PORT`
    pub ecp_port: u16,

    /// Destination port for Wake-on-LAN packets.
    /// Override: `ROMOTE_WAKE_PORT`
    pub wake_port: u16,

    /// Directed broadcast for Wake-on-LAN; needed on networks that are not /24.
    /// Override: `ROMOTE_WAKE_BROADCAST`
    pub wake_broadcast: Option<Ipv4Addr>,
}

impl Default for CliConfig {
    fn default() -> Self {
        let core = RemoteConfig::default();
        Self {
            discovery_timeout_ms: core.discovery_timeout_ms,
            ssdp_mx: core.ssdp_mx,
            device_info_timeout_ms: core.device_info_timeout_ms,
            http_timeout_ms: core.http_timeout_ms,
            text_char_delay_ms: core.text_char_delay_ms,
            key_sequence_delay_ms: core.key_sequence_delay_ms,
            ecp_port: core.ecp_port,
            wake_port: core.wake_port,
            wake_broadcast: core.wake_broadcast,
        }
    }
}

impl CliConfig {
    /// Loads configuration from a YAML file, then applies environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = if let Some(path) = path {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            Self::default()
        };

        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Applies `ROMOTE_*` overrides read through `lookup`.
    ///
    /// Values that fail to parse are ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        override_from(&mut self.discovery_timeout_ms, lookup("ROMOTE_DISCOVERY_TIMEOUT_MS"));
        override_from(&mut self.ssdp_mx, lookup("ROMOTE_SSDP_MX"));
        override_from(
            &mut self.device_info_timeout_ms,
            lookup("ROMOTE_DEVICE_INFO_TIMEOUT_MS"),
        );
        override_from(&mut self.http_timeout_ms, lookup("ROMOTE_HTTP_TIMEOUT_MS"));
        override_from(&mut self.text_char_delay_ms, lookup("ROMOTE_TEXT_CHAR_DELAY_MS"));
        override_from(
            &mut self.key_sequence_delay_ms,
            lookup("ROMOTE_KEY_SEQUENCE_DELAY_MS"),
        );
        override_from(&mut self.ecp_port, lookup("ROMOTE_ECP_PORT"));
        override_from(&mut self.wake_port, lookup("ROMOTE_WAKE_PORT"));
        if let Some(ip) = lookup("ROMOTE_WAKE_BROADCAST").and_then(|v| v.trim().parse().ok()) {
            self.wake_broadcast = Some(ip);
        }
    }

    /// Converts to romote-core's config type.
    pub fn to_core_config(&self) -> RemoteConfig {
        RemoteConfig {
            discovery_timeout_ms: self.discovery_timeout_ms,
            ssdp_mx: self.ssdp_mx,
            device_info_timeout_ms: self.device_info_timeout_ms,
            http_timeout_ms: self.http_timeout_ms,
            text_char_delay_ms: self.text_char_delay_ms,
            key_sequence_delay_ms: self.key_sequence_delay_ms,
            ecp_port: self.ecp_port,
            wake_port: self.wake_port,
            wake_broadcast: self.wake_broadcast,
        }
    }
}

fn override_from<T: std::str::FromStr>(field: &mut T, value: Option<String>) {
    if let Some(parsed) = value.and_then(|v| v.trim().parse().ok()) {
        *field = parsed;
    }
}
